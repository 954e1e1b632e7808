// src/pipeline/normalize.rs

//! Response normalizer.
//!
//! Backend records arrive with loosely specified field names. Each canonical
//! field is resolved from an ordered list of `(alias, extractor)` pairs: the
//! first alias whose value is present and extractable wins. Adding a new
//! backend alias means adding one entry to the relevant chain.
//!
//! Only a missing identifier fails a record; every other field degrades to a
//! default.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::{
    Comment, Instructor, InstructorDetail, MissingTimestamp, NormalizeConfig, Post, PostThread,
    Review, SubjectEntry,
};
use crate::utils::{extract_video_id, split_tags};

type Extractor<T> = fn(&Value) -> Option<T>;

/// Ordered alias chain for one canonical field.
pub struct FieldChain<T: 'static>(&'static [(&'static str, Extractor<T>)]);

impl<T: 'static> FieldChain<T> {
    /// Resolve the field from a record; `None` when no alias yields a value.
    pub fn resolve(&self, record: &Map<String, Value>) -> Option<T> {
        self.0
            .iter()
            .find_map(|(alias, extract)| record.get(*alias).and_then(extract))
    }

    pub fn aliases(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(alias, _)| *alias)
    }
}

// --- Instructor field chains ---

pub const ID: FieldChain<String> = FieldChain(&[("id", identifier)]);
pub const NAME: FieldChain<String> = FieldChain(&[("name", text)]);
pub const DESCRIPTION: FieldChain<String> = FieldChain(&[("description", text)]);
pub const SUBJECT: FieldChain<String> = FieldChain(&[("subject", text), ("subject_name", text)]);
pub const EXAM_TYPE: FieldChain<String> = FieldChain(&[("exam_type", text)]);
pub const SUBJECT_ID: FieldChain<u32> = FieldChain(&[("subject_id", small_id)]);
pub const PROFILE_IMAGE: FieldChain<String> =
    FieldChain(&[("profile_image", text), ("profile_image_url", text)]);
pub const VIDEO_ID: FieldChain<String> = FieldChain(&[
    ("youtube_video_id", text),
    ("youtube_link", video_link),
    ("youtube_url", video_link),
]);
pub const AVERAGE_RATING: FieldChain<f64> =
    FieldChain(&[("average_rating", rating), ("avg_rating", rating)]);
pub const EFFECTIVE_RATING: FieldChain<f64> = FieldChain(&[
    ("effective_rating", rating),
    ("average_rating", rating),
    ("avg_rating", rating),
]);
pub const TOTAL_RATINGS: FieldChain<u32> =
    FieldChain(&[("total_ratings", count), ("review_count", count)]);
pub const TAGS: FieldChain<Vec<String>> = FieldChain(&[("tags", tag_list)]);
pub const CREATED_AT: FieldChain<DateTime<Utc>> = FieldChain(&[("created_at", timestamp)]);

/// Reported explicitly or not at all; any defined value counts.
const IS_ACTIVE_FIELD: &str = "is_active";

// --- Review field chains ---

const REVIEW_COMMENT: FieldChain<String> = FieldChain(&[("comment", text), ("content", text)]);
const REVIEW_RATING: FieldChain<f64> = FieldChain(&[("rating", rating)]);
const INSTRUCTOR_ID: FieldChain<String> = FieldChain(&[("instructor_id", identifier)]);
const USER_ID: FieldChain<String> = FieldChain(&[("user_id", identifier)]);
const USER_NAME: FieldChain<String> = FieldChain(&[("user_name", text)]);

// --- Subject catalog ---

const SUBJECT_ID_OF_ENTRY: FieldChain<u32> = FieldChain(&[("id", small_id)]);

// --- Community field chains ---

const POST_ID: FieldChain<String> = FieldChain(&[("id", identifier), ("post_id", identifier)]);
const TITLE: FieldChain<String> = FieldChain(&[("title", text)]);
const CONTENT: FieldChain<String> = FieldChain(&[("content", text)]);
const POST_ID_OF_COMMENT: FieldChain<String> = FieldChain(&[("post_id", identifier)]);
const COMMENTS_COUNT: FieldChain<u32> = FieldChain(&[("comments_count", count)]);
const RAW_CREATED_AT: FieldChain<String> = FieldChain(&[("created_at", text)]);

// --- Extractors ---

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn rating(value: &Value) -> Option<f64> {
    number(value).map(|r| r.clamp(0.0, 5.0))
}

fn count(value: &Value) -> Option<u32> {
    number(value).map(|n| n.max(0.0).min(u32::MAX as f64) as u32)
}

fn small_id(value: &Value) -> Option<u32> {
    let n = number(value)?;
    (n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64).then_some(n as u32)
}

fn video_link(value: &Value) -> Option<String> {
    value.as_str().and_then(extract_video_id)
}

fn tag_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
        ),
        Value::String(s) => Some(split_tags(Some(s.as_str()))),
        _ => None,
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(t.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

/// JavaScript-style truthiness, used for flags the backend sends loosely.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// --- Envelopes ---

/// Records of a collection response: `{ "data": [...] }` or a bare array.
pub fn collection(body: &Value) -> &[Value] {
    match body {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => map
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

/// Unwrap a `{ "data": ... }` envelope, or return the body itself.
pub fn payload(body: &Value) -> &Value {
    match body.get("data") {
        Some(inner) if !inner.is_null() => inner,
        _ => body,
    }
}

/// Converts raw backend records into canonical models.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    missing_timestamp: MissingTimestamp,
}

impl Normalizer {
    pub fn new(missing_timestamp: MissingTimestamp) -> Self {
        Self { missing_timestamp }
    }

    pub fn from_config(config: &NormalizeConfig) -> Self {
        Self::new(config.missing_timestamp)
    }

    fn created_at(&self, record: &Map<String, Value>) -> Option<DateTime<Utc>> {
        CREATED_AT.resolve(record).or_else(|| match self.missing_timestamp {
            MissingTimestamp::Unknown => None,
            MissingTimestamp::Now => Some(Utc::now()),
        })
    }

    /// Normalize one instructor record.
    pub fn instructor(&self, raw: &Value) -> Result<Instructor> {
        let record = raw
            .as_object()
            .ok_or_else(|| AppError::malformed("instructor record is not an object"))?;
        let id = ID
            .resolve(record)
            .ok_or_else(|| AppError::malformed("instructor record without id"))?;

        Ok(Instructor {
            id,
            name: NAME.resolve(record).unwrap_or_default(),
            description: DESCRIPTION.resolve(record).unwrap_or_default(),
            exam_type: EXAM_TYPE.resolve(record).unwrap_or_default(),
            subject: SUBJECT.resolve(record).unwrap_or_default(),
            subject_id: SUBJECT_ID.resolve(record),
            profile_image_url: PROFILE_IMAGE.resolve(record),
            video_id: VIDEO_ID.resolve(record),
            average_rating: AVERAGE_RATING.resolve(record).unwrap_or(0.0),
            effective_rating: EFFECTIVE_RATING.resolve(record).unwrap_or(0.0),
            total_ratings: TOTAL_RATINGS.resolve(record).unwrap_or(0),
            tags: TAGS.resolve(record).unwrap_or_default(),
            is_active: record.get(IS_ACTIVE_FIELD).map(truthy),
            created_at: self.created_at(record),
        })
    }

    /// Normalize a collection response, skipping records without an id.
    pub fn instructors(&self, body: &Value) -> Vec<Instructor> {
        collection(body)
            .iter()
            .filter_map(|raw| match self.instructor(raw) {
                Ok(instructor) => Some(instructor),
                Err(e) => {
                    log::warn!("Skipping instructor record: {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn review(&self, raw: &Value) -> Result<Review> {
        let record = raw
            .as_object()
            .ok_or_else(|| AppError::malformed("review record is not an object"))?;
        let id = ID
            .resolve(record)
            .ok_or_else(|| AppError::malformed("review record without id"))?;

        Ok(Review {
            id,
            instructor_id: INSTRUCTOR_ID.resolve(record).unwrap_or_default(),
            user_id: USER_ID.resolve(record).unwrap_or_default(),
            user_name: USER_NAME.resolve(record).unwrap_or_default(),
            rating: REVIEW_RATING.resolve(record).map_or(0, |r| r.round() as u8),
            comment: REVIEW_COMMENT.resolve(record).unwrap_or_default(),
            tags: TAGS.resolve(record).unwrap_or_default(),
            created_at: self.created_at(record),
        })
    }

    /// Normalize a detail response `{ instructor, reviews[] }`.
    pub fn detail(&self, body: &Value) -> InstructorDetail {
        let body = payload(body);
        let instructor = body
            .get("instructor")
            .filter(|v| !v.is_null())
            .and_then(|raw| match self.instructor(raw) {
                Ok(instructor) => Some(instructor),
                Err(e) => {
                    log::warn!("Discarding instructor detail: {}", e);
                    None
                }
            });
        let reviews = body
            .get("reviews")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|raw| match self.review(raw) {
                        Ok(review) => Some(review),
                        Err(e) => {
                            log::warn!("Skipping review record: {}", e);
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        InstructorDetail { instructor, reviews }
    }

    /// Normalize the subject catalog; entries without a numeric id are skipped.
    pub fn subjects(&self, body: &Value) -> Vec<SubjectEntry> {
        collection(body)
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|record| {
                let Some(id) = SUBJECT_ID_OF_ENTRY.resolve(record) else {
                    log::warn!("Skipping subject entry without id");
                    return None;
                };
                Some(SubjectEntry {
                    id,
                    name: NAME.resolve(record).unwrap_or_default(),
                    exam_type: EXAM_TYPE.resolve(record).unwrap_or_default(),
                })
            })
            .collect()
    }

    pub fn post(&self, raw: &Value) -> Result<Post> {
        let record = raw
            .as_object()
            .ok_or_else(|| AppError::malformed("post record is not an object"))?;
        let id = POST_ID
            .resolve(record)
            .ok_or_else(|| AppError::malformed("post record without id"))?;

        Ok(Post {
            id,
            user_id: USER_ID.resolve(record).unwrap_or_default(),
            title: TITLE.resolve(record).unwrap_or_default(),
            content: CONTENT.resolve(record).unwrap_or_default(),
            user_name: USER_NAME.resolve(record).unwrap_or_default(),
            comments_count: COMMENTS_COUNT.resolve(record).unwrap_or(0),
            created_at: RAW_CREATED_AT.resolve(record).unwrap_or_default(),
        })
    }

    pub fn posts(&self, body: &Value) -> Vec<Post> {
        collection(body)
            .iter()
            .filter_map(|raw| match self.post(raw) {
                Ok(post) => Some(post),
                Err(e) => {
                    log::warn!("Skipping post record: {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn comment(&self, raw: &Value) -> Result<Comment> {
        let record = raw
            .as_object()
            .ok_or_else(|| AppError::malformed("comment record is not an object"))?;
        let id = ID
            .resolve(record)
            .ok_or_else(|| AppError::malformed("comment record without id"))?;

        Ok(Comment {
            id,
            post_id: POST_ID_OF_COMMENT.resolve(record).unwrap_or_default(),
            user_id: USER_ID.resolve(record).unwrap_or_default(),
            content: CONTENT.resolve(record).unwrap_or_default(),
            user_name: USER_NAME.resolve(record).unwrap_or_default(),
            created_at: RAW_CREATED_AT.resolve(record).unwrap_or_default(),
        })
    }

    /// Identifier of a freshly created post, from `{ post_id }` or `{ data: { post_id } }`.
    pub fn created_post_id(&self, body: &Value) -> Option<String> {
        const CREATED_POST_ID: FieldChain<String> = FieldChain(&[("post_id", identifier)]);
        [body, payload(body)]
            .into_iter()
            .filter_map(Value::as_object)
            .find_map(|record| CREATED_POST_ID.resolve(record))
    }

    /// Normalize a post detail; the backend nests it one or two `data` levels deep.
    pub fn thread(&self, body: &Value) -> PostThread {
        let outer = payload(body);
        let nested = outer.get("data");
        let pick = |key: &str| {
            outer
                .get(key)
                .filter(|v| !v.is_null())
                .or_else(|| nested.and_then(|n| n.get(key)).filter(|v| !v.is_null()))
        };

        let post = pick("post").and_then(|raw| self.post(raw).ok());
        let comments = pick("comments")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(|raw| self.comment(raw).ok()).collect())
            .unwrap_or_default();

        PostThread { post, comments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(raw: Value) -> Instructor {
        Normalizer::default().instructor(&raw).unwrap()
    }

    #[test]
    fn test_minimal_record_defaults() {
        let instructor = normalize(json!({ "id": 1, "name": "A" }));
        assert_eq!(instructor.id, "1");
        assert_eq!(instructor.name, "A");
        assert_eq!(instructor.subject, "");
        assert_eq!(instructor.exam_type, "");
        assert_eq!(instructor.average_rating, 0.0);
        assert_eq!(instructor.effective_rating, 0.0);
        assert_eq!(instructor.total_ratings, 0);
        assert!(instructor.tags.is_empty());
        assert_eq!(instructor.created_at, None);
    }

    #[test]
    fn test_missing_id_is_malformed() {
        let err = Normalizer::default()
            .instructor(&json!({ "name": "no id" }))
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord(_)));

        let err = Normalizer::default()
            .instructor(&json!({ "id": null, "name": "null id" }))
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord(_)));
    }

    #[test]
    fn test_is_active_omitted_unless_reported() {
        let a = normalize(json!({ "id": 1, "name": "A" }));
        let b = normalize(json!({ "id": 2, "name": "B", "is_active": false }));
        assert_eq!(a.is_active, None);
        assert_eq!(b.is_active, Some(false));

        let a_json = serde_json::to_value(&a).unwrap();
        let b_json = serde_json::to_value(&b).unwrap();
        assert!(a_json.get("is_active").is_none());
        assert_eq!(b_json.get("is_active"), Some(&json!(false)));
    }

    #[test]
    fn test_is_active_coerced() {
        assert_eq!(normalize(json!({ "id": 1, "is_active": 1 })).is_active, Some(true));
        assert_eq!(normalize(json!({ "id": 1, "is_active": 0 })).is_active, Some(false));
        assert_eq!(normalize(json!({ "id": 1, "is_active": null })).is_active, Some(false));
        assert_eq!(normalize(json!({ "id": 1, "is_active": "Y" })).is_active, Some(true));
    }

    #[test]
    fn test_subject_alias_priority() {
        let both = normalize(json!({ "id": 1, "subject": "수학", "subject_name": "국어" }));
        assert_eq!(both.subject, "수학");
        let alias = normalize(json!({ "id": 1, "subject_name": "국어" }));
        assert_eq!(alias.subject, "국어");
        let empty = normalize(json!({ "id": 1, "subject": "", "subject_name": "영어" }));
        assert_eq!(empty.subject, "영어");
    }

    #[test]
    fn test_rating_chains() {
        let effective = normalize(json!({ "id": 1, "effective_rating": 3.8, "average_rating": 4.5 }));
        assert_eq!(effective.effective_rating, 3.8);
        assert_eq!(effective.average_rating, 4.5);

        let avg = normalize(json!({ "id": 1, "avg_rating": "4.25", "review_count": 12 }));
        assert_eq!(avg.average_rating, 4.25);
        assert_eq!(avg.effective_rating, 4.25);
        assert_eq!(avg.total_ratings, 12);

        let explicit_zero = normalize(json!({ "id": 1, "effective_rating": 0, "average_rating": 4.0 }));
        assert_eq!(explicit_zero.effective_rating, 0.0);
    }

    #[test]
    fn test_effective_matches_average_when_absent() {
        let records = [
            json!({ "id": 1 }),
            json!({ "id": 2, "average_rating": 4.4 }),
            json!({ "id": 3, "avg_rating": 2.5 }),
            json!({ "id": 4, "average_rating": null, "avg_rating": 3 }),
            json!({ "id": 5, "average_rating": 0, "avg_rating": 3 }),
            json!({ "id": 6, "effective_rating": null, "average_rating": 1.5 }),
        ];
        for raw in records {
            let instructor = normalize(raw);
            assert_eq!(instructor.effective_rating, instructor.average_rating);
        }
    }

    #[test]
    fn test_ratings_clamped_to_range() {
        let instructor = normalize(json!({ "id": 1, "average_rating": 7.5, "total_ratings": -3 }));
        assert_eq!(instructor.average_rating, 5.0);
        assert_eq!(instructor.total_ratings, 0);
    }

    #[test]
    fn test_optional_references() {
        let instructor = normalize(json!({
            "id": "abc",
            "subject_id": "12",
            "profile_image_url": "https://cdn.example.com/p.jpg",
            "youtube_link": "https://youtu.be/dQw4w9WgXcQ",
            "tags": "개념 설명이 명확해요,교재가 알차요",
        }));
        assert_eq!(instructor.subject_id, Some(12));
        assert_eq!(instructor.profile_image_url.as_deref(), Some("https://cdn.example.com/p.jpg"));
        assert_eq!(instructor.video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(instructor.tags, vec!["개념 설명이 명확해요", "교재가 알차요"]);
    }

    #[test]
    fn test_timestamp_formats() {
        let rfc = normalize(json!({ "id": 1, "created_at": "2024-01-02T03:04:05Z" }));
        let sql = normalize(json!({ "id": 1, "created_at": "2024-01-02 03:04:05" }));
        assert_eq!(rfc.created_at, sql.created_at);
        assert!(rfc.created_at.is_some());

        let garbage = normalize(json!({ "id": 1, "created_at": "yesterday" }));
        assert_eq!(garbage.created_at, None);
    }

    #[test]
    fn test_normalization_is_stable_with_unknown_timestamps() {
        let raw = json!({ "id": 9, "name": "A", "tags": ["x"] });
        assert_eq!(normalize(raw.clone()), normalize(raw));
    }

    #[test]
    fn test_now_policy_stamps_missing_timestamps() {
        let normalizer = Normalizer::new(MissingTimestamp::Now);
        let before = Utc::now();
        let instructor = normalizer.instructor(&json!({ "id": 1 })).unwrap();
        let stamped = instructor.created_at.unwrap();
        assert!(stamped >= before);

        let dated = normalizer
            .instructor(&json!({ "id": 1, "created_at": "2024-01-01T00:00:00Z" }))
            .unwrap();
        assert_eq!(dated.created_at.unwrap().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_collection_skips_malformed_records() {
        let body = json!({ "data": [ { "id": 1 }, { "name": "no id" }, { "id": "x" } ] });
        let instructors = Normalizer::default().instructors(&body);
        let ids: Vec<_> = instructors.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "x"]);

        assert!(Normalizer::default().instructors(&json!({ "data": null })).is_empty());
        assert_eq!(Normalizer::default().instructors(&json!([{ "id": 3 }])).len(), 1);
    }

    #[test]
    fn test_detail_with_reviews() {
        let body = json!({
            "instructor": { "id": 5, "name": "현우진" },
            "reviews": [
                { "id": 10, "content": "좋아요", "rating": 5, "user_name": "학생" },
                { "comment": "no id" }
            ]
        });
        let detail = Normalizer::default().detail(&body);
        assert_eq!(detail.instructor.unwrap().id, "5");
        assert_eq!(detail.reviews.len(), 1);
        assert_eq!(detail.reviews[0].comment, "좋아요");
        assert_eq!(detail.reviews[0].id, "10");

        let missing = Normalizer::default().detail(&json!({ "instructor": null }));
        assert!(missing.instructor.is_none());
        assert!(missing.reviews.is_empty());
    }

    #[test]
    fn test_subject_catalog_entries() {
        let body = json!({ "data": [
            { "id": 1, "name": "수학", "exam_type": "수능" },
            { "id": "bad", "name": "?" },
        ]});
        let entries = Normalizer::default().subjects(&body);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].exam_type, "수능");
    }

    #[test]
    fn test_thread_envelopes() {
        let flat = json!({ "success": true, "data": {
            "post": { "id": 1, "title": "hi" },
            "comments": [ { "id": 2, "content": "c" } ]
        }});
        let nested = json!({ "data": { "data": {
            "post": { "id": 1, "title": "hi" },
            "comments": []
        }}});

        let thread = Normalizer::default().thread(&flat);
        assert_eq!(thread.post.unwrap().title, "hi");
        assert_eq!(thread.comments.len(), 1);

        let thread = Normalizer::default().thread(&nested);
        assert_eq!(thread.post.unwrap().id, "1");
        assert!(thread.comments.is_empty());
    }

    #[test]
    fn test_created_post_id() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.created_post_id(&json!({ "post_id": 15 })).as_deref(), Some("15"));
        assert_eq!(
            normalizer.created_post_id(&json!({ "data": { "post_id": "16" } })).as_deref(),
            Some("16")
        );
        assert_eq!(normalizer.created_post_id(&json!({ "success": true })), None);
    }

    #[test]
    fn test_chain_aliases_are_ordered() {
        let aliases: Vec<_> = EFFECTIVE_RATING.aliases().collect();
        assert_eq!(aliases, vec!["effective_rating", "average_rating", "avg_rating"]);
    }
}
