// src/models/instructor.rs

//! Canonical instructor, review and subject catalog types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ExamType;

/// Shown when an instructor has no profile image.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.pexels.com/photos/5212345/pexels-photo-5212345.jpeg?auto=compress&cs=tinysrgb&w=200";

/// An instructor after normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instructor {
    pub id: String,
    pub name: String,
    pub description: String,

    /// Backend exam label; empty when the record carried none
    pub exam_type: String,

    /// Subject label, scoped within `exam_type`
    pub subject: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,

    /// All-time mean rating in [0, 5]
    pub average_rating: f64,

    /// Current rating; equals `average_rating` when the backend sent none
    pub effective_rating: f64,

    pub total_ratings: u32,

    /// Learning-style labels in backend order
    #[serde(default)]
    pub tags: Vec<String>,

    /// Only present when the backend reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    /// `None` when the backend did not report a creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Instructor {
    /// Rating used for ordering and display.
    pub fn rating(&self) -> f64 {
        self.effective_rating
    }

    /// Rating formatted with one decimal. Zero-review instructors show `0.0`.
    pub fn display_rating(&self) -> String {
        format!("{:.1}", self.rating())
    }

    /// Whole stars to fill for the card rating.
    pub fn star_count(&self) -> u8 {
        self.rating().floor().clamp(0.0, 5.0) as u8
    }

    /// True when no rating has been submitted yet.
    pub fn has_no_ratings(&self) -> bool {
        self.total_ratings == 0
    }

    pub fn exam(&self) -> Option<ExamType> {
        ExamType::from_label(&self.exam_type)
    }

    /// Profile image, or the placeholder when absent.
    pub fn profile_image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.profile_image_url.as_deref().unwrap_or(placeholder)
    }

    pub fn profile_image(&self) -> &str {
        self.profile_image_or(PLACEHOLDER_IMAGE)
    }

    /// Admin status label; unknown is rendered distinctly from inactive.
    pub fn status_label(&self) -> &'static str {
        match self.is_active {
            Some(true) => "active",
            Some(false) => "inactive",
            None => "-",
        }
    }

    /// Status an admin toggle switches to. Unknown counts as inactive.
    pub fn toggled_status(&self) -> bool {
        !self.is_active.unwrap_or(false)
    }
}

/// A review left on an instructor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: String,
    pub instructor_id: String,
    pub user_id: String,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Detail view: the instructor, if found, and its reviews.
#[derive(Debug, Clone, Default)]
pub struct InstructorDetail {
    pub instructor: Option<Instructor>,
    pub reviews: Vec<Review>,
}

/// A review about to be submitted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewDraft {
    pub rating: u8,
    pub comment: String,
    pub tags: Vec<String>,
}

impl ReviewDraft {
    pub fn new(rating: u8, comment: impl Into<String>, tags: impl IntoIterator<Item = String>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        Self {
            rating,
            comment: comment.into(),
            tags: unique,
        }
    }

    /// Check the draft before it reaches the network.
    pub fn validate(&self) -> Result<()> {
        if self.comment.trim().is_empty() {
            return Err(AppError::validation("리뷰 내용을 입력해주세요."));
        }
        if self.rating == 0 {
            return Err(AppError::validation("별점을 선택해주세요."));
        }
        if self.rating > 5 {
            return Err(AppError::validation("rating must be between 1 and 5"));
        }
        Ok(())
    }
}

/// Instructor record as written by the admin console.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InstructorDraft {
    pub name: String,
    pub subject_id: Option<u32>,
    pub profile_image: String,
    pub description: String,
    pub tags: Vec<String>,
    pub youtube_link: String,
    pub is_active: bool,
}

impl Default for InstructorDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            subject_id: None,
            profile_image: String::new(),
            description: String::new(),
            tags: Vec::new(),
            youtube_link: String::new(),
            is_active: true,
        }
    }
}

impl InstructorDraft {
    pub fn new(name: impl Into<String>, subject_id: Option<u32>) -> Self {
        Self {
            name: name.into(),
            subject_id,
            ..Self::default()
        }
    }

    /// Prefill an edit form from a stored record. Unknown status counts as active.
    pub fn from_instructor(instructor: &Instructor) -> Self {
        Self {
            name: instructor.name.clone(),
            subject_id: instructor.subject_id,
            profile_image: instructor.profile_image_url.clone().unwrap_or_default(),
            description: instructor.description.clone(),
            tags: instructor.tags.clone(),
            youtube_link: instructor.video_id.clone().unwrap_or_default(),
            is_active: instructor.is_active.unwrap_or(true),
        }
    }

    /// Check the draft before it reaches the network.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("이름을 입력해주세요."));
        }
        if self.subject_id.is_none() {
            return Err(AppError::validation("과목을 선택해주세요."));
        }
        Ok(())
    }
}

/// Entry of the backend's subject catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubjectEntry {
    pub id: u32,
    pub name: String,
    pub exam_type: String,
}

/// Subject catalog used to resolve subject ids.
#[derive(Debug, Clone, Default)]
pub struct SubjectCatalog {
    entries: Vec<SubjectEntry>,
}

impl SubjectCatalog {
    pub fn new(entries: Vec<SubjectEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SubjectEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the id of `subject` under `exam_type`.
    pub fn subject_id(&self, exam_type: &str, subject: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.exam_type == exam_type && e.name == subject)
            .map(|e| e.id)
    }

    pub fn for_exam<'a>(&'a self, exam_type: &'a str) -> impl Iterator<Item = &'a SubjectEntry> + 'a {
        self.entries.iter().filter(move |e| e.exam_type == exam_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::instructor as sample;

    #[test]
    fn test_rating_falls_back_to_average() {
        assert_eq!(sample("1", 4.2, None, 10).rating(), 4.2);
        assert_eq!(sample("2", 4.2, Some(3.9), 10).rating(), 3.9);
    }

    #[test]
    fn test_zero_reviews_still_display() {
        let instructor = sample("1", 0.0, None, 0);
        assert!(instructor.has_no_ratings());
        assert_eq!(instructor.display_rating(), "0.0");
        assert_eq!(instructor.star_count(), 0);
    }

    #[test]
    fn test_star_count_floors() {
        assert_eq!(sample("1", 4.9, None, 3).star_count(), 4);
        assert_eq!(sample("1", 5.0, None, 3).star_count(), 5);
    }

    #[test]
    fn test_profile_image_placeholder() {
        let mut instructor = sample("1", 4.0, None, 1);
        assert_eq!(instructor.profile_image(), PLACEHOLDER_IMAGE);
        instructor.profile_image_url = Some("https://cdn.example.com/a.jpg".into());
        assert_eq!(instructor.profile_image(), "https://cdn.example.com/a.jpg");
    }

    #[test]
    fn test_status_label_distinguishes_unknown() {
        let mut instructor = sample("1", 4.0, None, 1);
        assert_eq!(instructor.status_label(), "-");
        instructor.is_active = Some(false);
        assert_eq!(instructor.status_label(), "inactive");
    }

    #[test]
    fn test_review_draft_validation() {
        assert!(ReviewDraft::new(0, "좋아요", vec![]).validate().is_err());
        assert!(ReviewDraft::new(4, "   ", vec![]).validate().is_err());
        assert!(ReviewDraft::new(6, "좋아요", vec![]).validate().is_err());
        assert!(ReviewDraft::new(5, "좋아요", vec![]).validate().is_ok());
    }

    #[test]
    fn test_review_draft_dedupes_tags() {
        let draft = ReviewDraft::new(
            5,
            "최고",
            vec!["교재가 알차요".into(), " 교재가 알차요 ".into(), "".into()],
        );
        assert_eq!(draft.tags, vec!["교재가 알차요".to_string()]);
    }

    #[test]
    fn test_toggled_status() {
        let mut instructor = sample("1", 4.0, None, 1);
        assert!(instructor.toggled_status());
        instructor.is_active = Some(true);
        assert!(!instructor.toggled_status());
        instructor.is_active = Some(false);
        assert!(instructor.toggled_status());
    }

    #[test]
    fn test_instructor_draft_validation() {
        let err = InstructorDraft::new(" ", Some(3)).validate().unwrap_err();
        assert_eq!(err.to_string(), AppError::validation("이름을 입력해주세요.").to_string());
        let err = InstructorDraft::new("김현우", None).validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(InstructorDraft::new("김현우", Some(3)).validate().is_ok());
    }

    #[test]
    fn test_instructor_draft_prefill() {
        let mut instructor = sample("4", 4.0, None, 1);
        instructor.subject_id = Some(12);
        instructor.video_id = Some("dQw4w9WgXcQ".into());
        let draft = InstructorDraft::from_instructor(&instructor);
        assert_eq!(draft.name, "강사 4");
        assert_eq!(draft.subject_id, Some(12));
        assert_eq!(draft.youtube_link, "dQw4w9WgXcQ");
        assert!(draft.is_active);

        instructor.is_active = Some(false);
        assert!(!InstructorDraft::from_instructor(&instructor).is_active);
    }

    #[test]
    fn test_subject_catalog_lookup() {
        let catalog = SubjectCatalog::new(vec![
            SubjectEntry { id: 1, name: "수학".into(), exam_type: "수능".into() },
            SubjectEntry { id: 7, name: "수학".into(), exam_type: "내신".into() },
        ]);
        assert_eq!(catalog.subject_id("내신", "수학"), Some(7));
        assert_eq!(catalog.subject_id("어학", "수학"), None);
        assert_eq!(catalog.for_exam("수능").count(), 1);
    }
}
