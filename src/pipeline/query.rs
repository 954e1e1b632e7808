// src/pipeline/query.rs

//! Query builder: facets to request parameters, per query mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{ExamType, SubjectCatalog};
use crate::utils::join_tags;

/// Result ordering requested by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Rating,
    Reviews,
    Recent,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Rating => "rating",
            SortOrder::Reviews => "reviews",
            SortOrder::Recent => "recent",
        }
    }

    /// Value forwarded to the backend. The backend has no recency sort, so
    /// `Recent` is sent as no sort at all and the default order applies.
    pub fn wire_value(self) -> Option<&'static str> {
        match self {
            SortOrder::Recent => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rating" => Ok(SortOrder::Rating),
            "reviews" => Ok(SortOrder::Reviews),
            "recent" => Ok(SortOrder::Recent),
            other => Err(AppError::validation(format!("unknown sort '{other}'"))),
        }
    }
}

/// One independent filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    ExamType,
    Subject,
    SubjectId,
    Keyword,
    Tags,
    Sort,
}

impl Facet {
    /// Query parameter name on the wire.
    pub fn param(self) -> &'static str {
        match self {
            Facet::ExamType => "exam_type",
            Facet::Subject => "subject",
            Facet::SubjectId => "subject_id",
            Facet::Keyword => "keyword",
            Facet::Tags => "tags",
            Facet::Sort => "sort",
        }
    }
}

/// Facet values for one backend call. Absent facets are omitted from the
/// request, which the backend reads as "no filter".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub exam_type: Option<String>,
    pub subject: Option<String>,
    pub subject_id: Option<u32>,
    pub keyword: Option<String>,
    pub tags: Vec<String>,
    pub sort: Option<SortOrder>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn exam_type(mut self, exam_type: impl Into<String>) -> Self {
        self.exam_type = Some(exam_type.into());
        self
    }

    pub fn exam(self, exam: ExamType) -> Self {
        self.exam_type(exam.label())
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn subject_id(mut self, subject_id: u32) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Fill `subject_id` from the catalog when exam type and subject are known.
    pub fn resolve_subject_id(mut self, catalog: &SubjectCatalog) -> Self {
        if self.subject_id.is_none() {
            if let (Some(exam), Some(subject)) = (&self.exam_type, &self.subject) {
                self.subject_id = catalog.subject_id(exam, subject);
            }
        }
        self
    }

    /// Wire value of a facet, or `None` when it is absent.
    fn value(&self, facet: Facet) -> Option<String> {
        match facet {
            Facet::ExamType => present(&self.exam_type),
            Facet::Subject => present(&self.subject),
            Facet::SubjectId => self.subject_id.map(|id| id.to_string()),
            Facet::Keyword => present(&self.keyword),
            Facet::Tags => join_tags(&self.tags),
            Facet::Sort => self.sort.and_then(SortOrder::wire_value).map(str::to_string),
        }
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Backend query modes, each with a fixed endpoint and facet set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Unranked listing with arbitrary filters
    List,
    /// Free-text search
    Search,
    /// Exam type + subject browsing with a sort
    Browse,
    /// Guided finder recommendation
    Recommend,
    /// Fixed top-N ranking
    Leaderboard,
}

impl QueryMode {
    fn segments(self) -> &'static [&'static str] {
        match self {
            QueryMode::List => &["instructors"],
            QueryMode::Search | QueryMode::Browse => &["instructors", "search"],
            QueryMode::Recommend => &["instructors", "recommend"],
            QueryMode::Leaderboard => &["instructors", "top3"],
        }
    }

    fn facets(self) -> &'static [Facet] {
        match self {
            QueryMode::List => &[
                Facet::ExamType,
                Facet::Subject,
                Facet::SubjectId,
                Facet::Keyword,
                Facet::Tags,
            ],
            QueryMode::Search => &[
                Facet::Keyword,
                Facet::ExamType,
                Facet::Subject,
                Facet::SubjectId,
                Facet::Tags,
                Facet::Sort,
            ],
            QueryMode::Browse => &[
                Facet::ExamType,
                Facet::Subject,
                Facet::SubjectId,
                Facet::Sort,
            ],
            QueryMode::Recommend => &[
                Facet::ExamType,
                Facet::Subject,
                Facet::SubjectId,
                Facet::Tags,
            ],
            QueryMode::Leaderboard => &[],
        }
    }

    pub fn accepts(self, facet: Facet) -> bool {
        self.facets().contains(&facet)
    }
}

/// A request ready to be issued: path segments below the API root plus parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub segments: Vec<String>,
    pub params: Vec<(&'static str, String)>,
}

impl ApiRequest {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            params: Vec::new(),
        }
    }

    /// Path relative to the API root, for logs and errors.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Build the request for `mode` from the facets it accepts.
pub fn build(mode: QueryMode, query: &SearchQuery) -> ApiRequest {
    let mut request = ApiRequest::new(mode.segments().iter().copied());
    request.params = mode
        .facets()
        .iter()
        .filter_map(|facet| query.value(*facet).map(|value| (facet.param(), value)))
        .collect();
    request
}

/// Detail endpoint for one instructor.
pub fn detail(id: &str) -> ApiRequest {
    ApiRequest::new(["instructors", id, "detail"])
}

/// Review submission endpoint for one instructor.
pub fn reviews(id: &str) -> ApiRequest {
    ApiRequest::new(["instructors", id, "reviews"])
}

/// Subject catalog endpoint.
pub fn subject_catalog() -> ApiRequest {
    ApiRequest::new(["instructors", "subjects"])
}
