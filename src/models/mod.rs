// src/models/mod.rs

//! Domain models for the instructor directory.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod community;
mod config;
mod exam;
mod instructor;

// Re-export all public types
pub use community::{Comment, Post, PostDraft, PostThread, validate_comment};
pub use config::{
    ApiConfig, Config, FinderConfig, LoggingConfig, MissingTimestamp, NormalizeConfig,
};
pub use exam::{ExamType, LEARNING_STYLES};
pub use instructor::{
    Instructor, InstructorDetail, InstructorDraft, PLACEHOLDER_IMAGE, Review, ReviewDraft,
    SubjectCatalog, SubjectEntry,
};

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Utc};

    use super::Instructor;

    /// Instructor with the rating fields set and everything else defaulted.
    pub fn instructor(id: &str, average: f64, effective: Option<f64>, total: u32) -> Instructor {
        Instructor {
            id: id.to_string(),
            name: format!("강사 {id}"),
            description: String::new(),
            exam_type: "수능".to_string(),
            subject: "수학".to_string(),
            subject_id: None,
            profile_image_url: None,
            video_id: None,
            average_rating: average,
            effective_rating: effective.unwrap_or(average),
            total_ratings: total,
            tags: Vec::new(),
            is_active: None,
            created_at: None,
        }
    }

    pub fn created(mut instructor: Instructor, rfc3339: &str) -> Instructor {
        instructor.created_at = DateTime::parse_from_rfc3339(rfc3339)
            .ok()
            .map(|t| t.with_timezone(&Utc));
        instructor
    }
}
