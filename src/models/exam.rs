// src/models/exam.rs

//! Exam categories and their subject vocabularies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Learning-style labels offered by the finder and the review form.
pub const LEARNING_STYLES: [&str; 6] = [
    "개념 설명이 명확해요",
    "문제 풀이가 자세해요",
    "강의 속도가 적절해요",
    "커리큘럼이 체계적이에요",
    "질문 답변이 빨라요",
    "교재가 알차요",
];

/// Exam category an instructor teaches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamType {
    #[serde(rename = "수능")]
    Suneung,
    #[serde(rename = "내신")]
    Naesin,
    #[serde(rename = "어학")]
    Language,
    #[serde(rename = "공무원")]
    GovExam,
}

impl ExamType {
    pub const ALL: [ExamType; 4] = [
        ExamType::Suneung,
        ExamType::Naesin,
        ExamType::Language,
        ExamType::GovExam,
    ];

    /// Label used by the backend and in deep links.
    pub fn label(self) -> &'static str {
        match self {
            ExamType::Suneung => "수능",
            ExamType::Naesin => "내신",
            ExamType::Language => "어학",
            ExamType::GovExam => "공무원",
        }
    }

    /// Path segment used by the exam landing pages.
    pub fn slug(self) -> &'static str {
        match self {
            ExamType::Suneung => "suneung",
            ExamType::Naesin => "naesin",
            ExamType::Language => "language",
            ExamType::GovExam => "gongmuwon",
        }
    }

    /// Exact match against the backend label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.label() == label)
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.slug() == slug)
    }

    /// Subjects offered by the guided finder for this exam type.
    pub fn finder_subjects(self) -> &'static [&'static str] {
        match self {
            ExamType::Suneung => &["국어", "수학", "영어", "탐구", "제2외국어"],
            ExamType::Naesin => &["국어", "수학", "영어"],
            ExamType::Language => &["TOEIC", "TOEFL", "IELTS"],
            ExamType::GovExam => &[
                "국어(공무원)",
                "수학(공무원)",
                "영어(공무원)",
                "한국사",
                "행정학",
                "경제학",
            ],
        }
    }

    pub fn offers_subject(self, subject: &str) -> bool {
        self.finder_subjects().contains(&subject)
    }

    /// Subject slugs linked from this exam type's landing page, with labels.
    pub fn landing_subjects(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ExamType::Suneung => &[
                ("korean", "국어"),
                ("math", "수학"),
                ("english", "영어"),
                ("social", "탐구-사회"),
                ("science", "탐구-과학"),
            ],
            ExamType::Naesin => &[
                ("korean", "국어"),
                ("math", "수학"),
                ("english", "영어"),
                ("society", "사회"),
                ("science", "과학"),
            ],
            ExamType::GovExam => &[
                ("korean", "국어(공무원)"),
                ("math", "수학(공무원)"),
                ("english", "영어(공무원)"),
                ("history", "한국사"),
                ("adminlaw", "행정법"),
                ("admin", "행정학"),
            ],
            ExamType::Language => &[("toeic", "토익"), ("toefl", "토플"), ("teps", "텝스")],
        }
    }

    /// Resolve a subject slug to its label within this exam type.
    ///
    /// The same slug can name different subjects depending on the exam type,
    /// so exam-specific overrides are consulted before the shared table.
    pub fn subject_for_slug(self, slug: &str) -> Option<&'static str> {
        let overridden = match (self, slug) {
            (ExamType::Suneung, "social") => Some("탐구-사회"),
            (ExamType::Suneung, "science") => Some("탐구-과학"),
            (ExamType::GovExam, "korean") => Some("국어(공무원)"),
            (ExamType::GovExam, "math") => Some("수학(공무원)"),
            (ExamType::GovExam, "english") => Some("영어(공무원)"),
            _ => None,
        };
        overridden.or_else(|| shared_subject_slug(slug))
    }
}

fn shared_subject_slug(slug: &str) -> Option<&'static str> {
    let label = match slug {
        "korean" => "국어",
        "math" => "수학",
        "english" => "영어",
        "society" => "사회",
        "science" => "과학",
        "social" | "inquiry_social" => "탐구-사회",
        "inquiry_science" => "탐구-과학",
        "history" => "한국사",
        "adminlaw" => "행정법",
        "admin" => "행정학",
        "toeic" => "토익",
        "toefl" => "토플",
        "teps" => "텝스",
        _ => return None,
    };
    Some(label)
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExamType {
    type Err = AppError;

    /// Accepts either the label or the slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
            .or_else(|| Self::from_slug(s))
            .ok_or_else(|| AppError::validation(format!("unknown exam type '{s}'")))
    }
}
