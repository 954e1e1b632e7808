//! Community board posts and comments.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A community post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub comments_count: u32,
    #[serde(default)]
    pub created_at: String,
}

impl Post {
    /// Author shown on the board; anonymous when the backend omitted it.
    pub fn author(&self) -> &str {
        if self.user_name.is_empty() {
            "익명"
        } else {
            &self.user_name
        }
    }
}

/// A comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub post_id: String,
    #[serde(default)]
    pub user_id: String,
    pub content: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub created_at: String,
}

/// A post with its comments.
#[derive(Debug, Clone, Default)]
pub struct PostThread {
    pub post: Option<Post>,
    pub comments: Vec<Comment>,
}

/// Body for creating or editing a post.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("제목을 입력해주세요."));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::validation("내용을 입력해주세요."));
        }
        Ok(())
    }
}

/// Reject blank comment bodies.
pub fn validate_comment(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(AppError::validation("댓글 내용을 입력해주세요."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_draft_validation() {
        assert!(PostDraft::new("", "본문").validate().is_err());
        assert!(PostDraft::new("제목", " \n").validate().is_err());
        assert!(PostDraft::new("제목", "본문").validate().is_ok());
        assert!(validate_comment("  ").is_err());
    }

    #[test]
    fn test_anonymous_author() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "id": "3",
            "title": "질문",
        }))
        .unwrap();
        assert_eq!(post.author(), "익명");
        assert_eq!(post.comments_count, 0);
    }
}
