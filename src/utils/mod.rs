//! Utility functions and helpers.

pub mod http;
pub mod video;

pub use video::extract_video_id;

use crate::error::{AppError, Result};

/// Split a comma-separated tag parameter, dropping blank pieces.
pub fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Join tags into the comma-separated form the backend expects.
///
/// Blank entries are skipped. Returns `None` when nothing is left so the
/// parameter can be omitted.
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> Option<String> {
    let kept: Vec<&str> = tags
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| !t.trim().is_empty())
        .collect();
    (!kept.is_empty()).then(|| kept.join(","))
}

/// First occurrence of each non-blank tag, in input order.
pub fn unique_tags<S: AsRef<str>>(tags: &[S]) -> Vec<&str> {
    let mut unique: Vec<&str> = Vec::new();
    for tag in tags.iter().map(|t| t.as_ref()) {
        if !tag.trim().is_empty() && !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

/// Add `tag` if missing, remove it if present. Returns whether it is now selected.
///
/// Blank tags are rejected.
pub fn toggle_tag(tags: &mut Vec<String>, tag: &str) -> Result<bool> {
    if tag.trim().is_empty() {
        return Err(AppError::validation("tag must not be blank"));
    }
    if let Some(pos) = tags.iter().position(|t| t == tag) {
        tags.remove(pos);
        Ok(false)
    } else {
        tags.push(tag.to_string());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for raw in ["개념설명", "개념설명,문제풀이", "a,b,c"] {
            let split = split_tags(Some(raw));
            assert_eq!(join_tags(&split).as_deref(), Some(raw));
        }
    }

    #[test]
    fn test_split_empty_or_absent() {
        assert!(split_tags(None).is_empty());
        assert!(split_tags(Some("")).is_empty());
        assert_eq!(split_tags(Some("a,,b,")), vec!["a", "b"]);
        assert_eq!(split_tags(Some(" ,a")), vec!["a"]);
    }

    #[test]
    fn test_join_empty_is_omitted() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(join_tags(&empty), None);
    }

    #[test]
    fn test_join_skips_blank_tags() {
        assert_eq!(join_tags(&[""]), None);
        assert_eq!(join_tags(&["", "  "]), None);
        assert_eq!(join_tags(&["", "a"]).as_deref(), Some("a"));
        assert_eq!(join_tags(&["a", " ", "b"]).as_deref(), Some("a,b"));
    }

    #[test]
    fn test_toggle_tag_preserves_order() {
        let mut tags = vec!["a".to_string(), "b".to_string()];
        assert!(toggle_tag(&mut tags, "c").unwrap());
        assert!(!toggle_tag(&mut tags, "a").unwrap());
        assert_eq!(tags, vec!["b", "c"]);
    }

    #[test]
    fn test_unique_tags_keeps_first_occurrence() {
        let tags = vec!["b".to_string(), "a".into(), "b".into(), " ".into()];
        assert_eq!(unique_tags(&tags), vec!["b", "a"]);
        assert!(unique_tags(&[""]).is_empty());
    }

    #[test]
    fn test_toggle_rejects_blank_tag() {
        let mut tags = Vec::new();
        assert!(matches!(
            toggle_tag(&mut tags, ""),
            Err(AppError::Validation(_))
        ));
        assert!(toggle_tag(&mut tags, "   ").is_err());
        assert!(tags.is_empty());
    }
}
