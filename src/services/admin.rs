// src/services/admin.rs

//! Admin console instructor management.

use reqwest::Method;
use serde_json::{Value, json};

use crate::error::Result;
use crate::models::InstructorDraft;
use crate::pipeline::ApiRequest;
use crate::services::{ApiClient, RequestContext};

fn instructors() -> ApiRequest {
    ApiRequest::new(["admin", "instructors"])
}

fn instructor(id: &str) -> ApiRequest {
    ApiRequest::new(["admin", "instructors", id])
}

fn status_body(active: bool) -> Value {
    json!({ "is_active": active })
}

impl ApiClient {
    pub async fn create_instructor(&self, ctx: &RequestContext, draft: &InstructorDraft) -> Result<()> {
        draft.validate()?;
        let body = serde_json::to_value(draft)?;
        self.send(ctx, Method::POST, &instructors(), Some(&body)).await?;
        log::info!("Registered instructor {}", draft.name);
        Ok(())
    }

    /// Replace a stored record with the full draft.
    pub async fn update_instructor(
        &self,
        ctx: &RequestContext,
        id: &str,
        draft: &InstructorDraft,
    ) -> Result<()> {
        draft.validate()?;
        let body = serde_json::to_value(draft)?;
        self.send(ctx, Method::PUT, &instructor(id), Some(&body)).await?;
        Ok(())
    }

    /// Only the status field is sent.
    pub async fn set_instructor_active(
        &self,
        ctx: &RequestContext,
        id: &str,
        active: bool,
    ) -> Result<()> {
        self.send(ctx, Method::PUT, &instructor(id), Some(&status_body(active)))
            .await?;
        log::debug!("Instructor {} is_active={}", id, active);
        Ok(())
    }

    pub async fn delete_instructor(&self, ctx: &RequestContext, id: &str) -> Result<()> {
        self.send(ctx, Method::DELETE, &instructor(id), None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Config;

    fn api() -> ApiClient {
        ApiClient::new(&Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_incomplete_drafts_rejected_locally() {
        let ctx = RequestContext::with_token("admin");
        let err = api()
            .create_instructor(&ctx, &InstructorDraft::new("", Some(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = api()
            .update_instructor(&ctx, "4", &InstructorDraft::new("김현우", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_endpoint_paths() {
        let api = api();
        assert_eq!(api.url(&instructors()).unwrap().path(), "/api/admin/instructors");
        assert_eq!(api.url(&instructor("4")).unwrap().path(), "/api/admin/instructors/4");
    }

    #[test]
    fn test_payload_shapes() {
        let mut draft = InstructorDraft::new("김현우", Some(11));
        draft.youtube_link = "https://youtu.be/dQw4w9WgXcQ".into();
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["subject_id"], 11);
        assert_eq!(body["is_active"], true);
        assert_eq!(body["tags"], json!([]));
        assert_eq!(body["youtube_link"], "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(body["profile_image"], "");

        assert_eq!(status_body(false), json!({ "is_active": false }));
    }
}
