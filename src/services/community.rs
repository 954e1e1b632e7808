// src/services/community.rs

//! Community board endpoints.

use reqwest::Method;
use serde_json::json;

use crate::error::Result;
use crate::models::{Post, PostDraft, PostThread, validate_comment};
use crate::pipeline::ApiRequest;
use crate::services::{ApiClient, RequestContext};

fn posts() -> ApiRequest {
    ApiRequest::new(["community", "posts"])
}

fn post(id: &str) -> ApiRequest {
    ApiRequest::new(["community", "posts", id])
}

fn comments() -> ApiRequest {
    ApiRequest::new(["community", "comments"])
}

fn comment(id: &str) -> ApiRequest {
    ApiRequest::new(["community", "comments", id])
}

impl ApiClient {
    pub async fn list_posts(&self, ctx: &RequestContext) -> Result<Vec<Post>> {
        let body = self.get(ctx, &posts()).await?;
        Ok(self.normalizer().posts(&body))
    }

    pub async fn latest_posts(&self, ctx: &RequestContext) -> Result<Vec<Post>> {
        let body = self
            .get(ctx, &ApiRequest::new(["community", "posts", "latest"]))
            .await?;
        Ok(self.normalizer().posts(&body))
    }

    pub async fn post_thread(&self, ctx: &RequestContext, id: &str) -> Result<PostThread> {
        let body = self.get(ctx, &post(id)).await?;
        Ok(self.normalizer().thread(&body))
    }

    /// Create a post. Returns the new post's id when the backend reports one.
    pub async fn create_post(
        &self,
        ctx: &RequestContext,
        draft: &PostDraft,
    ) -> Result<Option<String>> {
        draft.validate()?;
        let body = serde_json::to_value(draft)?;
        let reply = self.send(ctx, Method::POST, &posts(), Some(&body)).await?;
        Ok(self.normalizer().created_post_id(&reply))
    }

    pub async fn update_post(&self, ctx: &RequestContext, id: &str, draft: &PostDraft) -> Result<()> {
        draft.validate()?;
        let body = serde_json::to_value(draft)?;
        self.send(ctx, Method::PUT, &post(id), Some(&body)).await?;
        Ok(())
    }

    pub async fn delete_post(&self, ctx: &RequestContext, id: &str) -> Result<()> {
        self.send(ctx, Method::DELETE, &post(id), None).await?;
        Ok(())
    }

    pub async fn create_comment(
        &self,
        ctx: &RequestContext,
        post_id: &str,
        content: &str,
    ) -> Result<()> {
        validate_comment(content)?;
        let body = json!({ "post_id": post_id, "content": content });
        self.send(ctx, Method::POST, &comments(), Some(&body)).await?;
        Ok(())
    }

    pub async fn update_comment(&self, ctx: &RequestContext, id: &str, content: &str) -> Result<()> {
        validate_comment(content)?;
        let body = json!({ "content": content });
        self.send(ctx, Method::PUT, &comment(id), Some(&body)).await?;
        Ok(())
    }

    pub async fn delete_comment(&self, ctx: &RequestContext, id: &str) -> Result<()> {
        self.send(ctx, Method::DELETE, &comment(id), None).await?;
        Ok(())
    }
}
