// src/services/instructors.rs

//! Instructor data-store operations.

use async_trait::async_trait;
use reqwest::Method;

use crate::error::Result;
use crate::models::{Instructor, InstructorDetail, ReviewDraft, SubjectCatalog};
use crate::pipeline::{QueryMode, SearchQuery, build, query};
use crate::services::{ApiClient, RequestContext, or_empty};

/// Operations the directory needs from the backend.
///
/// Implementors supply the four primitives; the named query modes and review
/// validation are provided on top of them. Every returned instructor has
/// already been through the normalizer.
#[async_trait]
pub trait InstructorApi: Send + Sync {
    /// Run a collection query in `mode`.
    async fn query(
        &self,
        ctx: &RequestContext,
        mode: QueryMode,
        query: &SearchQuery,
    ) -> Result<Vec<Instructor>>;

    async fn detail(&self, ctx: &RequestContext, id: &str) -> Result<InstructorDetail>;

    /// Send an already validated review.
    async fn post_review(
        &self,
        ctx: &RequestContext,
        id: &str,
        draft: &ReviewDraft,
    ) -> Result<()>;

    async fn subjects(&self, ctx: &RequestContext) -> Result<SubjectCatalog>;

    async fn list(&self, ctx: &RequestContext, filters: &SearchQuery) -> Result<Vec<Instructor>> {
        self.query(ctx, QueryMode::List, filters).await
    }

    async fn search(&self, ctx: &RequestContext, query: &SearchQuery) -> Result<Vec<Instructor>> {
        self.query(ctx, QueryMode::Search, query).await
    }

    async fn browse(&self, ctx: &RequestContext, query: &SearchQuery) -> Result<Vec<Instructor>> {
        self.query(ctx, QueryMode::Browse, query).await
    }

    async fn recommend(
        &self,
        ctx: &RequestContext,
        query: &SearchQuery,
    ) -> Result<Vec<Instructor>> {
        self.query(ctx, QueryMode::Recommend, query).await
    }

    /// Leaderboard, truncated to `limit` entries in server order.
    async fn top(&self, ctx: &RequestContext, limit: usize) -> Result<Vec<Instructor>> {
        let mut top = self
            .query(ctx, QueryMode::Leaderboard, &SearchQuery::default())
            .await?;
        top.truncate(limit);
        Ok(top)
    }

    /// Validate and submit a review. Invalid drafts never reach the backend.
    async fn submit_review(
        &self,
        ctx: &RequestContext,
        id: &str,
        draft: &ReviewDraft,
    ) -> Result<()> {
        draft.validate()?;
        self.post_review(ctx, id, draft).await
    }
}

#[async_trait]
impl InstructorApi for ApiClient {
    async fn query(
        &self,
        ctx: &RequestContext,
        mode: QueryMode,
        query: &SearchQuery,
    ) -> Result<Vec<Instructor>> {
        let request = build(mode, query);
        let body = self.get(ctx, &request).await?;
        let instructors = self.normalizer().instructors(&body);
        log::debug!("{} returned {} instructors", request.path(), instructors.len());
        Ok(instructors)
    }

    async fn detail(&self, ctx: &RequestContext, id: &str) -> Result<InstructorDetail> {
        let body = self.get(ctx, &query::detail(id)).await?;
        Ok(self.normalizer().detail(&body))
    }

    async fn post_review(
        &self,
        ctx: &RequestContext,
        id: &str,
        draft: &ReviewDraft,
    ) -> Result<()> {
        let body = serde_json::to_value(draft)?;
        self.send(ctx, Method::POST, &query::reviews(id), Some(&body))
            .await?;
        log::info!("Submitted review for instructor {}", id);
        Ok(())
    }

    async fn subjects(&self, ctx: &RequestContext) -> Result<SubjectCatalog> {
        let body = self.get(ctx, &query::subject_catalog()).await?;
        Ok(SubjectCatalog::new(self.normalizer().subjects(&body)))
    }
}

/// Run a recommendation query, showing no results when it fails.
pub async fn fetch_recommendations<A>(
    api: &A,
    ctx: &RequestContext,
    query: &SearchQuery,
) -> Vec<Instructor>
where
    A: InstructorApi + ?Sized,
{
    or_empty("recommendation", api.recommend(ctx, query).await)
}
