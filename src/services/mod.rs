//! Data-store collaborators.
//!
//! - `ApiClient`: JSON transport rooted at the backend's `/api/`
//! - `InstructorApi`: Instructor queries, details and reviews
//! - Community board posts and comments (on `ApiClient`)
//! - Admin instructor management (on `ApiClient`)
//!
//! Every call takes a [`RequestContext`] carrying the caller's credentials.

mod admin;
mod api;
mod community;
mod instructors;

pub use api::ApiClient;
pub use instructors::{InstructorApi, fetch_recommendations};

use reqwest::RequestBuilder;

use crate::error::Result;

/// Per-call request context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    token: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context authenticated with a bearer token. Blank tokens are ignored.
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then_some(token),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Recover a read path: log the failure and fall back to the default value.
pub fn or_default<T: Default>(operation: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        log::error!("{} failed: {}", operation, e);
        T::default()
    })
}

/// Recover a list read: log the failure and show no results.
pub fn or_empty<T>(operation: &str, result: Result<Vec<T>>) -> Vec<T> {
    or_default(operation, result)
}
