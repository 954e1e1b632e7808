// src/services/api.rs

//! HTTP transport to the directory backend.

use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::pipeline::{ApiRequest, Normalizer};
use crate::services::RequestContext;
use crate::utils::http::create_async_client;

/// JSON client rooted at `{base_url}/api/`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    root: Url,
    normalizer: Normalizer,
}

impl ApiClient {
    /// Create a client from the `[api]` and `[normalize]` configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: create_async_client(&config.api)?,
            root: config.api.api_root()?,
            normalizer: Normalizer::from_config(&config.normalize),
        })
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Absolute URL of a request. Segments are percent-encoded individually.
    pub fn url(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.root.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::config(format!("API root {} cannot carry a path", self.root)))?
            .pop_if_empty()
            .extend(&request.segments);
        if !request.params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    pub async fn get(&self, ctx: &RequestContext, request: &ApiRequest) -> Result<Value> {
        self.send(ctx, Method::GET, request, None).await
    }

    /// Send a request and decode the JSON reply.
    ///
    /// Non-success statuses become [`AppError::Status`]; an empty body
    /// decodes to `null`.
    pub async fn send(
        &self,
        ctx: &RequestContext,
        method: Method,
        request: &ApiRequest,
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url(request)?;
        log::debug!("{} {}", method, url);

        let mut builder = ctx.authorize(self.client.request(method, url));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::status(request.path(), status.as_u16()));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
