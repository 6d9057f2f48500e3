use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::errors::{ApiError, Operation};

pub mod types;

use types::*;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Trait abstraction over the remote politicians API, enabling test mocking.
///
/// Implementations do no retrying and no caching.
#[async_trait]
pub trait PoliticiansApi: Send + Sync {
    /// `GET /politicians` with optional filters.
    async fn list(&self, params: &ListParams) -> ApiResult<PageResult>;

    /// `GET /politicians/{id}`.
    async fn get(&self, id: &str) -> ApiResult<Politician>;

    /// `PATCH /politicians/{id}` with a partial body.
    async fn update(&self, id: &str, update: &PoliticianUpdate) -> ApiResult<MessageResponse>;

    /// `DELETE /politicians/{id}`.
    async fn delete(&self, id: &str) -> ApiResult<MessageResponse>;

    /// `POST /bulk` with the CSV sent as multipart field `file`.
    async fn bulk_import(&self, file_name: &str, contents: Vec<u8>) -> ApiResult<MessageResponse>;

    /// `GET /statistics`.
    async fn statistics(&self) -> ApiResult<Statistics>;

    /// `GET /`, the backend's cluster health document.
    async fn health(&self) -> ApiResult<serde_json::Value>;
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &crate::config::Config) -> anyhow::Result<Self> {
        use anyhow::Context;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = config.endpoint.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .with_context(|| format!("Invalid endpoint '{}'", config.endpoint))?;

        Ok(Self {
            client,
            base_url,
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The endpoint with `segments` appended, each percent-encoded as a
    /// path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Build the list URL, e.g. `http://host/politicians?page=2&per_page=10`.
    pub fn list_url(&self, params: &ListParams) -> String {
        let pairs = params.to_pairs();
        let mut url = self.url(&["politicians"]);
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url.to_string()
    }

    fn item_url(&self, id: &str) -> String {
        self.url(&["politicians", id]).to_string()
    }

    async fn send(
        &self,
        operation: Operation,
        request: reqwest::RequestBuilder,
    ) -> ApiResult<Response> {
        let response = request.send().await.map_err(|e| ApiError::Network {
            operation,
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("{} failed with status {}: {}", operation, status, body);
        Err(ApiError::Request {
            operation,
            status: status.as_u16(),
            message: operation.failure_message().to_string(),
        })
    }

    async fn decode<T: DeserializeOwned>(
        operation: Operation,
        response: Response,
    ) -> ApiResult<T> {
        let body_text = response.text().await.map_err(|e| ApiError::Network {
            operation,
            message: e.to_string(),
        })?;
        debug!("{} response body ({} chars)", operation, body_text.len());
        serde_json::from_str(&body_text).map_err(|e| ApiError::Parse {
            operation,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl PoliticiansApi for ApiClient {
    async fn list(&self, params: &ListParams) -> ApiResult<PageResult> {
        let url = self.list_url(params);
        debug!("GET {}", url);
        let response = self.send(Operation::List, self.client.get(&url)).await?;
        let body: PoliticiansResponse = Self::decode(Operation::List, response).await?;
        Ok(body.into())
    }

    async fn get(&self, id: &str) -> ApiResult<Politician> {
        let url = self.item_url(id);
        debug!("GET {}", url);
        let response = self.send(Operation::Get, self.client.get(&url)).await?;
        Self::decode(Operation::Get, response).await
    }

    async fn update(&self, id: &str, update: &PoliticianUpdate) -> ApiResult<MessageResponse> {
        let url = self.item_url(id);
        debug!("PATCH {}", url);
        let request = self.client.patch(&url).json(update);
        let response = self.send(Operation::Update, request).await?;
        Self::decode(Operation::Update, response).await
    }

    async fn delete(&self, id: &str) -> ApiResult<MessageResponse> {
        let url = self.item_url(id);
        debug!("DELETE {}", url);
        let response = self
            .send(Operation::Delete, self.client.delete(&url))
            .await?;
        Self::decode(Operation::Delete, response).await
    }

    async fn bulk_import(&self, file_name: &str, contents: Vec<u8>) -> ApiResult<MessageResponse> {
        let url = self.url(&["bulk"]).to_string();
        debug!("POST {} ({} bytes)", url, contents.len());
        let part = reqwest::multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .map_err(|e| ApiError::Network {
                operation: Operation::BulkImport,
                message: e.to_string(),
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let request = self.client.post(&url).multipart(form);
        let response = self.send(Operation::BulkImport, request).await?;
        Self::decode(Operation::BulkImport, response).await
    }

    async fn statistics(&self) -> ApiResult<Statistics> {
        let url = self.url(&["statistics"]).to_string();
        debug!("GET {}", url);
        let response = self
            .send(Operation::Statistics, self.client.get(&url))
            .await?;
        let stats: Statistics = Self::decode(Operation::Statistics, response).await?;
        Ok(stats.normalized())
    }

    async fn health(&self) -> ApiResult<serde_json::Value> {
        let url = self.url(&[]).to_string();
        debug!("GET {}", url);
        let response = self.send(Operation::Health, self.client.get(&url)).await?;
        Self::decode(Operation::Health, response).await
    }
}
