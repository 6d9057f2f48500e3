//! Cached access to the politicians API.
//!
//! Reads go through the [`QueryCache`]; mutations go straight to the API and,
//! on success only, invalidate the namespaces whose data they changed.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::types::{
    ListParams, MessageResponse, PageResult, Politician, PoliticianUpdate, Statistics,
};
use crate::api::{ApiResult, PoliticiansApi};
use crate::cache::{QueryCache, QueryKey, POLITICIANS, STATISTICS};
use crate::errors::{ApiError, ImportError, PoliticosError};
use crate::telemetry::{sanitize_for_log, track_request};

pub struct PoliticianService {
    api: Arc<dyn PoliticiansApi>,
    cache: Arc<QueryCache>,
}

/// Cache key of a list query, `["politicians", {page, perPage, name, gender}]`.
pub fn list_key(params: &ListParams) -> QueryKey {
    QueryKey::new(POLITICIANS)
        .with_opt("page", params.page)
        .with_opt("perPage", params.per_page)
        .with_opt("name", params.name.as_deref().filter(|n| !n.is_empty()))
        .with_opt("party", params.party.as_deref().filter(|p| !p.is_empty()))
        .with_opt("gender", params.gender)
}

pub fn detail_key(id: &str) -> QueryKey {
    QueryKey::new(POLITICIANS).with("id", id)
}

pub fn statistics_key() -> QueryKey {
    QueryKey::new(STATISTICS)
}

impl PoliticianService {
    pub fn new(api: Arc<dyn PoliticiansApi>, cache: Arc<QueryCache>) -> Self {
        Self { api, cache }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn api(&self) -> &Arc<dyn PoliticiansApi> {
        &self.api
    }

    /// A page of politicians. Failures are never cached.
    pub async fn list(&self, params: &ListParams) -> ApiResult<PageResult> {
        let key = list_key(params);
        if let Some(page) = self.cache.get::<PageResult>(&key) {
            return Ok(page);
        }
        let generation = self.cache.generation(POLITICIANS);
        let page = track_request("list", || self.api.list(params)).await?;
        self.cache.insert_if_current(key, &page, generation);
        Ok(page)
    }

    /// Drop the cached page for `params` and fetch it again.
    pub async fn refresh_list(&self, params: &ListParams) -> ApiResult<PageResult> {
        self.cache.invalidate(&list_key(params));
        self.list(params).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Politician> {
        let key = detail_key(id);
        if let Some(politician) = self.cache.get::<Politician>(&key) {
            return Ok(politician);
        }
        let generation = self.cache.generation(POLITICIANS);
        let politician = track_request("get", || self.api.get(id)).await?;
        self.cache.insert_if_current(key, &politician, generation);
        Ok(politician)
    }

    pub async fn statistics(&self) -> ApiResult<Statistics> {
        let key = statistics_key();
        if let Some(stats) = self.cache.get::<Statistics>(&key) {
            return Ok(stats);
        }
        let generation = self.cache.generation(STATISTICS);
        let stats = track_request("statistics", || self.api.statistics()).await?;
        self.cache.insert_if_current(key, &stats, generation);
        Ok(stats)
    }

    pub async fn refresh_statistics(&self) -> ApiResult<Statistics> {
        self.cache.invalidate(&statistics_key());
        self.statistics().await
    }

    pub async fn update(&self, id: &str, update: &PoliticianUpdate) -> ApiResult<MessageResponse> {
        let result = self.api.update(id, update).await;
        self.settle_mutation(id, result)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<MessageResponse> {
        let result = self.api.delete(id).await;
        self.settle_mutation(id, result)
    }

    pub async fn bulk_import(&self, file_name: &str, contents: Vec<u8>) -> ApiResult<MessageResponse> {
        let result = self.api.bulk_import(file_name, contents).await;
        self.settle_mutation(file_name, result)
    }

    /// Validate and upload a CSV file from disk.
    pub async fn import_file(&self, path: &Path) -> Result<MessageResponse, PoliticosError> {
        let (file_name, contents) = read_import_file(path).await?;
        Ok(self.bulk_import(&file_name, contents).await?)
    }

    /// Invalidate on success; log and pass through on failure.
    fn settle_mutation(
        &self,
        target: &str,
        result: ApiResult<MessageResponse>,
    ) -> ApiResult<MessageResponse> {
        match result {
            Ok(ack) => {
                let removed = self.cache.invalidate_namespace(POLITICIANS)
                    + self.cache.invalidate_namespace(STATISTICS);
                info!(
                    "{} succeeded: {} ({} cached queries invalidated)",
                    sanitize_for_log(target),
                    sanitize_for_log(&ack.message),
                    removed
                );
                Ok(ack)
            }
            Err(e) => {
                warn!("{} on {} failed: {}", e.operation(), sanitize_for_log(target), e);
                Err(e)
            }
        }
    }
}

/// Read an import file, refusing anything but a non-empty `.csv`.
pub async fn read_import_file(path: &Path) -> Result<(String, Vec<u8>), ImportError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(ImportError::NotCsv {
            path: path.to_path_buf(),
        });
    }

    let contents = tokio::fs::read(path)
        .await
        .map_err(|e| ImportError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    if contents.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(ImportError::Empty {
            path: path.to_path_buf(),
        });
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv")
        .to_string();
    debug!("read {} bytes from {}", contents.len(), path.display());
    Ok((file_name, contents))
}

/// Result of a mutation as seen by a dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Done(String),
    Failed(String),
}

impl From<ApiError> for MutationOutcome {
    fn from(e: ApiError) -> Self {
        MutationOutcome::Failed(e.user_message())
    }
}

impl From<ApiResult<MessageResponse>> for MutationOutcome {
    fn from(result: ApiResult<MessageResponse>) -> Self {
        match result {
            Ok(ack) => MutationOutcome::Done(ack.message),
            Err(e) => e.into(),
        }
    }
}
