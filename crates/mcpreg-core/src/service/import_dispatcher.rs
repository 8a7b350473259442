//! Routes an import request to the right ingestion strategy and returns
//! normalized servers.

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{ImportRequest, McpServerDetail, SourceKind};
use crate::error::{ImportError, Result};
use crate::registry::RegistryServer;
use crate::service::registry_api_client::RegistryPageFetcher;
use crate::service::transform::{ensure_server_id, RegistryTransformer, SERVERS_FIELD};

pub struct ImportDispatcher {
    fetcher: Arc<RegistryPageFetcher>,
    transformer: RegistryTransformer,
}

impl ImportDispatcher {
    pub fn new(fetcher: Arc<RegistryPageFetcher>) -> Self {
        Self {
            fetcher,
            transformer: RegistryTransformer::new(),
        }
    }

    /// Normalize the request payload into catalog records.
    ///
    /// Every returned record has a non-blank id.
    pub async fn normalize(&self, request: &ImportRequest) -> Result<Vec<McpServerDetail>> {
        let kind = request.source_kind()?;
        debug!(import_type = %kind, "[ImportDispatcher] Normalizing import payload");

        let mut servers = match kind {
            SourceKind::File => self.from_file(&request.data)?,
            SourceKind::Json => self.from_json(&request.data)?,
            SourceKind::Url => self.from_url(request).await?,
        };
        servers.iter_mut().for_each(ensure_server_id);

        info!(
            import_type = %kind,
            count = servers.len(),
            "[ImportDispatcher] Normalized servers"
        );
        Ok(servers)
    }

    /// Any number of records; unreadable elements are skipped
    fn from_file(&self, data: &str) -> Result<Vec<McpServerDetail>> {
        let root: serde_json::Value =
            serde_json::from_str(data).map_err(|e| ImportError::parse("import file", e))?;
        Ok(self.transformer.transform_document(root))
    }

    /// Exactly one record expected
    fn from_json(&self, data: &str) -> Result<Vec<McpServerDetail>> {
        let root: serde_json::Value =
            serde_json::from_str(data).map_err(|e| ImportError::parse("import json", e))?;

        let element = match root {
            serde_json::Value::Object(mut map) if map.contains_key(SERVERS_FIELD) => {
                match map.remove(SERVERS_FIELD) {
                    Some(serde_json::Value::Array(items)) if !items.is_empty() => {
                        items.into_iter().next()
                    }
                    _ => None,
                }
                .ok_or_else(|| {
                    ImportError::invalid("Invalid json import: 'servers' is not an array or empty")
                })?
            }
            serde_json::Value::Array(items) => items
                .into_iter()
                .next()
                .ok_or_else(|| ImportError::invalid("Invalid json import: empty array"))?,
            other => other,
        };

        let raw: RegistryServer = serde_json::from_value(element)
            .map_err(|e| ImportError::invalid(format!("Invalid json import: {}", e)))?;
        Ok(self.transformer.transform(raw).into_iter().collect())
    }

    async fn from_url(&self, request: &ImportRequest) -> Result<Vec<McpServerDetail>> {
        let base = request.data.trim();
        if base.is_empty() {
            return Err(ImportError::invalid("URL is blank"));
        }

        let search = request.search.as_deref();
        if request.fetch_all_pages() {
            return self.fetcher.fetch_all(base, search).await;
        }

        let page = self
            .fetcher
            .fetch_page(base, request.cursor.as_deref(), request.limit, search)
            .await?;
        Ok(page.servers)
    }
}
