//! Catalog-backed validation of an import batch.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::domain::{McpServerDetail, ValidationItem, ValidationReport};
use crate::repository::RepoResult;
use crate::{McpServerCatalog, ServerValidator};

/// Validates servers against each other and against the catalog.
///
/// An item is invalid when its name is blank, repeats an earlier name in the
/// batch, or when a remote server has no usable endpoint. Valid items are
/// flagged `exists` when the catalog already has that name.
pub struct CatalogServerValidator {
    catalog: Arc<dyn McpServerCatalog>,
}

impl CatalogServerValidator {
    pub fn new(catalog: Arc<dyn McpServerCatalog>) -> Self {
        Self { catalog }
    }
}

fn local_errors(server: &McpServerDetail, seen: &mut HashSet<String>) -> Vec<String> {
    let mut errors = Vec::new();
    let name = server.name.trim();

    if name.is_empty() {
        errors.push("Server name is required".to_string());
    } else if !seen.insert(name.to_string()) {
        errors.push(format!("Duplicate server name in import: {}", name));
    }

    if !server.protocol.is_stdio() && server.first_front_endpoint().is_none() {
        errors.push(format!(
            "No valid remote endpoint for {} server",
            server.protocol
        ));
    }
    errors
}

#[async_trait]
impl ServerValidator for CatalogServerValidator {
    async fn validate(
        &self,
        namespace: &str,
        servers: &[McpServerDetail],
    ) -> RepoResult<ValidationReport> {
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(servers.len());

        for server in servers {
            let errors = local_errors(server, &mut seen);
            if !errors.is_empty() {
                items.push(ValidationItem::invalid(server.clone(), errors));
                continue;
            }

            let exists = self.catalog.get(namespace, server.name.trim()).await?.is_some();
            items.push(ValidationItem::valid(server.clone(), exists));
        }

        let report = ValidationReport::from_items(items);
        debug!(
            namespace = %namespace,
            total = servers.len(),
            invalid = report.invalid_count,
            "[CatalogServerValidator] Validated import batch"
        );
        Ok(report)
    }
}
