//! Per-item import: create, update or skip each validated server.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{DomainEvent, EndpointSpec, McpServerDetail, ServerImportResult, ValidationItem};
use crate::event_bus::EventSender;
use crate::McpServerCatalog;

/// Items to import: every valid item, or the valid items whose id is selected.
///
/// An empty selection counts as no selection.
pub fn select_importable<'a>(
    items: &'a [ValidationItem],
    selection: Option<&HashSet<String>>,
) -> Vec<&'a ValidationItem> {
    let selection = selection.filter(|s| !s.is_empty());
    items
        .iter()
        .filter(|item| item.is_valid())
        .filter(|item| selection.map_or(true, |s| s.contains(&item.server_id)))
        .collect()
}

/// Minimal endpoint spec for the catalog.
///
/// `None` for stdio servers. Otherwise built from the first front endpoint's
/// `host:port`; when that is missing or has no port the spec is empty.
pub fn endpoint_spec_for(server: &McpServerDetail) -> Option<EndpointSpec> {
    if server.protocol.is_stdio() {
        return None;
    }

    let spec = server
        .first_front_endpoint()
        .and_then(|endpoint| endpoint.endpoint_data.rsplit_once(':'))
        .map(|(address, port)| EndpointSpec::direct(address, port))
        .unwrap_or_default();
    Some(spec)
}

pub struct ImportExecutor {
    catalog: Arc<dyn McpServerCatalog>,
    event_sender: Option<EventSender>,
}

impl ImportExecutor {
    pub fn new(catalog: Arc<dyn McpServerCatalog>, event_sender: Option<EventSender>) -> Self {
        Self {
            catalog,
            event_sender,
        }
    }

    /// Import the selected valid items one after another.
    ///
    /// Catalog failures are recorded on the item and never stop the batch.
    pub async fn execute(
        &self,
        namespace: &str,
        items: &[ValidationItem],
        selection: Option<&HashSet<String>>,
        override_existing: bool,
    ) -> Vec<ServerImportResult> {
        let selected = select_importable(items, selection);
        debug!(
            namespace = %namespace,
            selected = selected.len(),
            total = items.len(),
            "[ImportExecutor] Executing import"
        );

        let mut results = Vec::with_capacity(selected.len());
        for item in selected {
            results.push(self.import_one(namespace, item, override_existing).await);
        }
        results
    }

    async fn import_one(
        &self,
        namespace: &str,
        item: &ValidationItem,
        override_existing: bool,
    ) -> ServerImportResult {
        if item.exists && !override_existing {
            debug!(
                server_name = %item.server_name,
                "[ImportExecutor] Skipping existing server"
            );
            return ServerImportResult::skipped_existing(item);
        }

        let server = &item.server;
        let endpoint_spec = endpoint_spec_for(server);

        let outcome = if item.exists {
            self.catalog
                .update(namespace, true, server, endpoint_spec.as_ref(), override_existing)
                .await
        } else {
            self.catalog
                .create(namespace, server, endpoint_spec.as_ref())
                .await
                .map(|_| ())
        };

        match outcome {
            Ok(()) => {
                info!(
                    namespace = %namespace,
                    server_id = %item.server_id,
                    server_name = %item.server_name,
                    overwritten = item.exists,
                    "[ImportExecutor] Imported server"
                );
                if let Some(sender) = &self.event_sender {
                    sender.emit(DomainEvent::ServerImported {
                        namespace: namespace.to_string(),
                        server_id: item.server_id.clone(),
                        server_name: item.server_name.clone(),
                        overwritten: item.exists,
                    });
                }
                ServerImportResult::success(item)
            }
            Err(e) => {
                warn!(
                    namespace = %namespace,
                    server_name = %item.server_name,
                    error = %e,
                    "[ImportExecutor] Failed to import server"
                );
                ServerImportResult::failed(item, format!("Failed to import server: {}", e))
            }
        }
    }
}
