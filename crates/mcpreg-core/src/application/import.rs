//! Import Application Service
//!
//! Runs an import end to end: normalize, validate, gate, execute, fold.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{DomainEvent, ImportRequest, ImportResponse, ValidationReport};
use crate::event_bus::EventSender;
use crate::repository::{McpServerCatalog, ServerValidator};
use crate::service::{
    select_importable, ImportDispatcher, ImportExecutor, RegistryPageFetcher, ResultAggregator,
};

/// Application service for importing registry servers into the catalog
pub struct ImportAppService {
    dispatcher: ImportDispatcher,
    validator: Arc<dyn ServerValidator>,
    executor: ImportExecutor,
    event_sender: EventSender,
}

impl ImportAppService {
    pub fn new(
        catalog: Arc<dyn McpServerCatalog>,
        validator: Arc<dyn ServerValidator>,
        fetcher: Arc<RegistryPageFetcher>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            dispatcher: ImportDispatcher::new(fetcher),
            validator,
            executor: ImportExecutor::new(catalog, Some(event_sender.clone())),
            event_sender,
        }
    }

    /// Normalize and validate without writing anything.
    ///
    /// Failures (bad payload, registry errors, validator errors) come back as
    /// an invalid report rather than an error.
    pub async fn validate_import(&self, namespace: &str, request: &ImportRequest) -> ValidationReport {
        match self.normalize_and_validate(namespace, request).await {
            Ok(report) => report,
            Err(e) => {
                warn!(
                    namespace = %namespace,
                    import_type = %request.import_type,
                    error = %e,
                    "[ImportAppService] Import validation failed"
                );
                ValidationReport::failed(format!("Import validation failed: {}", e))
            }
        }
    }

    /// Import servers into `namespace`.
    ///
    /// Emits: `ServerImported` per written server, then `ImportCompleted`.
    pub async fn execute_import(&self, namespace: &str, request: &ImportRequest) -> ImportResponse {
        info!(
            namespace = %namespace,
            import_type = %request.import_type,
            override_existing = request.override_existing,
            skip_invalid = request.skip_invalid,
            "[ImportAppService] Starting import"
        );

        let report = self.validate_import(namespace, request).await;

        if let Some(aborted) = ResultAggregator::gate(&report, request.skip_invalid) {
            return self.finish(namespace, aborted);
        }

        let selection = request.selected_servers.as_ref();
        if !report.is_valid && select_importable(&report.servers, selection).is_empty() {
            return self.finish(namespace, ResultAggregator::no_importable_servers(&report));
        }

        let results = self
            .executor
            .execute(namespace, &report.servers, selection, request.override_existing)
            .await;
        let response = ResultAggregator::fold(results, &report, request.skip_invalid);
        self.finish(namespace, response)
    }

    async fn normalize_and_validate(
        &self,
        namespace: &str,
        request: &ImportRequest,
    ) -> Result<ValidationReport> {
        let servers = self.dispatcher.normalize(request).await?;
        self.validator.validate(namespace, &servers).await
    }

    fn finish(&self, namespace: &str, response: ImportResponse) -> ImportResponse {
        info!(
            namespace = %namespace,
            success = response.success,
            total = response.total_count,
            imported = response.success_count,
            failed = response.failed_count,
            skipped = response.skipped_count,
            message = response.error_message.as_deref().unwrap_or_default(),
            "[ImportAppService] Import finished"
        );

        self.event_sender.emit(DomainEvent::ImportCompleted {
            namespace: namespace.to_string(),
            total: response.total_count,
            success: response.success_count,
            failed: response.failed_count,
            skipped: response.skipped_count,
        });
        response
    }
}
