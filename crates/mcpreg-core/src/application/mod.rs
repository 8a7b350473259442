//! Application Services - Orchestration layer with event emission
//!
//! Application services sit between callers (admin handlers, jobs) and the
//! domain services. They orchestrate the pipeline stages and emit events
//! after catalog writes.
//!
//! # Usage
//!
//! ```ignore
//! let event_bus = EventBus::new();
//! let fetcher = Arc::new(RegistryPageFetcher::from_settings(&settings).await?);
//! let imports = ImportAppService::new(catalog, validator, fetcher, event_bus.sender());
//!
//! let response = imports.execute_import("public", &request).await;
//! // -> Emits ServerImported per written server, then ImportCompleted
//! ```

mod import;

pub use import::ImportAppService;
