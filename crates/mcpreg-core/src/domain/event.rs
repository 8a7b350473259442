//! Domain events raised by the import pipeline
//!
//! Emitted by [`ImportAppService`](crate::application::ImportAppService)
//! after catalog writes. Consumers (audit log, UI refresh) subscribe through
//! the [`EventBus`](crate::event_bus::EventBus).

use serde::{Deserialize, Serialize};

/// Events serialize with a `type` field containing the snake_case variant name:
/// ```json
/// { "type": "server_imported", "namespace": "public", "server_id": "...", ... }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A server was written to the catalog (created, or updated in place)
    ServerImported {
        namespace: String,
        server_id: String,
        server_name: String,
        /// True when an existing entry was overwritten
        overwritten: bool,
    },

    /// An import batch finished (including batches aborted before execution)
    ImportCompleted {
        namespace: String,
        total: usize,
        success: usize,
        failed: usize,
        skipped: usize,
    },
}

impl DomainEvent {
    /// Stable snake_case name used in logs
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ServerImported { .. } => "server_imported",
            Self::ImportCompleted { .. } => "import_completed",
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            Self::ServerImported { namespace, .. } | Self::ImportCompleted { namespace, .. } => {
                namespace
            }
        }
    }
}
