//! # mcpreg core library
//!
//! Imports third-party MCP registry descriptions (inline JSON, uploaded file
//! or paginated registry endpoint) into a managed server catalog.
//!
//! ## Modules
//!
//! - `domain` - Normalized server record, import request/result types, events
//! - `registry` - Wire schema of registry documents
//! - `repository` - Collaborator traits (catalog, validator, settings)
//! - `service` - Pipeline stages and settings
//! - `application` - Import orchestration with event emission
//! - `event_bus` - Event distribution
//! - `error` - Pipeline error taxonomy

pub mod application;
pub mod domain;
pub mod error;
pub mod event_bus;
pub mod registry;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use domain::*;
pub use error::ImportError;
pub use repository::*;
pub use service::*;

pub use application::ImportAppService;
pub use event_bus::{EventBus, EventReceiver, EventSender};
