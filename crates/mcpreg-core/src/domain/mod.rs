//! Domain entities, value objects, and events
//!
//! - Normalized server record (McpServerDetail and its parts)
//! - Import request / validation / result types
//! - Domain events emitted by the import application service

mod event;
mod import;
mod server;

pub use event::DomainEvent;
pub use import::*;
pub use server::*;
