//! Domain services
//!
//! The import pipeline stages: fetch, normalize, validate, execute, fold.

pub mod app_settings_service;
mod import_dispatcher;
mod import_executor;
mod registry_api_client;
mod result_aggregator;
mod server_validation;
mod transform;

pub use app_settings_service::{keys, AppSettingsService};
pub use import_dispatcher::ImportDispatcher;
pub use import_executor::{endpoint_spec_for, select_importable, ImportExecutor};
pub use registry_api_client::*;
pub use result_aggregator::ResultAggregator;
pub use server_validation::CatalogServerValidator;
pub use transform::{
    build_package_command, ensure_server_id, generate_server_id, is_valid_url,
    RegistryTransformer, UrlFamily,
};
