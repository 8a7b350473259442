//! Collaborator traits for catalog storage, validation and settings
//!
//! These traits define what the import pipeline needs from the rest of the
//! system without specifying the implementation (database, remote service,
//! in-memory).

use async_trait::async_trait;

use crate::domain::{EndpointSpec, McpServerDetail, ValidationReport};

/// Result type for repository operations
pub type RepoResult<T> = anyhow::Result<T>;

/// Managed catalog of MCP servers, partitioned by namespace
#[async_trait]
pub trait McpServerCatalog: Send + Sync {
    /// Look up a server by name within a namespace
    async fn get(&self, namespace: &str, name: &str) -> RepoResult<Option<McpServerDetail>>;

    /// Create a new catalog entry; returns the id the catalog stored it under
    async fn create(
        &self,
        namespace: &str,
        server: &McpServerDetail,
        endpoint_spec: Option<&EndpointSpec>,
    ) -> RepoResult<String>;

    /// Update an existing entry
    ///
    /// `latest` marks the written version as the latest one; `override_existing`
    /// allows replacing a version that is already published.
    async fn update(
        &self,
        namespace: &str,
        latest: bool,
        server: &McpServerDetail,
        endpoint_spec: Option<&EndpointSpec>,
        override_existing: bool,
    ) -> RepoResult<()>;
}

/// Batch validation of normalized servers before import
#[async_trait]
pub trait ServerValidator: Send + Sync {
    async fn validate(
        &self,
        namespace: &str,
        servers: &[McpServerDetail],
    ) -> RepoResult<ValidationReport>;
}

/// Key/value store backing application settings
#[async_trait]
pub trait AppSettingsRepository: Send + Sync {
    /// Get a setting value by key
    async fn get(&self, key: &str) -> RepoResult<Option<String>>;

    /// Set a setting value (insert or update)
    async fn set(&self, key: &str, value: &str) -> RepoResult<()>;

    /// Delete a setting by key
    async fn delete(&self, key: &str) -> RepoResult<()>;
}
