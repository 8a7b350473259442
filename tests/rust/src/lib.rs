//! Shared test utilities and fixtures for mcpreg integration tests.

pub use mcpreg_core::domain::{
    DomainEvent, ImportRequest, ImportResponse, ImportStatus, McpProtocol, McpServerDetail,
    ValidationReport,
};


/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mcpreg_core=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Event testing utilities
pub mod events {
    use mcpreg_core::DomainEvent;
    use tokio::sync::broadcast;

    /// Everything already sitting in the receiver, without waiting
    pub fn drain_events(rx: &mut broadcast::Receiver<DomainEvent>) -> Vec<DomainEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Names of `ServerImported` events, in emission order
    pub fn imported_names(events: &[DomainEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                DomainEvent::ServerImported { server_name, .. } => Some(server_name.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Registry documents and normalized servers for tests
pub mod fixtures {
    use std::sync::Arc;

    use mcpreg_core::domain::{
        EndpointScheme, FrontEndpoint, McpProtocol, McpServerDetail, RemoteServiceConfig,
        ServerStatus,
    };
    use mcpreg_core::service::{RegistryClientConfig, RegistryPageFetcher};
    use serde_json::{json, Value};

    /// npm-distributed record without an id
    pub fn package_record(name: &str) -> Value {
        json!({
            "name": name,
            "description": format!("Test server: {}", name),
            "packages": [{ "registryType": "npm", "identifier": format!("@test/{}", name) }]
        })
    }

    /// Remote-only record
    pub fn remote_record(name: &str, transport: &str, url: &str) -> Value {
        json!({
            "name": name,
            "remotes": [{ "transport_type": transport, "url": url }]
        })
    }

    /// Record carrying an official registry id, so its id is stable
    pub fn official_record(id: &str, name: &str) -> Value {
        json!({
            "_meta": {
                "io.modelcontextprotocol.registry/official": {
                    "serverId": id,
                    "publishedAt": "2025-09-01T00:00:00Z",
                    "isLatest": true
                }
            },
            "name": name,
            "version": "1.0.0",
            "packages": [{ "registryType": "pypi", "identifier": name }]
        })
    }

    /// Registry list response body
    pub fn registry_page(records: Vec<Value>, next_cursor: Option<&str>) -> Value {
        let count = records.len();
        json!({
            "servers": records,
            "metadata": { "next_cursor": next_cursor, "count": count }
        })
    }

    pub fn stdio_server(name: &str) -> McpServerDetail {
        McpServerDetail {
            id: format!("{}-id", name),
            name: name.to_string(),
            description: None,
            status: ServerStatus::Active,
            protocol: McpProtocol::Stdio,
            repository: None,
            version_detail: None,
            packages: Vec::new(),
            remote_service_config: None,
        }
    }

    /// SSE server with one front endpoint at `endpoint_data` (`host:port`)
    pub fn sse_server(name: &str, endpoint_data: &str) -> McpServerDetail {
        McpServerDetail {
            protocol: McpProtocol::Sse,
            remote_service_config: Some(RemoteServiceConfig {
                export_path: Some("/sse".to_string()),
                front_endpoints: vec![FrontEndpoint {
                    endpoint_data: endpoint_data.to_string(),
                    path: "/sse".to_string(),
                    transport_type: Some("sse".to_string()),
                    protocol: EndpointScheme::Https,
                    headers: Vec::new(),
                }],
            }),
            ..stdio_server(name)
        }
    }

    /// Fetcher with default configuration and no token
    pub fn fetcher() -> Arc<RegistryPageFetcher> {
        Arc::new(
            RegistryPageFetcher::new(RegistryClientConfig::default())
                .expect("Failed to build registry client"),
        )
    }
}
