//! Normalized server record - the catalog-side representation of an
//! imported registry server.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::registry::{KeyValueInput, Package, Repository};

/// Transport protocol of a catalog server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum McpProtocol {
    /// Local process via stdio
    #[default]
    Stdio,
    /// Server-sent events
    Sse,
    /// Streamable HTTP (MCP spec)
    StreamableHttp,
}

impl McpProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            McpProtocol::Stdio => "stdio",
            McpProtocol::Sse => "sse",
            McpProtocol::StreamableHttp => "streamable-http",
        }
    }

    pub fn is_stdio(&self) -> bool {
        matches!(self, McpProtocol::Stdio)
    }
}

impl fmt::Display for McpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a catalog server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    #[default]
    Active,
    Deprecated,
}

impl ServerStatus {
    /// Map a registry status string; unknown or missing values are active.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("deprecated") => ServerStatus::Deprecated,
            _ => ServerStatus::Active,
        }
    }
}

/// Version information carried over from the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_latest: Option<bool>,
}

/// URL scheme of a front endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointScheme {
    Http,
    Https,
}

impl EndpointScheme {
    /// Port implied when the URL does not carry one
    pub fn default_port(&self) -> u16 {
        match self {
            EndpointScheme::Http => 80,
            EndpointScheme::Https => 443,
        }
    }
}

/// One reachable address of a remote server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontEndpoint {
    /// `host:port`
    pub endpoint_data: String,
    /// Raw path plus query and fragment, `/` when empty
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_type: Option<String>,
    pub protocol: EndpointScheme,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<KeyValueInput>,
}

/// Remote access configuration derived from registry remotes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_path: Option<String>,
    #[serde(default)]
    pub front_endpoints: Vec<FrontEndpoint>,
}

/// The canonical internal representation of an imported server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpServerDetail {
    /// Never blank once normalization is done
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub status: ServerStatus,

    pub protocol: McpProtocol,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_detail: Option<VersionDetail>,

    /// Registry packages, copied verbatim
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<Package>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_service_config: Option<RemoteServiceConfig>,
}

impl McpServerDetail {
    /// First front endpoint of the remote config, if any
    pub fn first_front_endpoint(&self) -> Option<&FrontEndpoint> {
        self.remote_service_config
            .as_ref()
            .and_then(|c| c.front_endpoints.first())
    }
}

/// Kind of endpoint handed to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EndpointType {
    /// Address/port reached directly, no service discovery
    Direct,
}

/// Minimal endpoint specification passed to the catalog on create/update.
///
/// `data` holds `address` and `port` when they could be derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_type: Option<EndpointType>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl EndpointSpec {
    pub fn direct(address: impl Into<String>, port: impl Into<String>) -> Self {
        let mut data = BTreeMap::new();
        data.insert("address".to_string(), address.into());
        data.insert("port".to_string(), port.into());
        Self {
            endpoint_type: Some(EndpointType::Direct),
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.endpoint_type.is_none() && self.data.is_empty()
    }
}
