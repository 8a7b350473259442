//! Wire types for third-party MCP registry documents
//!
//! These mirror what registries publish, which differs between generations
//! of the registry API: older documents use snake_case keys, newer ones
//! camelCase. Every field is optional and unknown keys are ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// JSON key under `_meta` carrying the official registry metadata
pub const OFFICIAL_META_KEY: &str = "io.modelcontextprotocol.registry/official";

/// Reads an explicit `null` the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One server as described by a registry (file, inline JSON or HTTP page)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryServer {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// "active" / "deprecated" (anything else is treated as active)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, alias = "publishedAt", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Locally launched distributions (npm, pypi, oci, ...)
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub packages: Vec<Package>,

    /// Network-reachable endpoints
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub remotes: Vec<Remote>,

    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl RegistryServer {
    /// Official registry metadata, if the record carries any
    pub fn official(&self) -> Option<&OfficialMeta> {
        self.meta.as_ref().and_then(|m| m.official.as_ref())
    }
}

/// Source repository of a server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subfolder: Option<String>,
}

/// `_meta` block of a registry record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(
        rename = "io.modelcontextprotocol.registry/official",
        alias = "official",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub official: Option<OfficialMeta>,
}

/// Metadata the official registry attaches to each published version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialMeta {
    #[serde(
        default,
        alias = "serverId",
        alias = "server_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(default, alias = "versionId", skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    #[serde(default, alias = "publishedAt", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, alias = "isLatest", skip_serializing_if = "Option::is_none")]
    pub is_latest: Option<bool>,
}

/// A locally launched (stdio) distribution of a server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// npm, pypi, docker, oci, nuget, ...
    #[serde(default, alias = "registryType", skip_serializing_if = "Option::is_none")]
    pub registry_type: Option<String>,

    #[serde(default, alias = "registryBaseUrl", skip_serializing_if = "Option::is_none")]
    pub registry_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, alias = "fileSha256", skip_serializing_if = "Option::is_none")]
    pub file_sha256: Option<String>,

    /// Launcher to use verbatim (npx, uvx, dnx, ...)
    #[serde(default, alias = "runtimeHint", skip_serializing_if = "Option::is_none")]
    pub runtime_hint: Option<String>,

    #[serde(
        default,
        alias = "runtimeArguments",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub runtime_arguments: Vec<Argument>,

    #[serde(
        default,
        alias = "packageArguments",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub package_arguments: Vec<Argument>,

    #[serde(
        default,
        alias = "environmentVariables",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub environment_variables: Vec<KeyValueInput>,
}

/// Launch argument: either `--name value` style or a bare positional value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Argument {
    Named(NamedArgument),
    Positional(PositionalArgument),
}

impl Argument {
    /// The literal value of the argument, whichever shape it has
    pub fn value(&self) -> Option<&str> {
        match self {
            Argument::Named(arg) => arg.value.as_deref(),
            Argument::Positional(arg) => arg.value.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedArgument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, alias = "valueHint", skip_serializing_if = "Option::is_none")]
    pub value_hint: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "isRequired", skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    #[serde(default, alias = "isRepeated", skip_serializing_if = "Option::is_none")]
    pub is_repeated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionalArgument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, alias = "valueHint", skip_serializing_if = "Option::is_none")]
    pub value_hint: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "isRequired", skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    #[serde(default, alias = "isRepeated", skip_serializing_if = "Option::is_none")]
    pub is_repeated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Network endpoint declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Remote {
    /// "sse", "streamable-http", ...
    #[serde(
        default,
        alias = "transportType",
        alias = "type",
        skip_serializing_if = "Option::is_none"
    )]
    pub transport_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub headers: Vec<KeyValueInput>,
}

/// Header or environment variable declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, alias = "isRequired", skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    #[serde(default, alias = "isSecret", skip_serializing_if = "Option::is_none")]
    pub is_secret: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Typed shape of a registry list response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryServerList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub servers: Vec<RegistryServer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ListMetadata>,
}

/// Pagination block of a list response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetadata {
    #[serde(default, alias = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}
