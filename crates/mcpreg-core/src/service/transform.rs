//! Registry record normalization
//!
//! Turns one [`RegistryServer`] into the catalog's [`McpServerDetail`]:
//! id resolution, status/version mapping, protocol inference, and the
//! remote-to-front-endpoint mapping with URL screening.

use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::domain::{
    EndpointScheme, FrontEndpoint, McpProtocol, McpServerDetail, RemoteServiceConfig,
    ServerStatus, VersionDetail,
};
use crate::error::{ImportError, Result};
use crate::registry::{Package, RegistryServer, Remote};

/// Substrings that disqualify a URL regardless of protocol
const URL_DENYLIST: [&str; 3] = ["javascript:", "data:", "file:"];

/// Top-level key of a registry list document
pub(crate) const SERVERS_FIELD: &str = "servers";

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Validation rules to apply to a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlFamily {
    /// Must be `http://` or `https://`
    Http,
    /// Command-like targets; rejects traversal and shell chaining
    Stdio,
    /// `dubbo://` or plain http(s)
    Dubbo,
    /// Anything else; rejects traversal
    Other,
}

/// Screen a URL before it is turned into an endpoint.
pub fn is_valid_url(url: &str, family: UrlFamily) -> bool {
    if url.trim().is_empty() {
        return false;
    }

    let lower = url.to_lowercase();
    if URL_DENYLIST.iter().any(|bad| lower.contains(bad)) {
        return false;
    }

    match family {
        UrlFamily::Http => lower.starts_with(HTTP_PREFIX) || lower.starts_with(HTTPS_PREFIX),
        UrlFamily::Stdio => !lower.contains("..") && !lower.contains('&') && !lower.contains('|'),
        UrlFamily::Dubbo => {
            lower.starts_with("dubbo://")
                || lower.starts_with(HTTP_PREFIX)
                || lower.starts_with(HTTPS_PREFIX)
        }
        UrlFamily::Other => !lower.contains(".."),
    }
}

/// Generate an id for a server that arrived without one.
///
/// Name-derived prefix (lowercase `[a-z0-9]` only) plus 8 random hex chars,
/// or a bare 32-char UUID when there is no usable name.
pub fn generate_server_id(name: &str) -> String {
    if name.trim().is_empty() {
        return Uuid::new_v4().simple().to_string();
    }

    let base: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", base, &suffix[..8])
}

/// Fill in a generated id when `server.id` is blank. No-op otherwise.
pub fn ensure_server_id(server: &mut McpServerDetail) {
    if server.id.trim().is_empty() {
        server.id = generate_server_id(&server.name);
    }
}

/// Human-readable launch command for a package, e.g. `npx @scope/server --flag`.
///
/// Returns `None` when the package has no identifier.
pub fn build_package_command(package: &Package) -> Option<String> {
    let identifier = non_blank(package.identifier.as_deref())?;

    let mut command = match non_blank(package.runtime_hint.as_deref()) {
        Some(hint) => format!("{} {}", hint, identifier),
        None => {
            let registry_type = package
                .registry_type
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_default();
            match registry_type.as_str() {
                "npm" => format!("npx {}", identifier),
                "pypi" => format!("python -m {}", identifier),
                "docker" | "oci" => format!("docker run {}", identifier),
                _ => identifier.to_string(),
            }
        }
    };

    let values = package
        .runtime_arguments
        .iter()
        .chain(package.package_arguments.iter())
        .filter_map(|arg| non_blank(arg.value()));
    for value in values {
        command.push(' ');
        command.push_str(value);
    }

    Some(command)
}

/// Converts registry records into normalized catalog records
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryTransformer;

impl RegistryTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one record. Records that cannot be converted are dropped
    /// (`None`) and never fail the surrounding batch.
    pub fn transform(&self, raw: RegistryServer) -> Option<McpServerDetail> {
        let name = raw.name.clone().unwrap_or_default();
        match self.try_transform(raw) {
            Ok(server) => Some(server),
            Err(e) => {
                warn!(
                    server_name = %name,
                    error = %e,
                    "[RegistryTransformer] Dropping record"
                );
                None
            }
        }
    }

    /// Normalize every record of a parsed document.
    ///
    /// Accepts `{"servers": [...]}`, a bare array, or a single record object.
    /// A `servers` value that is not an array yields nothing. Elements that do
    /// not deserialize, or that `transform` drops, are skipped.
    pub fn transform_document(&self, root: serde_json::Value) -> Vec<McpServerDetail> {
        let elements = match root {
            serde_json::Value::Object(mut map) if map.contains_key(SERVERS_FIELD) => {
                match map.remove(SERVERS_FIELD) {
                    Some(serde_json::Value::Array(items)) => items,
                    _ => Vec::new(),
                }
            }
            serde_json::Value::Array(items) => items,
            object @ serde_json::Value::Object(_) => vec![object],
            _ => Vec::new(),
        };

        elements
            .into_iter()
            .filter_map(|element| match serde_json::from_value::<RegistryServer>(element) {
                Ok(raw) => self.transform(raw),
                Err(e) => {
                    debug!(error = %e, "[RegistryTransformer] Skipping unreadable record");
                    None
                }
            })
            .collect()
    }

    fn try_transform(&self, raw: RegistryServer) -> Result<McpServerDetail> {
        // dubbo and unknown transports fall back to stdio
        let protocol = infer_protocol(&raw).unwrap_or_default();

        let remote_service_config = if raw.remotes.is_empty() {
            None
        } else {
            Some(remote_config(&raw.remotes)?)
        };

        for package in &raw.packages {
            if let Some(command) = build_package_command(package) {
                debug!(
                    server_name = raw.name.as_deref().unwrap_or_default(),
                    command = %command,
                    "[RegistryTransformer] Package launch command"
                );
            }
        }

        let mut server = McpServerDetail {
            id: resolve_id(&raw).unwrap_or_default(),
            name: raw.name.clone().unwrap_or_default(),
            description: raw.description.clone(),
            status: ServerStatus::normalize(raw.status.as_deref()),
            protocol,
            repository: raw.repository.clone(),
            version_detail: version_detail(&raw),
            packages: raw.packages,
            remote_service_config,
        };
        ensure_server_id(&mut server);

        Ok(server)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// `_meta` official id, then repository id
fn resolve_id(raw: &RegistryServer) -> Option<String> {
    non_blank(raw.official().and_then(|o| o.id.as_deref()))
        .or_else(|| non_blank(raw.repository.as_ref().and_then(|r| r.id.as_deref())))
        .map(str::to_string)
}

fn version_detail(raw: &RegistryServer) -> Option<VersionDetail> {
    let official = raw.official();
    let release_date = non_blank(raw.published_at.as_deref())
        .or_else(|| non_blank(official.and_then(|o| o.published_at.as_deref())));

    let detail = VersionDetail {
        version: non_blank(raw.version.as_deref()).map(str::to_string),
        release_date: release_date.map(str::to_string),
        is_latest: official.and_then(|o| o.is_latest),
    };

    if detail == VersionDetail::default() {
        None
    } else {
        Some(detail)
    }
}

/// Packages win; otherwise the first remote's transport decides.
fn infer_protocol(raw: &RegistryServer) -> Option<McpProtocol> {
    if !raw.packages.is_empty() {
        return Some(McpProtocol::Stdio);
    }

    let transport = raw.remotes.first()?.transport_type.as_deref()?;
    match transport.trim().to_lowercase().as_str() {
        "sse" => Some(McpProtocol::Sse),
        "streamable" | "streamable-http" => Some(McpProtocol::StreamableHttp),
        _ => None,
    }
}

/// Map declared remotes to front endpoints.
///
/// Remotes with a blank or rejected URL, or without a host, are skipped. A URL
/// that passes screening but cannot be parsed fails the whole record.
fn remote_config(remotes: &[Remote]) -> Result<RemoteServiceConfig> {
    let mut config = RemoteServiceConfig::default();

    for remote in remotes {
        let Some(raw_url) = non_blank(remote.url.as_deref()) else {
            continue;
        };
        let raw_url = raw_url.trim();
        if !is_valid_url(raw_url, UrlFamily::Http) {
            debug!(url = %raw_url, "[RegistryTransformer] Rejected remote URL");
            continue;
        }

        let parsed = Url::parse(raw_url).map_err(|source| ImportError::RemoteUrl {
            url: raw_url.to_string(),
            source,
        })?;
        let Some(host) = parsed.host_str().filter(|h| !h.is_empty()) else {
            continue;
        };

        let scheme = if parsed.scheme() == "https" {
            EndpointScheme::Https
        } else {
            EndpointScheme::Http
        };
        let port = parsed
            .port()
            .filter(|p| *p > 0)
            .unwrap_or_else(|| scheme.default_port());

        // the parser reports `/` for an authority-only URL
        let mut path = if has_explicit_path(raw_url) {
            parsed.path().to_string()
        } else {
            String::new()
        };
        if let Some(query) = parsed.query() {
            path.push('?');
            path.push_str(query);
        }
        if let Some(fragment) = parsed.fragment() {
            path.push('#');
            path.push_str(fragment);
        }

        config.export_path = Some(path.clone());
        config.front_endpoints.push(FrontEndpoint {
            endpoint_data: format!("{}:{}", host, port),
            path: if path.is_empty() { "/".to_string() } else { path },
            transport_type: remote.transport_type.clone(),
            protocol: scheme,
            headers: remote.headers.clone(),
        });
    }

    Ok(config)
}

/// Whether the URL text carries a path after its authority
fn has_explicit_path(raw_url: &str) -> bool {
    raw_url.split_once("://").map_or(true, |(_, rest)| {
        rest.split(['?', '#'])
            .next()
            .unwrap_or_default()
            .contains('/')
    })
}
