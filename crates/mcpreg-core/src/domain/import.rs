//! Import request, validation and result types

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::McpServerDetail;
use crate::error::ImportError;

/// Page limit value requesting every page of a URL source
pub const FETCH_ALL_PAGES: i32 = -1;

/// Where the import payload comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Uploaded file holding any number of servers
    File,
    /// Inline JSON describing exactly one server
    Json,
    /// Registry HTTP endpoint
    Url,
}

impl FromStr for SourceKind {
    type Err = ImportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "json" => Ok(Self::Json),
            "url" => Ok(Self::Url),
            _ => Err(ImportError::UnsupportedSourceKind(value.to_string())),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::File => "file",
            SourceKind::Json => "json",
            SourceKind::Url => "url",
        })
    }
}

/// A request to import servers into a namespace
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// "file", "json" or "url"
    pub import_type: String,

    /// JSON text for file/json, registry base URL for url
    pub data: String,

    #[serde(default)]
    pub cursor: Option<String>,

    /// Page size for url imports; `-1` fetches every page
    #[serde(default)]
    pub limit: Option<i32>,

    #[serde(default)]
    pub search: Option<String>,

    #[serde(default)]
    pub override_existing: bool,

    #[serde(default)]
    pub skip_invalid: bool,

    /// Server ids to import; empty or absent means all valid servers
    #[serde(default)]
    pub selected_servers: Option<HashSet<String>>,
}

impl ImportRequest {
    pub fn new(import_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            import_type: import_type.into(),
            data: data.into(),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, cursor: Option<&str>, limit: Option<i32>) -> Self {
        self.cursor = cursor.map(str::to_string);
        self.limit = limit;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_override_existing(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    pub fn with_skip_invalid(mut self, skip_invalid: bool) -> Self {
        self.skip_invalid = skip_invalid;
        self
    }

    pub fn with_selection<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_servers = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn source_kind(&self) -> Result<SourceKind, ImportError> {
        self.import_type.parse()
    }

    pub fn fetch_all_pages(&self) -> bool {
        self.limit == Some(FETCH_ALL_PAGES)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Valid,
    Invalid,
}

/// Validation outcome for one normalized server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationItem {
    pub server: McpServerDetail,
    pub status: ValidationStatus,
    pub server_id: String,
    pub server_name: String,
    /// Already present in the catalog
    pub exists: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ValidationItem {
    pub fn valid(server: McpServerDetail, exists: bool) -> Self {
        Self {
            server_id: server.id.clone(),
            server_name: server.name.clone(),
            server,
            status: ValidationStatus::Valid,
            exists,
            errors: Vec::new(),
        }
    }

    pub fn invalid(server: McpServerDetail, errors: Vec<String>) -> Self {
        Self {
            server_id: server.id.clone(),
            server_name: server.name.clone(),
            server,
            status: ValidationStatus::Invalid,
            exists: false,
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}

/// Result of validating a batch of servers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub servers: Vec<ValidationItem>,
    #[serde(default)]
    pub invalid_count: usize,
}

impl ValidationReport {
    /// Build a report from items; validity and counts follow the items.
    pub fn from_items(servers: Vec<ValidationItem>) -> Self {
        let errors: Vec<String> = servers
            .iter()
            .filter(|item| !item.is_valid())
            .flat_map(|item| {
                item.errors
                    .iter()
                    .map(move |e| format!("{}: {}", item.server_name, e))
            })
            .collect();
        let invalid_count = servers.iter().filter(|item| !item.is_valid()).count();
        Self {
            is_valid: invalid_count == 0,
            errors,
            servers,
            invalid_count,
        }
    }

    /// Report for a batch that could not even be normalized
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            errors: vec![message.into()],
            servers: Vec::new(),
            invalid_count: 0,
        }
    }

    pub fn valid_count(&self) -> usize {
        self.servers.iter().filter(|item| item.is_valid()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Success,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictType {
    /// A server with the same name is already in the catalog
    Existing,
}

/// Outcome of importing one server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerImportResult {
    pub server_id: String,
    pub server_name: String,
    pub status: ImportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_type: Option<ConflictType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ServerImportResult {
    fn new(item: &ValidationItem, status: ImportStatus) -> Self {
        Self {
            server_id: item.server_id.clone(),
            server_name: item.server_name.clone(),
            status,
            conflict_type: None,
            error_message: None,
        }
    }

    pub fn success(item: &ValidationItem) -> Self {
        Self::new(item, ImportStatus::Success)
    }

    pub fn skipped_existing(item: &ValidationItem) -> Self {
        Self {
            conflict_type: Some(ConflictType::Existing),
            ..Self::new(item, ImportStatus::Skipped)
        }
    }

    pub fn failed(item: &ValidationItem, message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Self::new(item, ImportStatus::Failed)
        }
    }
}

/// Batch-level import response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub total_count: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub skipped_count: usize,
    #[serde(default)]
    pub results: Vec<ServerImportResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// One page of normalized servers from a registry endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    pub servers: Vec<McpServerDetail>,
    /// Opaque cursor for the following page; `None` on the last page
    pub next_cursor: Option<String>,
}
