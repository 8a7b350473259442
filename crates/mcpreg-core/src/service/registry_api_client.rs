//! HTTP client for paginated third-party MCP registries.
//!
//! One GET per page, strictly sequential. `fetch_all` follows `next_cursor`
//! until the registry stops returning one or the page guard is hit.

use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::{McpServerDetail, PageResult};
use crate::error::{ImportError, Result};
use crate::registry::RegistryServerList;
use crate::service::app_settings_service::AppSettingsService;
use crate::service::transform::{ensure_server_id, RegistryTransformer};

/// Upper bound on pages requested by one `fetch_all`
pub const MAX_PAGES_GUARD: usize = 200;

/// Page size used while walking every page
pub const FETCH_ALL_PAGE_SIZE: i32 = 30;

/// Environment variable consulted when no token is configured in settings
pub const REGISTRY_TOKEN_ENV: &str = "MCP_REGISTRY_TOKEN";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_MAX_REDIRECTS: usize = 10;

// ============================================
// Configuration
// ============================================

/// Configuration for [`RegistryPageFetcher`]'s HTTP client
#[derive(Debug, Clone)]
pub struct RegistryClientConfig {
    /// Sent as `Authorization: Bearer <token>` when present
    pub bearer_token: Option<String>,
    pub connect_timeout: Duration,
    /// Whole-request timeout (connect + response + body)
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for RegistryClientConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: format!("mcpreg/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RegistryClientConfig {
    /// Build from app settings, falling back to `MCP_REGISTRY_TOKEN` for the token.
    pub async fn from_settings(settings: &AppSettingsService) -> Self {
        let defaults = Self::default();
        Self {
            bearer_token: pick_token(
                settings.get_registry_token().await,
                std::env::var(REGISTRY_TOKEN_ENV).ok(),
            ),
            connect_timeout: settings
                .get_registry_connect_timeout_secs()
                .await
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            timeout: settings
                .get_registry_timeout_secs()
                .await
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            ..defaults
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = pick_token(Some(token.into()), None);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// First non-blank token, trimmed
fn pick_token(configured: Option<String>, env: Option<String>) -> Option<String> {
    [configured, env]
        .into_iter()
        .flatten()
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
}

/// Append `cursor`, `limit` and `search` to a registry base URL.
///
/// Blank cursor/search and non-positive limits are omitted. An existing
/// query string on `base` is preserved.
pub fn build_page_url(
    base: &str,
    cursor: Option<&str>,
    limit: Option<i32>,
    search: Option<&str>,
) -> String {
    let mut url = base.to_string();
    let mut has_query = base.contains('?');
    let mut push = |url: &mut String, name: &str, value: &str| {
        url.push(if has_query { '&' } else { '?' });
        url.push_str(name);
        url.push('=');
        url.push_str(value);
        has_query = true;
    };

    if let Some(cursor) = cursor.filter(|c| !c.trim().is_empty()) {
        push(&mut url, "cursor", &urlencoding::encode(cursor));
    }
    if let Some(limit) = limit.filter(|l| *l > 0) {
        push(&mut url, "limit", &limit.to_string());
    }
    if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
        push(&mut url, "search", &urlencoding::encode(search));
    }
    url
}

/// `metadata.next_cursor` (or `nextCursor`) when it is a non-blank string
fn extract_next_cursor(root: &serde_json::Value) -> Option<String> {
    let metadata = root.get("metadata")?.as_object()?;
    metadata
        .get("next_cursor")
        .or_else(|| metadata.get("nextCursor"))?
        .as_str()
        .filter(|c| !c.trim().is_empty())
        .map(str::to_string)
}

// ============================================
// Fetcher
// ============================================

/// Fetches and normalizes registry pages
pub struct RegistryPageFetcher {
    client: reqwest::Client,
    bearer_token: Option<String>,
    transformer: RegistryTransformer,
}

impl RegistryPageFetcher {
    pub fn new(config: RegistryClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent)
            .build()
            .map_err(ImportError::Client)?;

        Ok(Self {
            client,
            bearer_token: config.bearer_token,
            transformer: RegistryTransformer::new(),
        })
    }

    pub async fn from_settings(settings: &AppSettingsService) -> Result<Self> {
        Self::new(RegistryClientConfig::from_settings(settings).await)
    }

    pub fn has_bearer_token(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// Fetch and normalize one page.
    pub async fn fetch_page(
        &self,
        base_url: &str,
        cursor: Option<&str>,
        limit: Option<i32>,
        search: Option<&str>,
    ) -> Result<PageResult> {
        if base_url.trim().is_empty() {
            return Err(ImportError::invalid("URL is blank"));
        }

        let url = build_page_url(base_url.trim(), cursor, limit, search);
        info!(url = %url, "[RegistryClient] Fetching registry page");

        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| ImportError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "[RegistryClient] Registry returned error status");
            return Err(ImportError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ImportError::Transport {
                url: url.clone(),
                source,
            })?;
        let root: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| ImportError::parse("registry response body", e))?;

        let mut servers = self.typed_page(&root);
        if servers.is_empty() {
            servers = self.transformer.transform_document(root.clone());
        }
        servers.iter_mut().for_each(ensure_server_id);

        let next_cursor = extract_next_cursor(&root);
        debug!(
            url = %url,
            count = servers.len(),
            next_cursor = ?next_cursor,
            "[RegistryClient] Page fetched"
        );

        Ok(PageResult {
            servers,
            next_cursor,
        })
    }

    /// Walk every page of a registry, `FETCH_ALL_PAGE_SIZE` records at a time.
    ///
    /// Stops after `MAX_PAGES_GUARD` pages even if the registry keeps
    /// returning cursors. Any page error aborts the walk.
    pub async fn fetch_all(
        &self,
        base_url: &str,
        search: Option<&str>,
    ) -> Result<Vec<McpServerDetail>> {
        let mut collected = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES_GUARD {
            let page = self
                .fetch_page(base_url, cursor.as_deref(), Some(FETCH_ALL_PAGE_SIZE), search)
                .await?;
            collected.extend(page.servers);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    info!(
                        count = collected.len(),
                        "[RegistryClient] Fetched all registry pages"
                    );
                    return Ok(collected);
                }
            }
        }

        warn!(
            pages = MAX_PAGES_GUARD,
            count = collected.len(),
            "[RegistryClient] Page guard reached, stopping pagination"
        );
        Ok(collected)
    }

    /// Records from the typed list shape; empty when the body has another shape
    fn typed_page(&self, root: &serde_json::Value) -> Vec<McpServerDetail> {
        match serde_json::from_value::<RegistryServerList>(root.clone()) {
            Ok(list) => list
                .servers
                .into_iter()
                .filter_map(|raw| self.transformer.transform(raw))
                .collect(),
            Err(e) => {
                debug!(error = %e, "[RegistryClient] Not a typed list response, using tree fallback");
                Vec::new()
            }
        }
    }
}
