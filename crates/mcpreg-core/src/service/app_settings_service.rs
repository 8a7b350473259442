//! App Settings Service
//!
//! Typed access to the key/value settings store. The import pipeline reads
//! its registry client configuration from here.

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::AppSettingsRepository;

/// Setting key constants for type-safe access.
pub mod keys {
    /// Registry client settings namespace
    pub mod registry {
        /// Bearer token sent to registry endpoints
        pub const TOKEN: &str = "registry.token";
        /// Connect timeout in seconds (u64)
        pub const CONNECT_TIMEOUT_SECS: &str = "registry.connect_timeout_secs";
        /// Overall request timeout in seconds (u64)
        pub const TIMEOUT_SECS: &str = "registry.timeout_secs";
    }
}

/// Service for managing application settings with typed access.
///
/// # Example
/// ```ignore
/// let settings = AppSettingsService::new(repo);
/// settings.set_registry_token("secret").await?;
/// let config = RegistryClientConfig::from_settings(&settings).await;
/// ```
pub struct AppSettingsService {
    repository: Arc<dyn AppSettingsRepository>,
}

impl AppSettingsService {
    pub fn new(repository: Arc<dyn AppSettingsRepository>) -> Self {
        Self { repository }
    }

    /// Get a setting value parsed as the specified type.
    ///
    /// Returns `None` if the key doesn't exist or parsing fails.
    pub async fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_string(key).await?;
        if let Ok(parsed) = serde_json::from_str(&value) {
            return Some(parsed);
        }
        // Bare strings are stored unquoted
        if let Ok(parsed) = serde_json::from_value(serde_json::Value::String(value.clone())) {
            return Some(parsed);
        }
        warn!("[Settings] Failed to parse '{}' value: {}", key, value);
        None
    }

    /// Get a string setting value. Storage errors are logged and read as unset.
    pub async fn get_string(&self, key: &str) -> Option<String> {
        match self.repository.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("[Settings] Failed to get '{}': {}", key, e);
                None
            }
        }
    }

    /// Store a value as JSON; strings are stored bare.
    pub async fn set_typed<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let serialized = match serde_json::to_value(value)? {
            serde_json::Value::String(plain) => plain,
            other => other.to_string(),
        };
        self.repository.set(key, &serialized).await
    }

    pub async fn set_string(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.repository.set(key, value).await
    }

    pub async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.repository.delete(key).await
    }

    // =========================================================================
    // Registry settings
    // =========================================================================

    /// Configured registry bearer token; blank values count as unset.
    pub async fn get_registry_token(&self) -> Option<String> {
        self.get_string(keys::registry::TOKEN)
            .await
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    pub async fn set_registry_token(&self, token: &str) -> anyhow::Result<()> {
        info!("[Settings] Setting registry token");
        self.repository.set(keys::registry::TOKEN, token).await
    }

    pub async fn clear_registry_token(&self) -> anyhow::Result<()> {
        info!("[Settings] Clearing registry token");
        self.repository.delete(keys::registry::TOKEN).await
    }

    /// Zero counts as unset.
    pub async fn get_registry_connect_timeout_secs(&self) -> Option<u64> {
        self.get_positive_secs(keys::registry::CONNECT_TIMEOUT_SECS).await
    }

    /// Zero counts as unset.
    pub async fn get_registry_timeout_secs(&self) -> Option<u64> {
        self.get_positive_secs(keys::registry::TIMEOUT_SECS).await
    }

    async fn get_positive_secs(&self, key: &str) -> Option<u64> {
        self.get_typed::<u64>(key).await.filter(|secs| *secs > 0)
    }
}
