//! Client configuration (webconsole.ron).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::state::Theme;
use crate::error::{Error, Result};

/// Path of the WebSocket endpoint on the console server.
pub const ENDPOINT_PATH: &str = "/ws";

/// Default origin of a locally started web console.
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:6128";

/// Client configuration, loaded from RON with every field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin of the console page, e.g. `https://console.example:6128`.
    pub origin: String,
    pub exit_close_delay_ms: u64,
    pub reconnect_prompt_delay_ms: u64,
    /// Maximum number of rendered output lines kept.
    pub scrollback: usize,
    /// Directories whose direct children are user home directories.
    pub home_roots: Vec<String>,
    pub log_file: Option<PathBuf>,
    pub theme: Theme,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            exit_close_delay_ms: 1000,
            reconnect_prompt_delay_ms: 1000,
            scrollback: 5000,
            home_roots: vec!["/Users".to_string(), "/home".to_string()],
            log_file: None,
            theme: Theme::Dark,
        }
    }
}

impl ClientConfig {
    /// Load a config from a RON file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = ron::from_str(&content)?;
        Ok(config)
    }

    pub fn exit_close_delay(&self) -> Duration {
        Duration::from_millis(self.exit_close_delay_ms)
    }

    pub fn reconnect_prompt_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_prompt_delay_ms)
    }

    /// WebSocket URL derived from the configured origin.
    pub fn endpoint(&self) -> Result<String> {
        endpoint_for_origin(&self.origin)
    }
}

/// Derive the WebSocket endpoint from a page origin.
///
/// The secure transport is chosen exactly when the origin is served over
/// https. A trailing slash or path on the origin is discarded.
pub fn endpoint_for_origin(origin: &str) -> Result<String> {
    let origin = origin.trim();
    let (scheme, rest) = if let Some(rest) = origin.strip_prefix("https://") {
        ("wss", rest)
    } else if let Some(rest) = origin.strip_prefix("http://") {
        ("ws", rest)
    } else {
        return Err(Error::InvalidOrigin(origin.to_string()));
    };

    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return Err(Error::InvalidOrigin(origin.to_string()));
    }

    Ok(format!("{}://{}{}", scheme, host, ENDPOINT_PATH))
}
