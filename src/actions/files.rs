//! File I/O for the client configuration.

use crate::data::config::ClientConfig;
use crate::error::Result;
use std::path::Path;

/// Load the config from a RON file, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    match path {
        Some(path) => ClientConfig::load(path),
        None => Ok(ClientConfig::default()),
    }
}

/// Create a new config template file.
pub fn create_config_template(path: &Path) -> std::io::Result<()> {
    let template = r#"ClientConfig(
    // Origin of the console page. https origins connect with wss.
    origin: "http://127.0.0.1:6128",
    exit_close_delay_ms: 1000,
    reconnect_prompt_delay_ms: 1000,
    scrollback: 5000,
    home_roots: ["/Users", "/home"],
    log_file: None,
    theme: Dark,
)
"#;
    std::fs::write(path, template)
}
