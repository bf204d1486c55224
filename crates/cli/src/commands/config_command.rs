use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

use crate::config::{AuthConfig, CliConfig};

/// Persists connection settings. Never contacts the server.
pub fn execute(
    config_path: &Path,
    url: String,
    username: String,
    password: String,
    out: &mut dyn Write,
) -> Result<()> {
    let config = CliConfig {
        url,
        auth: AuthConfig { username, password },
    };
    config.save(config_path)?;
    writeln!(
        out,
        "{}",
        format!("✓ Configuration saved to {}", config_path.display()).green()
    )?;
    Ok(())
}
