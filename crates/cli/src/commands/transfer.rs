//! Bulk `import` / `export` of monitor records as JSON.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::client::ApiClient;

/// Keys assigned by the server; an export without them is a valid create body.
pub const SERVER_ASSIGNED_KEYS: [&str; 3] = ["id", "user_id", "latestHeartbeat"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub succeeded: usize,
    pub failed: usize,
}

fn read_records(file: &Path) -> Result<Vec<Value>> {
    let contents = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let data: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {} as JSON", file.display()))?;
    match data {
        Value::Array(records) => Ok(records),
        record @ Value::Object(_) => Ok(vec![record]),
        _ => bail!("{} must contain a JSON array or object", file.display()),
    }
}

/// Posts every record in order. A failed record is reported and skipped.
pub async fn import(client: &ApiClient, file: &Path, out: &mut dyn Write) -> Result<()> {
    let records = read_records(file)?;
    writeln!(out, "Importing {} monitor(s)...", records.len())?;

    let mut summary = ImportSummary::default();
    for record in &records {
        let name = record.get("name").and_then(Value::as_str).unwrap_or("<unnamed>");
        match client.create_monitor(record).await {
            Ok(created) => {
                debug!(monitor_id = created.id, "Imported monitor.");
                writeln!(out, "{}", format!("✓ {name}").green())?;
                summary.succeeded += 1;
            }
            Err(e) => {
                writeln!(out, "{}", format!("✗ {name}: {e}").red())?;
                summary.failed += 1;
            }
        }
    }

    writeln!(
        out,
        "\nImport complete: {} succeeded, {} failed",
        summary.succeeded, summary.failed
    )?;
    Ok(())
}

pub fn strip_server_assigned(record: &mut Value) {
    if let Some(fields) = record.as_object_mut() {
        for key in SERVER_ASSIGNED_KEYS {
            fields.remove(key);
        }
    }
}

pub async fn export(client: &ApiClient, file: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    let monitors = client.list_monitors().await?;
    let mut records = Vec::with_capacity(monitors.len());
    for monitor in &monitors {
        let mut record = serde_json::to_value(monitor)?;
        strip_server_assigned(&mut record);
        records.push(record);
    }
    let output = serde_json::to_string_pretty(&records)?;

    match file {
        Some(path) => {
            fs::write(path, output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            writeln!(
                out,
                "{}",
                format!("✓ Exported {} monitors to {}", records.len(), path.display()).green()
            )?;
        }
        None => writeln!(out, "{output}")?,
    }
    Ok(())
}
