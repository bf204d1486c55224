use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde_json::{json, Value};
use std::io::Write;

use crate::cli::AddArgs;
use crate::client::ApiClient;
use crate::render;

/// Request body for `add` and the quick-add commands. Fails before any
/// network call when `--headers` is not valid JSON or the interval is not
/// positive.
pub fn build_monitor_body(args: &AddArgs) -> Result<Value> {
    if args.interval <= 0 {
        bail!("Interval must be a positive number of seconds");
    }
    let mut body = json!({
        "name": args.name,
        "url": args.url,
        "type": args.monitor_type.as_str(),
        "interval": args.interval,
        "method": args.method,
        "maxretries": args.retries,
        "active": 1,
    });

    if let Some(keyword) = &args.keyword {
        body["keyword"] = json!(keyword);
        body["type"] = json!("keyword");
    }
    if let Some(headers) = &args.headers {
        let parsed: Value = serde_json::from_str(headers).context("Invalid JSON for headers")?;
        body["headers"] = parsed;
    }
    Ok(body)
}

pub async fn list(client: &ApiClient, as_json: bool, out: &mut dyn Write) -> Result<()> {
    let monitors = client.list_monitors().await?;
    if as_json {
        writeln!(out, "{}", serde_json::to_string_pretty(&monitors)?)?;
    } else {
        writeln!(out, "{}", render::monitor_table(&monitors))?;
    }
    Ok(())
}

pub async fn add(client: &ApiClient, args: AddArgs, out: &mut dyn Write) -> Result<()> {
    let body = build_monitor_body(&args)?;
    let created = client.create_monitor(&body).await?;
    writeln!(out, "{}", "✓ Monitor added successfully".green())?;
    writeln!(out, "ID: {}", created.id)?;
    writeln!(out, "Name: {}", created.name)?;
    writeln!(out, "URL: {}", created.url)?;
    Ok(())
}

pub fn print_delete_warning(out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "{}",
        "This will permanently delete the monitor and all its data.".yellow()
    )?;
    writeln!(out, "{}", "Use -f or --force to skip this confirmation.".yellow())?;
    Ok(())
}

pub async fn delete(client: &ApiClient, id: i32, out: &mut dyn Write) -> Result<()> {
    client.delete_monitor(id).await?;
    writeln!(out, "{}", "✓ Monitor deleted successfully".green())?;
    Ok(())
}

pub async fn pause(client: &ApiClient, id: i32, out: &mut dyn Write) -> Result<()> {
    client.pause_monitor(id).await?;
    writeln!(out, "{}", "✓ Monitor paused".green())?;
    Ok(())
}

pub async fn resume(client: &ApiClient, id: i32, out: &mut dyn Write) -> Result<()> {
    client.resume_monitor(id).await?;
    writeln!(out, "{}", "✓ Monitor resumed".green())?;
    Ok(())
}

pub async fn get(client: &ApiClient, id: i32, as_json: bool, out: &mut dyn Write) -> Result<()> {
    let monitor = client.get_monitor(id).await?;
    if as_json {
        writeln!(out, "{}", serde_json::to_string_pretty(&monitor)?)?;
    } else {
        write!(out, "{}", render::monitor_details(&monitor))?;
    }
    Ok(())
}
