use chrono::Local;
use colored::{ColoredString, Colorize};
use kuma_common::{HeartbeatStatus, MonitorRecord};
use std::fmt::Write as _;
use tabled::{builder::Builder, settings::Style};

pub fn format_status(status: Option<HeartbeatStatus>) -> ColoredString {
    match status {
        Some(HeartbeatStatus::Down) => "● DOWN".red(),
        Some(HeartbeatStatus::Up) => "● UP".green(),
        Some(HeartbeatStatus::Pending) => "● PENDING".yellow(),
        Some(HeartbeatStatus::Maintenance) => "● MAINTENANCE".blue(),
        None => "● UNKNOWN".bright_black(),
    }
}

fn or_dash(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v}{suffix}"))
}

pub fn monitor_table(monitors: &[MonitorRecord]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Type", "URL/Host", "Status", "Uptime", "Response"]);
    for monitor in monitors {
        let heartbeat = monitor.latest_heartbeat.as_ref();
        builder.push_record([
            monitor.id.to_string(),
            monitor.name.clone(),
            monitor.monitor_type.clone(),
            monitor.target().to_string(),
            format_status(heartbeat.map(|hb| hb.status)).to_string(),
            or_dash(heartbeat.and_then(|hb| hb.uptime), "%"),
            or_dash(heartbeat.and_then(|hb| hb.ping), "ms"),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

pub fn monitor_details(monitor: &MonitorRecord) -> String {
    let mut out = String::new();
    let active = if monitor.active { "Yes".green() } else { "No".red() };

    let _ = writeln!(out, "\n{}", "Monitor Details:".bold());
    let _ = writeln!(out, "ID: {}", monitor.id);
    let _ = writeln!(out, "Name: {}", monitor.name);
    let _ = writeln!(out, "Type: {}", monitor.monitor_type);
    let _ = writeln!(out, "URL: {}", monitor.target());
    let _ = writeln!(out, "Interval: {}s", monitor.interval);
    let _ = writeln!(out, "Active: {active}");

    if let Some(heartbeat) = &monitor.latest_heartbeat {
        let local_time = heartbeat.time.with_timezone(&Local);
        let _ = writeln!(out, "\n{}", "Latest Status:".bold());
        let _ = writeln!(out, "Status: {}", format_status(Some(heartbeat.status)));
        let _ = writeln!(out, "Message: {}", heartbeat.msg.as_deref().unwrap_or("-"));
        let _ = writeln!(out, "Response Time: {}", or_dash(heartbeat.ping, "ms"));
        let _ = writeln!(out, "Time: {}", local_time.format("%Y-%m-%d %H:%M:%S"));
    }
    out
}
