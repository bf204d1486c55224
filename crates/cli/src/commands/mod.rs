pub mod config_command;
pub mod monitor_commands;
pub mod transfer;

use anyhow::Result;
use kuma_common::MonitorType;
use std::io::Write;
use std::path::Path;

use crate::cli::{AddArgs, Commands};
use crate::client::ApiClient;
use crate::config::CliConfig;

fn connect(config_path: &Path) -> Result<ApiClient> {
    let config = CliConfig::load(config_path)?;
    Ok(ApiClient::new(&config)?)
}

/// Executes one subcommand, writing human output to `out`.
pub async fn run(command: Commands, config_path: &Path, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::Config {
            url,
            username,
            password,
        } => config_command::execute(config_path, url, username, password, out),
        Commands::List { json } => monitor_commands::list(&connect(config_path)?, json, out).await,
        Commands::Add(args) => monitor_commands::add(&connect(config_path)?, args, out).await,
        Commands::Delete { id, force } => {
            if force {
                monitor_commands::delete(&connect(config_path)?, id, out).await
            } else {
                monitor_commands::print_delete_warning(out)
            }
        }
        Commands::Pause { id } => monitor_commands::pause(&connect(config_path)?, id, out).await,
        Commands::Resume { id } => monitor_commands::resume(&connect(config_path)?, id, out).await,
        Commands::Get { id, json } => monitor_commands::get(&connect(config_path)?, id, json, out).await,
        Commands::AddHttp {
            name,
            url,
            interval,
        } => {
            let args = AddArgs::quick(name, url, MonitorType::Http, interval);
            monitor_commands::add(&connect(config_path)?, args, out).await
        }
        Commands::AddPing {
            name,
            hostname,
            interval,
        } => {
            let args = AddArgs::quick(name, hostname, MonitorType::Ping, interval);
            monitor_commands::add(&connect(config_path)?, args, out).await
        }
        Commands::AddTcp {
            name,
            hostname,
            port,
            interval,
        } => {
            let target = format!("{hostname}:{port}");
            let args = AddArgs::quick(name, target, MonitorType::Tcp, interval);
            monitor_commands::add(&connect(config_path)?, args, out).await
        }
        Commands::Import { file } => transfer::import(&connect(config_path)?, &file, out).await,
        Commands::Export { file } => {
            transfer::export(&connect(config_path)?, file.as_deref(), out).await
        }
    }
}
