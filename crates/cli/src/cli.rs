use clap::{Args, Parser, Subcommand};
use kuma_common::MonitorType;
use std::path::PathBuf;

/// Command-line client for the Uptime Kuma API
#[derive(Parser, Debug)]
#[command(name = "uptime-kuma")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.uptime-kuma-cli.toml
    #[arg(long, global = true, env = "UPTIME_KUMA_CLI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log requests and responses to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

fn parse_monitor_type(raw: &str) -> Result<MonitorType, String> {
    raw.parse()
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure Uptime Kuma connection
    Config {
        /// Uptime Kuma URL
        #[arg(short = 'u', long, default_value = crate::config::DEFAULT_URL)]
        url: String,

        /// Username
        #[arg(short = 'U', long, default_value = crate::config::DEFAULT_USERNAME)]
        username: String,

        /// Password or API key
        #[arg(short, long, default_value = "")]
        password: String,
    },

    /// List all monitors
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add a new monitor
    Add(AddArgs),

    /// Delete a monitor
    #[command(alias = "rm")]
    Delete {
        id: i32,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Pause a monitor
    Pause { id: i32 },

    /// Resume a monitor
    Resume { id: i32 },

    /// Get monitor details
    Get {
        id: i32,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Quick add HTTP monitor
    AddHttp {
        name: String,
        url: String,

        /// Check interval in seconds
        #[arg(short, long, default_value_t = 60)]
        interval: i32,
    },

    /// Quick add Ping monitor
    AddPing {
        name: String,
        hostname: String,

        /// Check interval in seconds
        #[arg(short, long, default_value_t = 60)]
        interval: i32,
    },

    /// Quick add TCP port monitor
    AddTcp {
        name: String,
        hostname: String,
        port: u16,

        /// Check interval in seconds
        #[arg(short, long, default_value_t = 60)]
        interval: i32,
    },

    /// Import monitors from JSON file
    Import { file: PathBuf },

    /// Export monitors to JSON file
    Export { file: Option<PathBuf> },
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    pub name: String,
    pub url: String,

    /// Monitor type
    #[arg(short = 't', long = "type", default_value = "http", value_parser = parse_monitor_type)]
    pub monitor_type: MonitorType,

    /// Check interval in seconds
    #[arg(short, long, default_value_t = 60)]
    pub interval: i32,

    /// HTTP method
    #[arg(short, long, default_value = "GET")]
    pub method: String,

    /// Keyword to check
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Number of retries
    #[arg(short, long, default_value_t = 0)]
    pub retries: i32,

    /// HTTP headers as JSON string
    #[arg(long)]
    pub headers: Option<String>,
}

impl AddArgs {
    /// What the quick-add commands expand to.
    pub fn quick(name: String, url: String, monitor_type: MonitorType, interval: i32) -> Self {
        Self {
            name,
            url,
            monitor_type,
            interval,
            method: "GET".to_string(),
            keyword: None,
            retries: 0,
            headers: None,
        }
    }
}
