use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,

    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Create missing tables at startup.
    #[serde(default = "default_ensure_schema")]
    pub ensure_schema: bool,

    #[serde(default = "default_max_db_connections")]
    pub max_db_connections: u32,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    database_url: Option<String>,
    listen_address: Option<String>,
    log_dir: Option<String>,
    ensure_schema: Option<bool>,
    max_db_connections: Option<u32>,
}

fn default_listen_address() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_ensure_schema() -> bool {
    true
}

fn default_max_db_connections() -> u32 {
    10
}

impl PartialServerConfig {
    fn from_file(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))
    }
}

impl ServerConfig {
    /// Loads the optional TOML file, then lets environment variables
    /// (including a `.env` file) override it.
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        let file_config = match config_path {
            Some(path) => PartialServerConfig::from_file(Path::new(path))?,
            None => PartialServerConfig::default(),
        };

        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        Self::merge(env_config, file_config)
    }

    fn merge(env_config: PartialServerConfig, file_config: PartialServerConfig) -> Result<Self, String> {
        let max_db_connections = env_config
            .max_db_connections
            .or(file_config.max_db_connections)
            .unwrap_or_else(default_max_db_connections);
        if max_db_connections == 0 {
            return Err("MAX_DB_CONNECTIONS must be at least 1".to_string());
        }

        Ok(ServerConfig {
            database_url: env_config
                .database_url
                .or(file_config.database_url)
                .ok_or("DATABASE_URL is required")?,
            listen_address: env_config
                .listen_address
                .or(file_config.listen_address)
                .unwrap_or_else(default_listen_address),
            log_dir: env_config
                .log_dir
                .or(file_config.log_dir)
                .unwrap_or_else(default_log_dir),
            ensure_schema: env_config
                .ensure_schema
                .or(file_config.ensure_schema)
                .unwrap_or_else(default_ensure_schema),
            max_db_connections,
        })
    }
}
