pub mod config;
pub mod db;
pub mod scheduler;
pub mod services;
pub mod web;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
