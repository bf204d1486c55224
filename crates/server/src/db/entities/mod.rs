//! SeaORM entities for the tables this API reads and writes.
//!
//! The tables belong to the host application; `db::schema` can create them
//! for standalone deployments and tests.

pub mod heartbeat;
pub mod maintenance;
pub mod monitor;
pub mod monitor_tag;
pub mod status_page;
pub mod status_page_monitor;
pub mod tag;
pub mod user;

pub mod prelude {
    pub use super::heartbeat::Entity as Heartbeat;
    pub use super::maintenance::Entity as Maintenance;
    pub use super::monitor::Entity as Monitor;
    pub use super::monitor_tag::Entity as MonitorTag;
    pub use super::status_page::Entity as StatusPage;
    pub use super::status_page_monitor::Entity as StatusPageMonitor;
    pub use super::tag::Entity as Tag;
    pub use super::user::Entity as User;
}
