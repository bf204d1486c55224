pub mod info_routes;
pub mod maintenance_routes;
pub mod monitor_routes;
pub mod status_page_routes;
pub mod tag_routes;
