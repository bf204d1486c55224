//! Data access for the API router.
//!
//! Every query that takes a `user_id` filters on it; callers never look a
//! record up by primary key alone. Functions are generic over
//! `ConnectionTrait` so handlers can run them inside a transaction.

pub mod heartbeat_service;
pub mod maintenance_service;
pub mod monitor_service;
pub mod status_page_service;
pub mod tag_service;
pub mod user_service;
