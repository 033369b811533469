//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod links;
pub mod logs;
pub mod redirect;
pub mod shorten;

pub use health::health_handler;
pub use links::{copied_handler, link_detail_handler, list_links_handler, purge_handler};
pub use logs::{clear_logs_handler, logs_handler};
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
