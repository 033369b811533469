//! Core domain entities.
//!
//! - [`ShortLink`] - a shortened URL and its click history
//! - [`NewLink`] - draft used to create a link
//! - [`ClickEvent`] - one recorded redirect
//! - [`LogEntry`] - one event log record

pub mod click;
pub mod link;
pub mod log_entry;

pub use click::{ClickEvent, CoarseLocale};
pub use link::{DEFAULT_VALIDITY_MINUTES, NewLink, RequestedValidity, ShortLink};
pub use log_entry::{EventName, LogEntry};
