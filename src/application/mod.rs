//! Application layer services implementing business logic.
//!
//! Services own the read-modify-write cycle against the [`KeyValueStore`] and
//! write the audit trail. HTTP handlers and the admin CLI only talk to them.
//!
//! # Available Services
//!
//! - [`services::link_store::LinkStore`] - Link creation, lookup and purge
//! - [`services::redirect_resolver::RedirectResolver`] - Shortcode to target resolution
//! - [`services::click_recorder::ClickRecorder`] - Click history updates
//! - [`services::event_log::EventLog`] - Capped audit log of domain events
//!
//! [`KeyValueStore`]: crate::domain::repositories::KeyValueStore

pub mod services;
