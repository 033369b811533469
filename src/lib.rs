//! # Snaplink
//!
//! A small URL shortening service with expiring links, per-link click history and
//! a capped audit log, built with Axum.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities and the key-value persistence seam
//! - **Application Layer** ([`application`]) - Link store, redirect resolution, click
//!   recording and the event log
//! - **Infrastructure Layer** ([`infrastructure`]) - Memory, file and Redis backends
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Features
//!
//! - Random 7-character codes or custom 3-15 character codes
//! - Validity windows in minutes; expired links answer 410 until purged
//! - Batch creation of up to five links, all or nothing
//! - Click history with referrer, coarse locale and source path
//! - Audit log of the last 1000 domain events
//!
//! ## Quick Start
//!
//! ```bash
//! export STORE_BACKEND="file"
//! export STORE_PATH="./data"
//! export BASE_URL="https://s.example.com"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        ClickRecorder, EventLog, LinkStore, RedirectResolver, Resolution,
    };
    pub use crate::domain::click_context::ClickContext;
    pub use crate::domain::entities::{ClickEvent, EventName, LogEntry, NewLink, ShortLink};
    pub use crate::domain::repositories::KeyValueStore;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
