//! Domain layer: entities and the persistence seam.
//!
//! - [`entities`] - links, clicks and log entries
//! - [`repositories`] - the [`repositories::KeyValueStore`] contract
//! - [`click_context`] - request metadata handed to the redirect resolver
//!
//! # Redirect Flow
//!
//! 1. HTTP handler builds a [`click_context::ClickContext`] from the request
//! 2. [`crate::application::services::RedirectResolver`] looks the code up
//! 3. On success the context becomes a [`entities::ClickEvent`] and is prepended
//!    to the link's history by [`crate::application::services::ClickRecorder`]

pub mod click_context;
pub mod entities;
pub mod repositories;
