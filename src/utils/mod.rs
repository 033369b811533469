//! Utility functions shared across layers.
//!
//! - [`code_generator`] - random shortcode generation and format validation
//! - [`url_validator`] - destination URL checks
//! - [`request_context`] - click context extraction from HTTP headers
//! - [`clock`] - injectable time source

pub mod clock;
pub mod code_generator;
pub mod request_context;
pub mod url_validator;
