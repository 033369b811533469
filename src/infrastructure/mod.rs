//! Infrastructure layer for external integrations.
//!
//! Implements the persistence seam defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - in-memory, file and Redis key-value backends

pub mod persistence;
