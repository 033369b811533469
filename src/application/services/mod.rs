//! Business logic services for the application layer.

pub mod click_recorder;
pub mod event_log;
pub mod link_store;
pub mod redirect_resolver;

pub use click_recorder::ClickRecorder;
pub use event_log::{EVENT_LOG_CAPACITY, EventLog};
pub use link_store::{LinkStats, LinkStore, MAX_BATCH_SIZE, MAX_CODE_ATTEMPTS, PurgeReport};
pub use redirect_resolver::{RedirectResolver, Resolution};
