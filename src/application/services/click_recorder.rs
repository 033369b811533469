//! Click history updates.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::LinkStore;
use crate::domain::entities::{ClickEvent, ShortLink};
use crate::domain::repositories::KeyValueStore;
use crate::error::AppError;

/// Prepends click events to a link's history.
///
/// The append is applied to the persisted record inside a [`LinkStore`]
/// transaction, so two clicks on the same link never overwrite each other.
pub struct ClickRecorder<S: KeyValueStore + ?Sized = dyn KeyValueStore> {
    links: Arc<LinkStore<S>>,
}

impl<S: KeyValueStore + ?Sized> ClickRecorder<S> {
    pub fn new(links: Arc<LinkStore<S>>) -> Self {
        Self { links }
    }

    /// Stores `event` at the front of `link`'s clicks and returns the updated link.
    ///
    /// Only `clicks` changes; every other field of the stored record is kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link was purged in the meantime.
    /// Returns [`AppError::Persistence`] if the update cannot be saved.
    pub async fn append(&self, link: &ShortLink, event: ClickEvent) -> Result<ShortLink, AppError> {
        let updated = self
            .links
            .modify(link.id, move |stored| stored.push_click(event))
            .await?;

        debug!(
            "Recorded click on {} ({} total)",
            updated.shortcode,
            updated.click_count()
        );

        Ok(updated)
    }
}
