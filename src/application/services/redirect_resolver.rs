//! Redirect resolution for incoming short link requests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info};

use crate::application::services::{ClickRecorder, EventLog, LinkStore};
use crate::domain::click_context::ClickContext;
use crate::domain::entities::{EventName, ShortLink};
use crate::domain::repositories::KeyValueStore;
use crate::error::AppError;

/// Terminal state of one redirect attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The link is live; the click has been recorded.
    Redirecting { target: String, link: ShortLink },
    NotFound { code: String },
    /// The link exists but its validity window has ended.
    Expired {
        code: String,
        expired_at: DateTime<Utc>,
    },
}

impl Resolution {
    /// Converts the failure states into the matching [`AppError`].
    pub fn into_result(self) -> Result<(String, ShortLink), AppError> {
        match self {
            Resolution::Redirecting { target, link } => Ok((target, link)),
            Resolution::NotFound { code } => Err(AppError::NotFound { code }),
            Resolution::Expired { code, expired_at } => Err(AppError::Expired { code, expired_at }),
        }
    }
}

/// Turns a shortcode into a redirect target.
///
/// Only a successful resolution writes to the store (one click appended).
/// Unknown and expired codes leave it untouched; expired links stay in place
/// until a purge removes them.
pub struct RedirectResolver<S: KeyValueStore + ?Sized = dyn KeyValueStore> {
    links: Arc<LinkStore<S>>,
    recorder: Arc<ClickRecorder<S>>,
    events: Arc<EventLog<S>>,
}

impl<S: KeyValueStore + ?Sized> RedirectResolver<S> {
    pub fn new(
        links: Arc<LinkStore<S>>,
        recorder: Arc<ClickRecorder<S>>,
        events: Arc<EventLog<S>>,
    ) -> Self {
        Self {
            links,
            recorder,
            events,
        }
    }

    /// Resolves `code` and records a click from `context` on success.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the store cannot be read or the click
    /// cannot be saved. Unknown and expired codes are not errors here; they come
    /// back as [`Resolution::NotFound`] and [`Resolution::Expired`].
    pub async fn resolve(&self, code: &str, context: ClickContext) -> Result<Resolution, AppError> {
        let Some(link) = self.links.find_by_code(code).await? else {
            return Ok(self.not_found(code).await);
        };

        let now = self.links.now();
        if link.is_expired_at(now) {
            debug!("Refusing redirect for expired {}", code);
            self.events
                .write(
                    EventName::RedirectFailed,
                    json!({
                        "shortcode": code,
                        "reason": "expired",
                        "expireAt": link.expire_at,
                    }),
                )
                .await;

            return Ok(Resolution::Expired {
                code: code.to_string(),
                expired_at: link.expire_at,
            });
        }

        let click = context.into_click(now);
        let payload = json!({
            "id": link.id,
            "shortcode": link.shortcode,
            "referrer": click.referrer,
            "coarseLocale": click.coarse_locale,
            "sourcePath": click.source_path,
        });

        let updated = match self.recorder.append(&link, click).await {
            Ok(updated) => updated,
            // Purged between lookup and append.
            Err(AppError::NotFound { .. }) => return Ok(self.not_found(code).await),
            Err(e) => return Err(e),
        };

        info!("Redirecting {} -> {}", code, updated.long_url);
        self.events.write(EventName::RedirectClick, payload).await;

        Ok(Resolution::Redirecting {
            target: updated.long_url.clone(),
            link: updated,
        })
    }

    async fn not_found(&self, code: &str) -> Resolution {
        debug!("No link for {}", code);
        self.events
            .write(
                EventName::RedirectFailed,
                json!({ "shortcode": code, "reason": "not_found" }),
            )
            .await;

        Resolution::NotFound {
            code: code.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CoarseLocale, NewLink};
    use crate::domain::repositories::LINKS_KEY;
    use crate::infrastructure::persistence::MemoryStore;
    use crate::utils::clock::{Clock, ManualClock};
    use crate::utils::code_generator::{CodeGenerator, is_valid_format};
    use chrono::TimeDelta;

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        links: Arc<LinkStore<MemoryStore>>,
        events: Arc<EventLog<MemoryStore>>,
        resolver: RedirectResolver<MemoryStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::default());
        let events = Arc::new(EventLog::new(store.clone(), clock.clone()));
        let links = Arc::new(LinkStore::new(
            store.clone(),
            Arc::new(CodeGenerator::from_seed(99)),
            clock.clone(),
            events.clone(),
        ));
        let recorder = Arc::new(ClickRecorder::new(links.clone()));
        let resolver = RedirectResolver::new(links.clone(), recorder, events.clone());

        Fixture {
            store,
            clock,
            links,
            events,
            resolver,
        }
    }

    fn context() -> ClickContext {
        ClickContext::new(
            Some("https://news.example"),
            CoarseLocale::new("de", "Europe/Berlin"),
            "/r/abc",
        )
    }

    #[tokio::test]
    async fn test_unknown_code_does_not_touch_store() {
        let f = fixture();
        f.links.insert(NewLink::new("https://example.com")).await.unwrap();
        let before = f.store.get(LINKS_KEY).await.unwrap();

        let resolution = f.resolver.resolve("missing", context()).await.unwrap();

        assert_eq!(
            resolution,
            Resolution::NotFound {
                code: "missing".to_string()
            }
        );
        assert_eq!(f.store.get(LINKS_KEY).await.unwrap(), before);

        let log = f.events.read().await.unwrap();
        assert_eq!(log[0].event_name, EventName::RedirectFailed);
        assert_eq!(log[0].payload["reason"], "not_found");
    }

    #[tokio::test]
    async fn test_live_code_records_one_click() {
        let f = fixture();
        let link = f
            .links
            .insert(NewLink::new("https://example.com/path?q=1"))
            .await
            .unwrap();

        let resolution = f.resolver.resolve(&link.shortcode, context()).await.unwrap();

        let Resolution::Redirecting { target, link: updated } = resolution else {
            panic!("expected redirect, got {resolution:?}");
        };
        assert_eq!(target, "https://example.com/path?q=1");
        assert_eq!(updated.click_count(), 1);

        let click = &updated.clicks[0];
        assert_eq!(click.referrer, "https://news.example");
        assert_eq!(click.coarse_locale.language, "de");
        assert_eq!(click.source_path, "/r/abc");
        assert_eq!(click.ts, f.clock.now());

        let log = f.events.read().await.unwrap();
        assert_eq!(log[0].event_name, EventName::RedirectClick);
        assert_eq!(log[0].payload["shortcode"], link.shortcode);
    }

    #[tokio::test]
    async fn test_expiry_scenario() {
        let f = fixture();
        let link = f
            .links
            .insert(NewLink::new("https://example.com").with_validity(1))
            .await
            .unwrap();
        assert_eq!(link.shortcode.len(), 7);
        assert!(is_valid_format(&link.shortcode));

        let first = f.resolver.resolve(&link.shortcode, context()).await.unwrap();
        assert!(matches!(first, Resolution::Redirecting { .. }));
        assert_eq!(f.links.get(&link.shortcode).await.unwrap().click_count(), 1);

        f.clock.advance(TimeDelta::seconds(61));

        let second = f.resolver.resolve(&link.shortcode, context()).await.unwrap();
        assert_eq!(
            second,
            Resolution::Expired {
                code: link.shortcode.clone(),
                expired_at: link.expire_at,
            }
        );
        assert_eq!(f.links.get(&link.shortcode).await.unwrap().click_count(), 1);
    }

    #[tokio::test]
    async fn test_expiration_boundary() {
        let f = fixture();
        let link = f
            .links
            .insert(NewLink::new("https://example.com").with_validity(1))
            .await
            .unwrap();

        f.clock.set(link.expire_at - TimeDelta::milliseconds(1));
        let live = f.resolver.resolve(&link.shortcode, context()).await.unwrap();
        assert!(matches!(live, Resolution::Redirecting { .. }));

        f.clock.set(link.expire_at + TimeDelta::milliseconds(1));
        let expired = f.resolver.resolve(&link.shortcode, context()).await.unwrap();
        assert!(matches!(expired, Resolution::Expired { .. }));
    }

    #[tokio::test]
    async fn test_into_result_maps_errors() {
        let not_found = Resolution::NotFound {
            code: "abc".to_string(),
        };
        assert!(matches!(
            not_found.into_result(),
            Err(AppError::NotFound { .. })
        ));

        let expired = Resolution::Expired {
            code: "abc".to_string(),
            expired_at: Utc::now(),
        };
        assert!(matches!(expired.into_result(), Err(AppError::Expired { .. })));
    }
}
