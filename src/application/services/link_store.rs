//! Authoritative collection of short links.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::application::services::EventLog;
use crate::domain::entities::{EventName, NewLink, ShortLink};
use crate::domain::repositories::{KeyValueStore, LINKS_KEY};
use crate::error::AppError;
use crate::utils::clock::Clock;
use crate::utils::code_generator::{
    CodeGenerator, DEFAULT_CODE_LENGTH, is_reserved, is_valid_format,
};
use crate::utils::url_validator::validate_url;

/// Attempts made to find a free generated code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 10;

/// Largest number of links accepted by one creation request.
pub const MAX_BATCH_SIZE: usize = 5;

/// Result of [`LinkStore::purge_expired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub removed_count: usize,
}

/// Derived view of one link for inspection.
///
/// Expired links stay inspectable until they are purged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkStats {
    pub link: ShortLink,
    pub expired: bool,
    pub click_count: usize,
}

/// Owns the link collection and its persistence.
///
/// The whole collection lives under a single key of the [`KeyValueStore`] and is
/// read fresh on every call. Mutations run as transactions behind a single-writer
/// lock: load, mutate, save. A failed validation or a failed save leaves the
/// persisted copy untouched.
pub struct LinkStore<S: KeyValueStore + ?Sized = dyn KeyValueStore> {
    store: Arc<S>,
    generator: Arc<CodeGenerator>,
    clock: Arc<dyn Clock>,
    events: Arc<EventLog<S>>,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore + ?Sized> LinkStore<S> {
    pub fn new(
        store: Arc<S>,
        generator: Arc<CodeGenerator>,
        clock: Arc<dyn Clock>,
        events: Arc<EventLog<S>>,
    ) -> Self {
        Self {
            store,
            generator,
            clock,
            events,
            write_lock: Mutex::new(()),
        }
    }

    /// Validates `draft` and stores the resulting link.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the destination is not an `http(s)` URL
    /// - [`AppError::InvalidValidity`] if the validity is not a positive number of minutes
    /// - [`AppError::InvalidShortcode`] if a supplied code is not 3-15 alphanumerics
    ///   or names a top-level route
    /// - [`AppError::ShortcodeCollision`] if a supplied code is already stored
    /// - [`AppError::ExhaustedCodeSpace`] if no free code was generated
    /// - [`AppError::Persistence`] if the collection cannot be loaded or saved
    pub async fn insert(&self, draft: NewLink) -> Result<ShortLink, AppError> {
        let mut created = self.insert_batch(vec![draft]).await?;
        created.pop().ok_or(AppError::InvalidBatch {
            provided: 0,
            max: MAX_BATCH_SIZE,
        })
    }

    /// Creates up to [`MAX_BATCH_SIZE`] links, all or nothing.
    ///
    /// Rows are checked in order against the stored links and against the earlier
    /// rows of the same batch. The first failing row rejects the whole batch and
    /// later rows are not looked at.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidBatch`] for an empty or oversized batch, otherwise the
    /// same errors as [`Self::insert`].
    pub async fn insert_batch(&self, drafts: Vec<NewLink>) -> Result<Vec<ShortLink>, AppError> {
        if drafts.is_empty() || drafts.len() > MAX_BATCH_SIZE {
            let err = AppError::InvalidBatch {
                provided: drafts.len(),
                max: MAX_BATCH_SIZE,
            };
            self.record_rejection(None, &err).await;
            return Err(err);
        }

        let now = self.clock.now();
        let mut failed_row = None;

        let result = self
            .transact(|links| {
                let mut created: Vec<ShortLink> = Vec::with_capacity(drafts.len());

                for (row, draft) in drafts.iter().enumerate() {
                    match self.prepare(draft, now, links, &created) {
                        Ok(link) => created.push(link),
                        Err(e) => {
                            failed_row = Some(row);
                            return Err(e);
                        }
                    }
                }

                links.splice(0..0, created.iter().cloned());
                Ok(created)
            })
            .await;

        match result {
            Ok(created) => {
                for link in &created {
                    info!("Created short link {} -> {}", link.shortcode, link.long_url);
                    self.events
                        .write(
                            EventName::ShortCreated,
                            json!({
                                "id": link.id,
                                "shortcode": link.shortcode,
                                "longUrl": link.long_url,
                                "expireAt": link.expire_at,
                            }),
                        )
                        .await;
                }
                Ok(created)
            }
            Err(err) => {
                if err.is_validation() {
                    self.record_rejection(failed_row, &err).await;
                } else {
                    error!("Link creation failed: {}", err);
                }
                Err(err)
            }
        }
    }

    /// Exact, case-sensitive lookup by shortcode.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let links = self.load().await?;
        let found = links.into_iter().find(|link| link.shortcode == code);
        debug!("Lookup {}: {}", code, if found.is_some() { "hit" } else { "miss" });
        Ok(found)
    }

    /// Replaces the stored record with the same id as `link`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if that id is no longer stored.
    pub async fn update(&self, link: ShortLink) -> Result<ShortLink, AppError> {
        self.modify(link.id, move |stored| *stored = link).await
    }

    /// Applies `change` to the stored record with `id` inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if that id is no longer stored.
    pub async fn modify<F>(&self, id: Uuid, change: F) -> Result<ShortLink, AppError>
    where
        F: FnOnce(&mut ShortLink) + Send,
    {
        self.transact(|links| {
            let stored = links
                .iter_mut()
                .find(|link| link.id == id)
                .ok_or_else(|| AppError::NotFound {
                    code: id.to_string(),
                })?;

            change(stored);
            Ok(stored.clone())
        })
        .await
    }

    /// Removes every link whose validity window has ended.
    pub async fn purge_expired(&self) -> Result<PurgeReport, AppError> {
        let now = self.clock.now();

        let removed_count = self
            .transact(|links| {
                let before = links.len();
                links.retain(|link| !link.is_expired_at(now));
                Ok(before - links.len())
            })
            .await?;

        info!("Purged {} expired link(s)", removed_count);
        self.events
            .write(
                EventName::PurgeExpired,
                json!({ "removedCount": removed_count }),
            )
            .await;

        Ok(PurgeReport { removed_count })
    }

    /// Snapshot of every stored link, most recently created first.
    pub async fn all(&self) -> Result<Vec<ShortLink>, AppError> {
        self.load().await
    }

    /// Returns the link for `code`, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no such link is stored.
    pub async fn get(&self, code: &str) -> Result<ShortLink, AppError> {
        self.find_by_code(code).await?.ok_or_else(|| AppError::NotFound {
            code: code.to_string(),
        })
    }

    /// Returns the link for `code` with its derived expiration state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no such link is stored.
    pub async fn stats(&self, code: &str) -> Result<LinkStats, AppError> {
        let link = self.get(code).await?;

        Ok(LinkStats {
            expired: self.is_expired(&link),
            click_count: link.click_count(),
            link,
        })
    }

    /// Whether `link` is expired right now.
    pub fn is_expired(&self, link: &ShortLink) -> bool {
        link.is_expired_at(self.clock.now())
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Constructs the full short URL handed to the clipboard.
    pub fn short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }

    /// Records the outcome of copying a short URL to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `code` is not stored.
    pub async fn record_copy(
        &self,
        code: &str,
        short_url: &str,
        success: bool,
    ) -> Result<(), AppError> {
        let link = self.get(code).await?;

        self.events
            .write(
                EventName::Copied,
                json!({
                    "id": link.id,
                    "shortcode": link.shortcode,
                    "shortUrl": short_url,
                    "success": success,
                }),
            )
            .await;

        Ok(())
    }

    /// Checks one draft against the stored links and the rows accepted so far.
    fn prepare(
        &self,
        draft: &NewLink,
        now: DateTime<Utc>,
        stored: &[ShortLink],
        pending: &[ShortLink],
    ) -> Result<ShortLink, AppError> {
        let long_url = draft.long_url.trim();
        validate_url(long_url).map_err(|e| AppError::InvalidUrl {
            url: long_url.to_string(),
            reason: e.to_string(),
        })?;

        let invalid_validity = || AppError::InvalidValidity {
            provided: draft.validity.to_string(),
        };
        let validity = draft.validity().ok_or_else(invalid_validity)?;
        let expire_at = now.checked_add_signed(validity).ok_or_else(invalid_validity)?;

        let taken = |code: &str| {
            stored
                .iter()
                .chain(pending.iter())
                .any(|link| link.shortcode == code)
        };

        let shortcode = match draft.requested_shortcode() {
            Some(code) => {
                if !is_valid_format(code) || is_reserved(code) {
                    return Err(AppError::InvalidShortcode {
                        code: code.to_string(),
                    });
                }
                if taken(code) {
                    return Err(AppError::ShortcodeCollision {
                        code: code.to_string(),
                    });
                }
                code.to_string()
            }
            None => self.generate_unique(taken)?,
        };

        Ok(ShortLink::new(
            shortcode,
            long_url.to_string(),
            now,
            expire_at,
        ))
    }

    fn generate_unique(&self, taken: impl Fn(&str) -> bool) -> Result<String, AppError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = self.generator.generate(DEFAULT_CODE_LENGTH);
            if !taken(&code) {
                return Ok(code);
            }
            debug!("Generated code {} collided, retrying", code);
        }

        Err(AppError::ExhaustedCodeSpace {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Writes a `validation_error` entry for a rejected creation request.
    ///
    /// `row` is the index of the failing row, when the failure belongs to one.
    async fn record_rejection(&self, row: Option<usize>, err: &AppError) {
        debug!("Rejected link creation: {}", err);
        self.events
            .write(
                EventName::ValidationError,
                json!({
                    "row": row,
                    "code": err.code(),
                    "message": err.to_string(),
                    "details": err.details(),
                }),
            )
            .await;
    }

    /// Runs `mutate` against a freshly loaded collection and saves the result.
    ///
    /// Holds the writer lock for the whole load-mutate-save sequence so no other
    /// mutation through this store can interleave.
    async fn transact<T, F>(&self, mutate: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Vec<ShortLink>) -> Result<T, AppError> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;

        let mut links = self.load().await?;
        let value = mutate(&mut links)?;
        self.save(&links).await?;

        Ok(value)
    }

    async fn load(&self) -> Result<Vec<ShortLink>, AppError> {
        match self.store.get(LINKS_KEY).await? {
            Some(blob) => serde_json::from_str(&blob).map_err(|e| AppError::Persistence(e.into())),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, links: &[ShortLink]) -> Result<(), AppError> {
        let blob = serde_json::to_string(links).map_err(|e| AppError::Persistence(e.into()))?;
        self.store.set(LINKS_KEY, blob).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockKeyValueStore, StoreError};
    use crate::domain::entities::RequestedValidity;
    use crate::infrastructure::persistence::MemoryStore;
    use crate::utils::clock::ManualClock;
    use chrono::TimeDelta;
    use std::collections::HashSet;

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        events: Arc<EventLog<MemoryStore>>,
        links: LinkStore<MemoryStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::default());
        let events = Arc::new(EventLog::new(store.clone(), clock.clone()));
        let links = LinkStore::new(
            store.clone(),
            Arc::new(CodeGenerator::from_seed(42)),
            clock.clone(),
            events.clone(),
        );

        Fixture {
            store,
            clock,
            events,
            links,
        }
    }

    fn mock_links(store: MockKeyValueStore) -> LinkStore<MockKeyValueStore> {
        let store = Arc::new(store);
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::default());
        let events = Arc::new(EventLog::new(store.clone(), clock.clone()));
        LinkStore::new(store, Arc::new(CodeGenerator::from_seed(1)), clock, events)
    }

    #[tokio::test]
    async fn test_insert_generates_code_and_default_validity() {
        let f = fixture();

        let link = f.links.insert(NewLink::new("https://example.com")).await.unwrap();

        assert_eq!(link.shortcode.len(), DEFAULT_CODE_LENGTH);
        assert!(is_valid_format(&link.shortcode));
        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.created_at, f.clock.now());
        assert_eq!(link.expire_at - link.created_at, TimeDelta::minutes(30));
        assert!(link.clicks.is_empty());
    }

    #[tokio::test]
    async fn test_insert_with_validity_sets_expiry() {
        let f = fixture();

        for minutes in [1, 15, 60 * 24 * 365] {
            let link = f
                .links
                .insert(NewLink::new("https://example.com").with_validity(minutes))
                .await
                .unwrap();

            assert_eq!(link.expire_at, link.created_at + TimeDelta::minutes(minutes));
        }
    }

    #[tokio::test]
    async fn test_insert_round_trip() {
        let f = fixture();

        let link = f
            .links
            .insert(NewLink::new("https://example.com/a?b=c").with_shortcode("Promo2026"))
            .await
            .unwrap();

        let found = f.links.find_by_code("Promo2026").await.unwrap();
        assert_eq!(found, Some(link));
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let f = fixture();
        f.links
            .insert(NewLink::new("https://example.com").with_shortcode("AbC"))
            .await
            .unwrap();

        assert!(f.links.find_by_code("abc").await.unwrap().is_none());
        assert!(f.links.find_by_code("AbC").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalid_url_leaves_store_unchanged() {
        let f = fixture();

        let result = f.links.insert(NewLink::new("not-a-url")).await;

        assert!(matches!(result, Err(AppError::InvalidUrl { .. })));
        assert!(f.links.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_validity() {
        let f = fixture();

        for minutes in [0, -1] {
            let result = f
                .links
                .insert(NewLink::new("https://example.com").with_validity(minutes))
                .await;
            assert!(matches!(result, Err(AppError::InvalidValidity { .. })));
        }
    }

    #[tokio::test]
    async fn test_invalid_shortcode() {
        let f = fixture();

        for code in ["ab", "has-dash", "waytoolongshortcode", " abc ", "health", "api"] {
            let result = f
                .links
                .insert(NewLink::new("https://example.com").with_shortcode(code))
                .await;
            assert!(
                matches!(result, Err(AppError::InvalidShortcode { .. })),
                "{code}"
            );
        }
    }

    #[tokio::test]
    async fn test_explicit_shortcode_collision() {
        let f = fixture();
        let draft = NewLink::new("https://example.com").with_shortcode("abc");

        f.links.insert(draft.clone()).await.unwrap();
        let second = f.links.insert(draft).await;

        assert!(matches!(second, Err(AppError::ShortcodeCollision { .. })));
        assert_eq!(f.links.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_collision_with_expired_but_unpurged_link() {
        let f = fixture();
        f.links
            .insert(NewLink::new("https://example.com").with_shortcode("abc").with_validity(1))
            .await
            .unwrap();
        f.clock.advance(TimeDelta::minutes(5));

        let result = f
            .links
            .insert(NewLink::new("https://example.com").with_shortcode("abc"))
            .await;
        assert!(matches!(result, Err(AppError::ShortcodeCollision { .. })));

        f.links.purge_expired().await.unwrap();
        f.links
            .insert(NewLink::new("https://example.com").with_shortcode("abc"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_generated_codes_are_unique() {
        let f = fixture();

        for _ in 0..50 {
            f.links.insert(NewLink::new("https://example.com")).await.unwrap();
        }

        let links = f.links.all().await.unwrap();
        let codes: HashSet<_> = links.iter().map(|l| l.shortcode.as_str()).collect();
        assert_eq!(codes.len(), 50);
    }

    #[tokio::test]
    async fn test_generation_retries_past_collisions() {
        let f = fixture();

        // Same seed as the fixture, so the first candidates are already taken.
        let replay = CodeGenerator::from_seed(42);
        for _ in 0..3 {
            let code = replay.generate(DEFAULT_CODE_LENGTH);
            f.links
                .insert(NewLink::new("https://example.com").with_shortcode(code))
                .await
                .unwrap();
        }

        let link = f.links.insert(NewLink::new("https://example.com")).await.unwrap();
        assert_eq!(f.links.all().await.unwrap().len(), 4);
        assert_eq!(
            f.links
                .all()
                .await
                .unwrap()
                .iter()
                .filter(|l| l.shortcode == link.shortcode)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_generation_exhaustion_is_reported() {
        let f = fixture();
        let store = f.links;

        let result = store.generate_unique(|_| true);

        assert!(matches!(
            result,
            Err(AppError::ExhaustedCodeSpace {
                attempts: MAX_CODE_ATTEMPTS
            })
        ));
    }

    #[tokio::test]
    async fn test_all_is_newest_first() {
        let f = fixture();

        for code in ["first", "second", "third"] {
            f.links
                .insert(NewLink::new("https://example.com").with_shortcode(code))
                .await
                .unwrap();
            f.clock.advance(TimeDelta::seconds(1));
        }

        let codes: Vec<String> = f
            .links
            .all()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.shortcode)
            .collect();
        assert_eq!(codes, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_batch_success_keeps_row_order() {
        let f = fixture();

        let created = f
            .links
            .insert_batch(vec![
                NewLink::new("https://a.example").with_shortcode("rowA"),
                NewLink::new("https://b.example"),
                NewLink::new("https://c.example").with_shortcode("rowC"),
            ])
            .await
            .unwrap();

        assert_eq!(created.len(), 3);
        let stored = f.links.all().await.unwrap();
        assert_eq!(stored[0].shortcode, "rowA");
        assert_eq!(stored[2].shortcode, "rowC");
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let f = fixture();

        let result = f
            .links
            .insert_batch(vec![
                NewLink::new("https://a.example"),
                NewLink::new("https://b.example"),
                NewLink::new("not-a-url"),
                NewLink::new("https://d.example").with_shortcode("x"),
            ])
            .await;

        assert!(matches!(result, Err(AppError::InvalidUrl { .. })));
        assert!(f.links.all().await.unwrap().is_empty());

        let log = f.events.read().await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].event_name, EventName::ValidationError);
        assert_eq!(log[0].payload["row"], 2);
        assert_eq!(log[0].payload["code"], "invalid_url");
    }

    #[tokio::test]
    async fn test_batch_reports_first_failing_row() {
        let f = fixture();
        let unparsable = NewLink {
            validity: RequestedValidity::Unparsable("\"soon\"".to_string()),
            ..NewLink::new("https://b.example")
        };

        let result = f
            .links
            .insert_batch(vec![NewLink::new("not-a-url"), unparsable])
            .await;

        assert!(matches!(result, Err(AppError::InvalidUrl { .. })));
        let log = f.events.read().await.unwrap();
        assert_eq!(log[0].payload["row"], 0);
    }

    #[tokio::test]
    async fn test_url_checked_before_validity_within_row() {
        let f = fixture();
        let draft = NewLink {
            validity: RequestedValidity::Unparsable("\"soon\"".to_string()),
            ..NewLink::new("not-a-url")
        };

        let result = f.links.insert(draft).await;

        assert!(matches!(result, Err(AppError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_batch_detects_collision_between_rows() {
        let f = fixture();

        let result = f
            .links
            .insert_batch(vec![
                NewLink::new("https://a.example").with_shortcode("same"),
                NewLink::new("https://b.example").with_shortcode("same"),
            ])
            .await;

        assert!(matches!(result, Err(AppError::ShortcodeCollision { .. })));
        assert!(f.links.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_size_limits() {
        let f = fixture();

        let empty = f.links.insert_batch(Vec::new()).await;
        assert!(matches!(empty, Err(AppError::InvalidBatch { provided: 0, .. })));

        let six = (0..6).map(|_| NewLink::new("https://example.com")).collect();
        let oversized = f.links.insert_batch(six).await;
        assert!(matches!(oversized, Err(AppError::InvalidBatch { provided: 6, .. })));

        let five = (0..5).map(|_| NewLink::new("https://example.com")).collect();
        assert_eq!(f.links.insert_batch(five).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_insert_logs_creation() {
        let f = fixture();

        let link = f
            .links
            .insert(NewLink::new("https://example.com").with_shortcode("logged"))
            .await
            .unwrap();

        let log = f.events.read().await.unwrap();
        assert_eq!(log[0].event_name, EventName::ShortCreated);
        assert_eq!(log[0].payload["shortcode"], "logged");
        assert_eq!(log[0].payload["id"], link.id.to_string());
    }

    #[tokio::test]
    async fn test_update_replaces_record_by_id() {
        let f = fixture();
        let link = f.links.insert(NewLink::new("https://example.com")).await.unwrap();

        let mut changed = link.clone();
        changed.clicks.push(
            crate::domain::click_context::ClickContext::default().into_click(f.clock.now()),
        );
        f.links.update(changed.clone()).await.unwrap();

        let stored = f.links.get(&link.shortcode).await.unwrap();
        assert_eq!(stored, changed);
    }

    #[tokio::test]
    async fn test_update_of_purged_link_is_not_found() {
        let f = fixture();
        let link = f
            .links
            .insert(NewLink::new("https://example.com").with_validity(1))
            .await
            .unwrap();

        f.clock.advance(TimeDelta::minutes(2));
        f.links.purge_expired().await.unwrap();

        assert!(matches!(
            f.links.update(link).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_purge_removes_only_expired() {
        let f = fixture();
        f.links
            .insert(NewLink::new("https://short.example").with_shortcode("short").with_validity(1))
            .await
            .unwrap();
        f.links
            .insert(NewLink::new("https://long.example").with_shortcode("long").with_validity(60))
            .await
            .unwrap();

        f.clock.advance(TimeDelta::minutes(2));
        let report = f.links.purge_expired().await.unwrap();

        assert_eq!(report.removed_count, 1);
        let remaining = f.links.all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].shortcode, "long");
    }

    #[tokio::test]
    async fn test_purge_is_idempotent() {
        let f = fixture();
        f.links
            .insert(NewLink::new("https://example.com").with_validity(1))
            .await
            .unwrap();
        f.clock.advance(TimeDelta::minutes(2));

        assert_eq!(f.links.purge_expired().await.unwrap().removed_count, 1);
        assert_eq!(f.links.purge_expired().await.unwrap().removed_count, 0);

        let log = f.events.read().await.unwrap();
        assert_eq!(log[0].event_name, EventName::PurgeExpired);
        assert_eq!(log[0].payload["removedCount"], 0);
    }

    #[tokio::test]
    async fn test_link_expiring_exactly_now_is_kept() {
        let f = fixture();
        f.links
            .insert(NewLink::new("https://example.com").with_validity(1))
            .await
            .unwrap();

        f.clock.advance(TimeDelta::minutes(1));
        assert_eq!(f.links.purge_expired().await.unwrap().removed_count, 0);

        f.clock.advance(TimeDelta::milliseconds(1));
        assert_eq!(f.links.purge_expired().await.unwrap().removed_count, 1);
    }

    #[tokio::test]
    async fn test_stats_of_expired_link() {
        let f = fixture();
        f.links
            .insert(NewLink::new("https://example.com").with_shortcode("old").with_validity(1))
            .await
            .unwrap();

        assert!(!f.links.stats("old").await.unwrap().expired);

        f.clock.advance(TimeDelta::seconds(61));
        let stats = f.links.stats("old").await.unwrap();
        assert!(stats.expired);
        assert_eq!(stats.click_count, 0);

        assert!(matches!(
            f.links.stats("nope").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_record_copy() {
        let f = fixture();
        f.links
            .insert(NewLink::new("https://example.com").with_shortcode("copyme"))
            .await
            .unwrap();

        let short_url = f.links.short_url("https://s.example.com/", "copyme");
        assert_eq!(short_url, "https://s.example.com/copyme");

        f.links.record_copy("copyme", &short_url, false).await.unwrap();

        let log = f.events.read().await.unwrap();
        assert_eq!(log[0].event_name, EventName::Copied);
        assert_eq!(log[0].payload["success"], false);

        assert!(matches!(
            f.links.record_copy("missing", &short_url, true).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_persists_after_insert() {
        let f = fixture();
        f.links.insert(NewLink::new("https://example.com")).await.unwrap();

        let blob = f.store.get(LINKS_KEY).await.unwrap().unwrap();
        let persisted: Vec<ShortLink> = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_is_surfaced() {
        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_set()
            .returning(|_, _| Err(StoreError::Operation("quota exceeded".into())));

        let links = mock_links(store);
        let result = links.insert(NewLink::new("https://example.com")).await;

        assert!(matches!(result, Err(AppError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_surfaced() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some("[{broken".to_string())));
        store.expect_set().returning(|_, _| Ok(()));

        let links = mock_links(store);

        assert!(matches!(
            links.find_by_code("abc").await,
            Err(AppError::Persistence(_))
        ));
        assert!(matches!(
            links.purge_expired().await,
            Err(AppError::Persistence(_))
        ));
    }
}
