//! DecisionCache - time-bounded memory of which banner a player saw on a page.
//!
//! # Expiry
//! Expiry is passive: an entry is only checked against the clock when it is
//! looked up. Nothing sweeps the map, so entries for keys that are never
//! requested again stay until the process exits. An expired entry is
//! overwritten the next time its key is stored.
//!
//! # Weekday blackouts
//! For a page with a blackout, an entry never outlives the start (UTC
//! midnight) of that page's next blackout day. A banner stored late on
//! Tuesday therefore cannot be served on a blacked-out Wednesday; the first
//! request on Wednesday misses and reaches the rule chain.
//!
//! # What gets stored
//! Only banners. A `Decision::Suppress` never reaches the cache, and the
//! entry type has no way to express one.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Datelike, TimeDelta, Utc, Weekday};
use tokio::sync::RwLock;

use crate::config::{PageBlackout, blackout_days_by_page};
use crate::domain::{Banner, PageId, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub player: PlayerId,
    pub page: PageId,
}

impl CacheKey {
    pub fn new(player: PlayerId, page: PageId) -> Self {
        Self { player, page }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub banner: Banner,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// In-memory decision cache.
///
/// Entries are replaced whole under the write lock, so a reader sees either
/// a complete entry or none.
pub struct DecisionCache {
    ttl: TimeDelta,
    blackouts: HashMap<PageId, HashSet<Weekday>>,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl DecisionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            blackouts: HashMap::new(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cut entries for blacked-out pages off at the next blackout day.
    pub fn with_blackouts(mut self, blackouts: impl IntoIterator<Item = PageBlackout>) -> Self {
        self.blackouts = blackout_days_by_page(blackouts);
        self
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// The cached banner for `key`, if there is one and it has not expired.
    pub async fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<Banner> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.banner.clone())
    }

    /// Store `banner` for `key` until `now + ttl`, or until the page's next
    /// blackout day starts if that comes first. Returns the expiry.
    pub async fn put(&self, key: CacheKey, banner: Banner, now: DateTime<Utc>) -> DateTime<Utc> {
        let mut expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        if let Some(cutoff) = self.next_blackout_start(&key.page, now) {
            expires_at = expires_at.min(cutoff);
        }
        let mut entries = self.entries.write().await;
        entries.insert(key, CacheEntry { banner, expires_at });
        expires_at
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// UTC midnight opening the first blackout day for `page` after today.
    fn next_blackout_start(&self, page: &PageId, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let days = self.blackouts.get(page)?;
        let mut day = now.date_naive();
        for _ in 0..7 {
            day = day.succ_opt()?;
            if days.contains(&day.weekday()) {
                return Some(day.and_hms_opt(0, 0, 0)?.and_utc());
            }
        }
        None
    }
}
