//! CachingAdChooser - cache-aside over any chooser.
//!
//! # Flow
//! 1. Live entry for (player, page): return it, inner chooser untouched
//! 2. Otherwise ask the inner chooser
//! 3. `Show(banner)` is stored for the TTL; `Suppress` and errors are not
//!
//! # Concurrent misses
//! With `coalesce_misses` on, the first caller to miss a key runs the
//! evaluation and everyone else who misses the same key while it runs waits
//! for that result (success, `Suppress` or error alike). The in-flight slot
//! is dropped as soon as the evaluation finishes, so the next request after
//! a `Suppress` evaluates again.
//! With it off, every miss evaluates on its own and the last `put` wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::cache::{CacheKey, DecisionCache};
use crate::domain::{ChooserError, Decision, PageId, PlayerId};
use crate::ports::{AdChooser, Clock};

type InFlight = Arc<OnceCell<Result<Decision, ChooserError>>>;

/// Removes a key's in-flight slot when the caller holding it goes away,
/// whether the evaluation finished or the caller's future was dropped.
struct SlotRelease<'a> {
    in_flight: &'a Mutex<HashMap<CacheKey, InFlight>>,
    key: &'a CacheKey,
    slot: &'a InFlight,
}

impl Drop for SlotRelease<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(current) = in_flight.get(self.key) else {
            return;
        };
        if !Arc::ptr_eq(current, self.slot) {
            return;
        }
        // The map and this caller hold the only two references when nobody
        // else is waiting.
        if self.slot.initialized() || Arc::strong_count(self.slot) <= 2 {
            in_flight.remove(self.key);
        }
    }
}

pub struct CachingAdChooser<C> {
    inner: C,
    cache: DecisionCache,
    clock: Arc<dyn Clock>,
    coalesce_misses: bool,
    in_flight: Mutex<HashMap<CacheKey, InFlight>>,
}

impl<C: AdChooser> CachingAdChooser<C> {
    pub fn new(inner: C, cache: DecisionCache, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache,
            clock,
            coalesce_misses: true,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_coalescing(mut self, enabled: bool) -> Self {
        self.coalesce_misses = enabled;
        self
    }

    pub fn cache(&self) -> &DecisionCache {
        &self.cache
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn in_flight(&self) -> MutexGuard<'_, HashMap<CacheKey, InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ask the inner chooser and store the banner, if any.
    async fn load(&self, key: &CacheKey) -> Result<Decision, ChooserError> {
        let decision = self.inner.get_ad(key.player, &key.page).await?;
        match &decision {
            Decision::Show(banner) => {
                let expires_at = self
                    .cache
                    .put(key.clone(), banner.clone(), self.clock.now())
                    .await;
                debug!(
                    player = %key.player,
                    page = %key.page,
                    banner = %banner.id,
                    %expires_at,
                    "decision cached"
                );
            }
            Decision::Suppress => {
                debug!(player = %key.player, page = %key.page, "suppress not cached");
            }
        }
        Ok(decision)
    }

    async fn load_coalesced(&self, key: &CacheKey) -> Result<Decision, ChooserError> {
        let slot = Arc::clone(self.in_flight().entry(key.clone()).or_default());
        let _release = SlotRelease {
            in_flight: &self.in_flight,
            key,
            slot: &slot,
        };

        slot
            .get_or_init(|| async {
                // A previous slot may have filled the cache between our miss
                // and taking this one.
                if let Some(banner) = self.cache.get(key, self.clock.now()).await {
                    return Ok(Decision::Show(banner));
                }
                self.load(key).await
            })
            .await
            .clone()
    }
}

#[async_trait]
impl<C: AdChooser> AdChooser for CachingAdChooser<C> {
    async fn get_ad(&self, player: PlayerId, page: &PageId) -> Result<Decision, ChooserError> {
        let key = CacheKey::new(player, page.clone());
        if let Some(banner) = self.cache.get(&key, self.clock.now()).await {
            debug!(%player, %page, banner = %banner.id, "decision cache hit");
            return Ok(Decision::Show(banner));
        }
        debug!(%player, %page, "decision cache miss");

        if self.coalesce_misses {
            self.load_coalesced(&key).await
        } else {
            self.load(&key).await
        }
    }
}
