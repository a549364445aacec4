//! Engine configuration.
//!
//! Everything has a default, and the defaults give the standard chain:
//! A/B segment (every 5th player sees banner 123), no ads on "profile",
//! random banner otherwise, decisions cached for 30 minutes.
//!
//! The legacy extras (opted-out players, weekday blackouts, blocked
//! client/player pairings) are empty unless configured.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::domain::{BannerId, ClientId, PageId, PlayerId};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("ab_test.modulus must be greater than zero")]
    ZeroModulus,

    #[error("cache.ttl_secs must be greater than zero")]
    ZeroTtl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ab_test: AbTestConfig,
    pub excluded_pages: Vec<PageId>,
    pub cache: CacheConfig,
    pub opted_out_players: Vec<PlayerId>,
    pub page_blackouts: Vec<PageBlackout>,
    pub blocked_pairings: Vec<BlockedPairing>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ab_test: AbTestConfig::default(),
            excluded_pages: vec![PageId::new("profile")],
            cache: CacheConfig::default(),
            opted_out_players: Vec::new(),
            page_blackouts: Vec::new(),
            blocked_pairings: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ab_test.modulus == 0 {
            return Err(ConfigError::ZeroModulus);
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        Ok(())
    }
}

/// Which players are in the A/B segment and what they see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbTestConfig {
    /// Players whose id is a multiple of this are in the segment.
    pub modulus: u64,
    pub banner_id: BannerId,
}

impl Default for AbTestConfig {
    fn default() -> Self {
        Self {
            modulus: 5,
            banner_id: BannerId::new(123),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    /// Let concurrent misses on one key share a single evaluation.
    pub coalesce_misses: bool,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 30 * 60,
            coalesce_misses: true,
        }
    }
}

/// No ads on `page` on `weekday` (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBlackout {
    pub page: PageId,
    pub weekday: Weekday,
}

/// Blacked-out weekdays keyed by page.
pub fn blackout_days_by_page(
    blackouts: impl IntoIterator<Item = PageBlackout>,
) -> HashMap<PageId, HashSet<Weekday>> {
    let mut by_page: HashMap<PageId, HashSet<Weekday>> = HashMap::new();
    for blackout in blackouts {
        by_page
            .entry(blackout.page)
            .or_default()
            .insert(blackout.weekday);
    }
    by_page
}

/// Never show banners of `client_id` to `player_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockedPairing {
    pub client_id: ClientId,
    pub player_id: PlayerId,
}
