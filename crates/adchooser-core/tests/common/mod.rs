#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use adchooser_core::domain::{Impression, RepositoryError, SinkError};
use adchooser_core::ports::{BannerRepository, ImpressionSink};
use adchooser_core::{Banner, BannerId, ClientId};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

pub const AB_BANNER_ID: u64 = 123;

pub fn ab_banner() -> Banner {
    Banner::new(BannerId::new(AB_BANNER_ID), ClientId::new(1))
}

pub fn banner(id: u64, client: u64) -> Banner {
    Banner::new(BannerId::new(id), ClientId::new(client))
}

/// A Wednesday.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap()
}

/// Repository whose random pick is set by the test, with call counters.
pub struct ScriptedRepository {
    random: Mutex<Result<Banner, RepositoryError>>,
    lookups: AtomicUsize,
    random_picks: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedRepository {
    pub fn new(random: Banner) -> Self {
        Self {
            random: Mutex::new(Ok(random)),
            lookups: AtomicUsize::new(0),
            random_picks: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Every call sleeps first, to widen the window for concurrent misses.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_random(&self, random: Result<Banner, RepositoryError>) {
        *self.random.lock().unwrap() = random;
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn random_picks(&self) -> usize {
        self.random_picks.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.lookups() + self.random_picks()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl BannerRepository for ScriptedRepository {
    async fn find_by_id(&self, id: BannerId) -> Result<Banner, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if id == BannerId::new(AB_BANNER_ID) {
            Ok(ab_banner())
        } else {
            Err(RepositoryError::NotFound(id))
        }
    }

    async fn choose_random_banner(&self) -> Result<Banner, RepositoryError> {
        self.random_picks.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.random.lock().unwrap().clone()
    }
}

pub struct FailingSink {
    pub attempts: AtomicUsize,
}

impl FailingSink {
    pub fn new() -> Self {
        Self {
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ImpressionSink for FailingSink {
    async fn emit(&self, _impression: Impression) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::Unavailable("collector down".into()))
    }
}
