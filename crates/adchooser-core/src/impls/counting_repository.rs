use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{Banner, BannerId, RepositoryError};
use crate::ports::BannerRepository;

/// Wraps a repository and counts the calls that reach it.
///
/// The CLI reports these counts; tests use them to prove the cache works.
#[derive(Debug, Default)]
pub struct CountingBannerRepository<R> {
    inner: R,
    lookups: AtomicUsize,
    random_picks: AtomicUsize,
}

impl<R: BannerRepository> CountingBannerRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
            random_picks: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    pub fn random_picks(&self) -> usize {
        self.random_picks.load(Ordering::Relaxed)
    }

    pub fn total_calls(&self) -> usize {
        self.lookups() + self.random_picks()
    }
}

#[async_trait]
impl<R: BannerRepository> BannerRepository for CountingBannerRepository<R> {
    async fn find_by_id(&self, id: BannerId) -> Result<Banner, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.inner.find_by_id(id).await
    }

    async fn choose_random_banner(&self) -> Result<Banner, RepositoryError> {
        self.random_picks.fetch_add(1, Ordering::Relaxed);
        self.inner.choose_random_banner().await
    }
}
