use std::sync::Arc;

use async_trait::async_trait;

use super::Rule;
use crate::domain::{Decision, PageId, PlayerId, RepositoryError};
use crate::ports::BannerRepository;

/// Fallback: applies to everything, asks the repository for any banner.
pub struct RandomBannerRule {
    repository: Arc<dyn BannerRepository>,
}

impl RandomBannerRule {
    pub fn new(repository: Arc<dyn BannerRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Rule for RandomBannerRule {
    fn name(&self) -> &'static str {
        "random_banner"
    }

    fn applies_to(&self, _player: PlayerId, _page: &PageId) -> bool {
        true
    }

    async fn decide(&self, _player: PlayerId, _page: &PageId) -> Result<Decision, RepositoryError> {
        let banner = self.repository.choose_random_banner().await?;
        Ok(Decision::Show(banner))
    }
}
