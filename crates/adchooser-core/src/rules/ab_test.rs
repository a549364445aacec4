use std::sync::Arc;

use async_trait::async_trait;

use super::Rule;
use crate::domain::{BannerId, Decision, PageId, PlayerId, RepositoryError};
use crate::ports::BannerRepository;

/// Players in the A/B segment always get one pre-selected banner.
///
/// Segment membership is `player_id % modulus == 0`, on every page.
pub struct AbSegmentRule {
    modulus: u64,
    banner_id: BannerId,
    repository: Arc<dyn BannerRepository>,
}

impl AbSegmentRule {
    pub fn new(modulus: u64, banner_id: BannerId, repository: Arc<dyn BannerRepository>) -> Self {
        Self {
            modulus,
            banner_id,
            repository,
        }
    }
}

#[async_trait]
impl Rule for AbSegmentRule {
    fn name(&self) -> &'static str {
        "ab_segment"
    }

    fn applies_to(&self, player: PlayerId, _page: &PageId) -> bool {
        player.is_multiple_of(self.modulus)
    }

    async fn decide(&self, player: PlayerId, page: &PageId) -> Result<Decision, RepositoryError> {
        assert!(
            self.applies_to(player, page),
            "ab_segment asked to decide for {player} outside the segment"
        );
        let banner = self.repository.find_by_id(self.banner_id).await?;
        Ok(Decision::Show(banner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryBannerRepository;

    #[tokio::test]
    #[should_panic(expected = "outside the segment")]
    async fn deciding_outside_the_segment_panics() {
        let rule = AbSegmentRule::new(
            5,
            BannerId::new(123),
            Arc::new(InMemoryBannerRepository::empty()),
        );
        let _ = rule.decide(PlayerId::new(7), &PageId::from("top")).await;
    }
}
