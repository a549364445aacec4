use async_trait::async_trait;

use crate::domain::{ChooserError, Decision, PageId, PlayerId};
use crate::ports::AdChooser;
use crate::rules::RuleChain;

/// BaseAdChooser evaluates the rule chain and nothing else.
///
/// No cache, no impressions. Its only side effects are the repository calls
/// the chain makes.
pub struct BaseAdChooser {
    chain: RuleChain,
}

impl BaseAdChooser {
    pub fn new(chain: RuleChain) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &RuleChain {
        &self.chain
    }
}

#[async_trait]
impl AdChooser for BaseAdChooser {
    async fn get_ad(&self, player: PlayerId, page: &PageId) -> Result<Decision, ChooserError> {
        Ok(self.chain.choose_banner(player, page).await?)
    }
}
