use std::collections::HashSet;

use async_trait::async_trait;
use tracing::debug;

use crate::config::BlockedPairing;
use crate::domain::{ChooserError, ClientId, Decision, PageId, PlayerId};
use crate::ports::AdChooser;

/// BlockingAdChooser vetoes banners from clients a player must never see.
///
/// The check needs the chosen banner's client, so it runs after the inner
/// chooser rather than as a rule. Placed inside the caching layer, a vetoed
/// banner becomes `Suppress` and is therefore never cached.
pub struct BlockingAdChooser<C> {
    inner: C,
    blocked: HashSet<(ClientId, PlayerId)>,
}

impl<C: AdChooser> BlockingAdChooser<C> {
    pub fn new(inner: C, pairings: impl IntoIterator<Item = BlockedPairing>) -> Self {
        Self {
            inner,
            blocked: pairings
                .into_iter()
                .map(|pairing| (pairing.client_id, pairing.player_id))
                .collect(),
        }
    }
}

#[async_trait]
impl<C: AdChooser> AdChooser for BlockingAdChooser<C> {
    async fn get_ad(&self, player: PlayerId, page: &PageId) -> Result<Decision, ChooserError> {
        let decision = self.inner.get_ad(player, page).await?;
        match decision {
            Decision::Show(banner) if self.blocked.contains(&(banner.client_id, player)) => {
                debug!(%player, %page, client = %banner.client_id, "banner blocked for player");
                Ok(Decision::Suppress)
            }
            other => Ok(other),
        }
    }
}
