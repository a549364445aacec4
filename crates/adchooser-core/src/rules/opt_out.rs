use std::collections::HashSet;

use async_trait::async_trait;

use super::Rule;
use crate::domain::{Decision, PageId, PlayerId, RepositoryError};

/// Players who asked never to be shown ads.
pub struct PlayerOptOutRule {
    players: HashSet<PlayerId>,
}

impl PlayerOptOutRule {
    pub fn new(players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            players: players.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Rule for PlayerOptOutRule {
    fn name(&self) -> &'static str {
        "player_opt_out"
    }

    fn applies_to(&self, player: PlayerId, _page: &PageId) -> bool {
        self.players.contains(&player)
    }

    async fn decide(&self, player: PlayerId, page: &PageId) -> Result<Decision, RepositoryError> {
        assert!(
            self.applies_to(player, page),
            "player_opt_out asked to decide for {player}, who has not opted out"
        );
        Ok(Decision::Suppress)
    }
}
