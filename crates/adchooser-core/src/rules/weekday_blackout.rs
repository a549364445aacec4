use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Weekday};

use super::Rule;
use crate::config::{PageBlackout, blackout_days_by_page};
use crate::domain::{Decision, PageId, PlayerId, RepositoryError};
use crate::ports::Clock;

/// No ads on certain pages on certain days of the week.
///
/// The weekday is taken from the injected clock in UTC. The decision cache
/// is built with the same blackouts, so no cached banner survives into a
/// blackout day.
pub struct WeekdayBlackoutRule {
    blackouts: HashMap<PageId, HashSet<Weekday>>,
    clock: Arc<dyn Clock>,
}

impl WeekdayBlackoutRule {
    pub fn new(blackouts: impl IntoIterator<Item = PageBlackout>, clock: Arc<dyn Clock>) -> Self {
        Self {
            blackouts: blackout_days_by_page(blackouts),
            clock,
        }
    }
}

#[async_trait]
impl Rule for WeekdayBlackoutRule {
    fn name(&self) -> &'static str {
        "weekday_blackout"
    }

    fn applies_to(&self, _player: PlayerId, page: &PageId) -> bool {
        self.blackouts
            .get(page)
            .is_some_and(|days| days.contains(&self.clock.now().weekday()))
    }

    // No applies_to check here: the clock may cross midnight between the two
    // calls, and the answer is Suppress either way.
    async fn decide(&self, _player: PlayerId, _page: &PageId) -> Result<Decision, RepositoryError> {
        Ok(Decision::Suppress)
    }
}
