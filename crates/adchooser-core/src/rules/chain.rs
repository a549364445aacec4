//! RuleChain - ordered evaluation of rules, first match wins.

use std::sync::Arc;

use tracing::debug;

use super::{
    AbSegmentRule, PageExclusionRule, PlayerOptOutRule, RandomBannerRule, Rule,
    WeekdayBlackoutRule,
};
use crate::config::EngineConfig;
use crate::domain::{Decision, PageId, PlayerId, RepositoryError};
use crate::ports::{BannerRepository, Clock};

/// RuleChain holds rules in priority order (index 0 = highest).
///
/// Immutable after construction, so one chain is shared by every request
/// without locking.
pub struct RuleChain {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleChain {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Ask each rule in turn; the first one that applies decides.
    ///
    /// Falls through to `Decision::Suppress` when no rule applies.
    pub async fn choose_banner(
        &self,
        player: PlayerId,
        page: &PageId,
    ) -> Result<Decision, RepositoryError> {
        for rule in &self.rules {
            if !rule.applies_to(player, page) {
                continue;
            }
            let decision = rule.decide(player, page).await?;
            debug!(
                rule = rule.name(),
                %player,
                %page,
                shown = decision.is_shown(),
                "rule decided"
            );
            return Ok(decision);
        }
        debug!(%player, %page, "no rule applied");
        Ok(Decision::Suppress)
    }
}

/// RuleChainBuilder assembles a chain.
///
/// # Example
/// ```ignore
/// let chain = RuleChainBuilder::standard(&EngineConfig::default(), repository, clock);
/// assert_eq!(chain.rule_names(), ["ab_segment", "page_exclusion", "random_banner"]);
/// ```
#[derive(Default)]
pub struct RuleChainBuilder {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleChainBuilder {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule below every rule added so far.
    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn build(self) -> RuleChain {
        RuleChain::new(self.rules)
    }

    /// The production chain.
    ///
    /// Order: A/B segment, player opt-out, page exclusion, weekday
    /// blackout, random banner. The opt-out and blackout rules are only
    /// added when the config lists something for them.
    pub fn standard(
        config: &EngineConfig,
        repository: Arc<dyn BannerRepository>,
        clock: Arc<dyn Clock>,
    ) -> RuleChain {
        let mut builder = Self::new().rule(AbSegmentRule::new(
            config.ab_test.modulus,
            config.ab_test.banner_id,
            Arc::clone(&repository),
        ));
        if !config.opted_out_players.is_empty() {
            builder = builder.rule(PlayerOptOutRule::new(
                config.opted_out_players.iter().copied(),
            ));
        }
        builder = builder.rule(PageExclusionRule::new(config.excluded_pages.iter().cloned()));
        if !config.page_blackouts.is_empty() {
            builder = builder.rule(WeekdayBlackoutRule::new(
                config.page_blackouts.iter().cloned(),
                clock,
            ));
        }
        builder.rule(RandomBannerRule::new(repository)).build()
    }
}
