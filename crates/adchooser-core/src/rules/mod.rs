//! Rules - eligibility policies evaluated in a fixed priority order.
//!
//! A rule answers two questions: "do you apply to this request?" and, only
//! if it does, "what should be shown?". The first rule that applies has the
//! final word, even when its answer is `Decision::Suppress`.

pub mod ab_test;
pub mod chain;
pub mod opt_out;
pub mod page_exclusion;
pub mod random_banner;
pub mod weekday_blackout;

pub use self::ab_test::AbSegmentRule;
pub use self::chain::{RuleChain, RuleChainBuilder};
pub use self::opt_out::PlayerOptOutRule;
pub use self::page_exclusion::PageExclusionRule;
pub use self::random_banner::RandomBannerRule;
pub use self::weekday_blackout::WeekdayBlackoutRule;

use async_trait::async_trait;

use crate::domain::{Decision, PageId, PlayerId, RepositoryError};

/// Rule is one link of the chain.
///
/// # Contract
/// - `decide` is only called after `applies_to` returned true for the same pair
/// - `decide` fails only when the repository does; calling it for a pair the
///   rule does not apply to is a bug and may panic
#[async_trait]
pub trait Rule: Send + Sync {
    /// Short stable name, used in logs.
    fn name(&self) -> &'static str;

    fn applies_to(&self, player: PlayerId, page: &PageId) -> bool;

    async fn decide(&self, player: PlayerId, page: &PageId) -> Result<Decision, RepositoryError>;
}
