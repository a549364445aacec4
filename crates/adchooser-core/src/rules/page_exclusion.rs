use std::collections::HashSet;

use async_trait::async_trait;

use super::Rule;
use crate::domain::{Decision, PageId, PlayerId, RepositoryError};

/// Pages on which no banner is ever shown.
pub struct PageExclusionRule {
    pages: HashSet<PageId>,
}

impl PageExclusionRule {
    pub fn new(pages: impl IntoIterator<Item = PageId>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Rule for PageExclusionRule {
    fn name(&self) -> &'static str {
        "page_exclusion"
    }

    fn applies_to(&self, _player: PlayerId, page: &PageId) -> bool {
        self.pages.contains(page)
    }

    async fn decide(&self, player: PlayerId, page: &PageId) -> Result<Decision, RepositoryError> {
        assert!(
            self.applies_to(player, page),
            "page_exclusion asked to decide for non-excluded page {page}"
        );
        Ok(Decision::Suppress)
    }
}
