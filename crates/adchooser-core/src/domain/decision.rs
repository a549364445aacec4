//! Decision model: what to show for one (player, page) request.

use serde::{Deserialize, Serialize};

use super::Banner;

/// The outcome of ad selection.
///
/// `Suppress` is an explicit answer ("show nothing"), not a missing one.
/// Rules that return it end the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "banner", rename_all = "snake_case")]
pub enum Decision {
    /// Show this banner.
    Show(Banner),

    /// Show nothing.
    Suppress,
}

impl Decision {
    pub fn banner(&self) -> Option<&Banner> {
        match self {
            Decision::Show(banner) => Some(banner),
            Decision::Suppress => None,
        }
    }

    pub fn into_banner(self) -> Option<Banner> {
        match self {
            Decision::Show(banner) => Some(banner),
            Decision::Suppress => None,
        }
    }

    pub fn is_shown(&self) -> bool {
        matches!(self, Decision::Show(_))
    }
}

impl From<Banner> for Decision {
    fn from(banner: Banner) -> Self {
        Decision::Show(banner)
    }
}

impl From<Option<Banner>> for Decision {
    fn from(banner: Option<Banner>) -> Self {
        banner.map_or(Decision::Suppress, Decision::Show)
    }
}
