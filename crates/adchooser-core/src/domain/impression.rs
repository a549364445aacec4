//! Impression - バナーを実際に表示したときに記録するイベント
//!
//! キャッシュヒットで返したバナーも 1 件として数える。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Banner, PageId, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impression {
    pub player: PlayerId,
    pub page: PageId,
    pub banner: Banner,
    pub shown_at: DateTime<Utc>,
}

impl Impression {
    pub fn new(player: PlayerId, page: PageId, banner: Banner, shown_at: DateTime<Utc>) -> Self {
        Self {
            player,
            page,
            banner,
            shown_at,
        }
    }
}
