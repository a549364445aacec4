//! InMemoryBannerRepository - 開発・テスト用の固定カタログ
//!
//! # 実装
//! - `rotation`: ランダム選択の対象になるバナー
//! - `index`: ID 引き用。rotation と予約バナーの両方を含む
//!
//! 予約バナーは ID では引けるがランダムには選ばれない
//! （A/B 用のクリエイティブを通常ローテーションから外すのと同じ）。

use std::collections::HashMap;

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::domain::{Banner, BannerId, RepositoryError};
use crate::ports::BannerRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryBannerRepository {
    rotation: Vec<Banner>,
    index: HashMap<BannerId, Banner>,
}

impl InMemoryBannerRepository {
    pub fn new(rotation: impl IntoIterator<Item = Banner>) -> Self {
        let rotation: Vec<Banner> = rotation.into_iter().collect();
        let index = rotation
            .iter()
            .map(|banner| (banner.id, banner.clone()))
            .collect();
        Self { rotation, index }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// `find_by_id` でしか引けないバナーを追加
    pub fn with_reserved(mut self, reserved: impl IntoIterator<Item = Banner>) -> Self {
        for banner in reserved {
            self.index.insert(banner.id, banner);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[async_trait]
impl BannerRepository for InMemoryBannerRepository {
    async fn find_by_id(&self, id: BannerId) -> Result<Banner, RepositoryError> {
        self.index
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn choose_random_banner(&self) -> Result<Banner, RepositoryError> {
        let picked = {
            let mut rng = rand::thread_rng();
            self.rotation.choose(&mut rng).cloned()
        };
        picked.ok_or_else(|| RepositoryError::Unavailable("no banners in rotation".to_string()))
    }
}
