//! BannerRepository port - バナーの取得元
//!
//! エンジンは利用するだけで、カタログ自体は実装しない。
//! テストとデモ CLI 用に `impls::InMemoryBannerRepository` がある。

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Banner, BannerId, RepositoryError};

/// BannerRepository はバナーを解決する
///
/// # 契約
/// - `find_by_id` はバナーを 1 つ返すか `RepositoryError::NotFound`
/// - `choose_random_banner` はエンジンの知らない方針で選んだバナーを 1 つ返す。
///   「出せるバナーがない」は `None` ではなくエラー
/// - どちらもエンジン側ではリトライしない
#[async_trait]
pub trait BannerRepository: Send + Sync {
    async fn find_by_id(&self, id: BannerId) -> Result<Banner, RepositoryError>;

    async fn choose_random_banner(&self) -> Result<Banner, RepositoryError>;
}

#[async_trait]
impl<R: BannerRepository + ?Sized> BannerRepository for Arc<R> {
    async fn find_by_id(&self, id: BannerId) -> Result<Banner, RepositoryError> {
        (**self).find_by_id(id).await
    }

    async fn choose_random_banner(&self) -> Result<Banner, RepositoryError> {
        (**self).choose_random_banner().await
    }
}
