//! AdChooser port - 全レイヤー共通の唯一の能力
//!
//! base / caching / blocking / logging の各レイヤーがこの trait を実装するので、
//! どのレイヤーでも他のレイヤーを包める（Decorator パターン）。

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ChooserError, Decision, PageId, PlayerId};

/// AdChooser はプレイヤーがページで見るものを決める
///
/// # スレッド安全性
/// - `Send + Sync`: 1 つの chooser を全リクエストのタスクで共有する
#[async_trait]
pub trait AdChooser: Send + Sync {
    async fn get_ad(&self, player: PlayerId, page: &PageId) -> Result<Decision, ChooserError>;
}

#[async_trait]
impl<C: AdChooser + ?Sized> AdChooser for Arc<C> {
    async fn get_ad(&self, player: PlayerId, page: &PageId) -> Result<Decision, ChooserError> {
        (**self).get_ad(player, page).await
    }
}

#[async_trait]
impl<C: AdChooser + ?Sized> AdChooser for Box<C> {
    async fn get_ad(&self, player: PlayerId, page: &PageId) -> Result<Decision, ChooserError> {
        (**self).get_ad(player, page).await
    }
}
