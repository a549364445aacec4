//! ImpressionSink port - 「バナーを表示した」イベントの送り先
//!
//! `emit` の失敗は logging レイヤーがログに出して握りつぶす。
//! ただし `emit` は判定を返す前に await されるので、その遅延は
//! バナーを表示するすべてのリクエストに上乗せされる。

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Impression, SinkError};

/// ImpressionSink は表示したバナー 1 件ごとにインプレッションを受け取る
///
/// # レイテンシ
/// - リクエスト経路上で `Show` のたびに呼ばれる
/// - ネットワークやディスクに書く実装は、キュー（バックグラウンドタスクが
///   読み出す bounded channel など）に積んで、配送を待たずに返すこと
#[async_trait]
pub trait ImpressionSink: Send + Sync {
    async fn emit(&self, impression: Impression) -> Result<(), SinkError>;
}

#[async_trait]
impl<S: ImpressionSink + ?Sized> ImpressionSink for Arc<S> {
    async fn emit(&self, impression: Impression) -> Result<(), SinkError> {
        (**self).emit(impression).await
    }
}
