//! AdChooserBuilder - chooser スタックの構築とワイヤリング
//!
//! # スタック（外側から）
//! - LoggingAdChooser: 返したバナー 1 件につきインプレッション 1 件
//! - CachingAdChooser: 30 分の cache-aside。Suppress はキャッシュしない。
//!   ブラックアウトのあるページは、その曜日の 0 時（UTC）で打ち切る
//! - BlockingAdChooser: 禁止ペアが設定されているときだけ挟む
//! - BaseAdChooser: ルールチェーン
//!
//! # Fail-fast 設計
//! `build()` で config を検証し、repository か impression sink が無ければ
//! 最初のリクエストを待たずにエラーを返す。

use std::sync::Arc;

use super::{BaseAdChooser, BlockingAdChooser, CachingAdChooser, LoggingAdChooser};
use crate::cache::DecisionCache;
use crate::config::{ConfigError, EngineConfig};
use crate::ports::{AdChooser, BannerRepository, Clock, ImpressionSink, SystemClock};
use crate::rules::RuleChainBuilder;

/// BuildError はスタック構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no banner repository was provided")]
    MissingRepository,

    #[error("no impression sink was provided")]
    MissingImpressionSink,

    #[error("invalid engine config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// AdChooserBuilder は呼び出し側に渡す chooser を組み立てる
///
/// # 使用例
/// ```ignore
/// let chooser = AdChooserBuilder::new()
///     .config(EngineConfig::default())
///     .repository(Arc::new(repository))
///     .impression_sink(Arc::new(TracingImpressionSink))
///     .build()?;
/// let decision = chooser.get_ad(PlayerId::new(7), &PageId::from("top")).await?;
/// ```
pub struct AdChooserBuilder {
    config: EngineConfig,
    repository: Option<Arc<dyn BannerRepository>>,
    sink: Option<Arc<dyn ImpressionSink>>,
    clock: Arc<dyn Clock>,
}

impl AdChooserBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            repository: None,
            sink: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn repository(mut self, repository: Arc<dyn BannerRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn impression_sink(mut self, sink: Arc<dyn ImpressionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 省略時は `SystemClock`
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// ルールチェーンだけ（キャッシュもインプレッションも無し）
    pub fn build_base(&self) -> Result<BaseAdChooser, BuildError> {
        self.config.validate()?;
        let repository = self
            .repository
            .clone()
            .ok_or(BuildError::MissingRepository)?;
        let chain = RuleChainBuilder::standard(&self.config, repository, Arc::clone(&self.clock));
        Ok(BaseAdChooser::new(chain))
    }

    /// フルスタック
    pub fn build(self) -> Result<Arc<dyn AdChooser>, BuildError> {
        let base = self.build_base()?;
        let sink = self.sink.ok_or(BuildError::MissingImpressionSink)?;
        let cache = DecisionCache::new(self.config.cache.ttl())
            .with_blackouts(self.config.page_blackouts.iter().cloned());
        let coalesce = self.config.cache.coalesce_misses;

        let chooser: Arc<dyn AdChooser> = if self.config.blocked_pairings.is_empty() {
            let caching = CachingAdChooser::new(base, cache, Arc::clone(&self.clock))
                .with_coalescing(coalesce);
            Arc::new(LoggingAdChooser::new(caching, sink, self.clock))
        } else {
            let blocking = BlockingAdChooser::new(base, self.config.blocked_pairings.iter().copied());
            let caching = CachingAdChooser::new(blocking, cache, Arc::clone(&self.clock))
                .with_coalescing(coalesce);
            Arc::new(LoggingAdChooser::new(caching, sink, self.clock))
        };
        Ok(chooser)
    }
}

impl Default for AdChooserBuilder {
    fn default() -> Self {
        Self::new()
    }
}
