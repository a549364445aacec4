//! Impls - 実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryBannerRepository**: 固定カタログ、ランダム選択は `rand`
//! - **CountingBannerRepository**: 呼び出し回数を数えるラッパー
//! - **RecordingImpressionSink** / **TracingImpressionSink** / **NoopImpressionSink**
//!
//! # 本番用実装
//! 本番のカタログやインプレッション配信はこのクレートの外に置き、
//! `ports::BannerRepository` / `ports::ImpressionSink` 経由で差し込む。

pub mod counting_repository;
pub mod inmem_repository;
pub mod sinks;

// 主要な型を再エクスポート
pub use self::counting_repository::CountingBannerRepository;
pub use self::inmem_repository::InMemoryBannerRepository;
pub use self::sinks::{NoopImpressionSink, RecordingImpressionSink, TracingImpressionSink};
