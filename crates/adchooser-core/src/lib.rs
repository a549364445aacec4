//! adchooser-core
//!
//! プレイヤーがページを開いたときに、どのバナーを出すか（出さないか）を決める。
//!
//! # モジュール構成
//! - **domain**: ID、バナー、判定結果、インプレッション、エラー
//! - **ports**: `AdChooser`, `BannerRepository`, `ImpressionSink`, `Clock`
//! - **rules**: ルールチェーン（A/B セグメント、除外、ランダムフォールバック）
//! - **cache**: TTL 付きの判定キャッシュ
//! - **app**: chooser のレイヤー（base / caching / blocking / logging）と Builder
//! - **impls**: 開発・テスト用のインメモリ実装
//! - **config**: `EngineConfig`

pub mod app;
pub mod cache;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod rules;

pub use app::{AdChooserBuilder, BuildError};
pub use config::{ConfigError, EngineConfig};
pub use domain::{Banner, BannerId, ChooserError, ClientId, Decision, PageId, PlayerId};
pub use ports::AdChooser;
