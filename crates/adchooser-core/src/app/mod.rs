//! App - chooser レイヤーとワイヤリング
//!
//! # コンポーネント
//! - **BaseAdChooser**: ルールチェーンを評価するだけ
//! - **CachingAdChooser**: TTL 付き cache-aside（Suppress はキャッシュしない）
//! - **BlockingAdChooser**: 禁止された client/player の組み合わせを弾く
//! - **LoggingAdChooser**: インプレッションを記録
//! - **AdChooserBuilder**: Logging ∘ Caching ∘ (Blocking) ∘ Base を組み立てる

pub mod base;
pub mod blocking;
pub mod builder;
pub mod caching;
pub mod logging;

pub use self::base::BaseAdChooser;
pub use self::blocking::BlockingAdChooser;
pub use self::builder::{AdChooserBuilder, BuildError};
pub use self::caching::CachingAdChooser;
pub use self::logging::LoggingAdChooser;
