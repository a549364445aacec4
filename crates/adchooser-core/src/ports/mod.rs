//! Ports - 抽象化レイヤー
//!
//! エンジンが所有しない外部の協力者（バナーカタログ、インプレッション配信、
//! 時計）を trait で隠蔽する。`AdChooser` は内向きのポートで、
//! すべての chooser レイヤーがこれを実装する。

pub mod ad_chooser;
pub mod banner_repository;
pub mod clock;
pub mod impression_sink;

// 主要な trait を再エクスポート
pub use self::ad_chooser::AdChooser;
pub use self::banner_repository::BannerRepository;
pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::impression_sink::ImpressionSink;
