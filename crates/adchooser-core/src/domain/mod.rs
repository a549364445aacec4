//! Domain - ドメインモデル
//!
//! 外部 I/O に依存しない純粋な型だけを置く。
//! - ids: 型付き ID（PlayerId / BannerId / ClientId / PageId）
//! - banner, decision, impression: 判定の入出力
//! - errors: エラー型と運用分類（ErrorKind）

pub mod banner;
pub mod decision;
pub mod errors;
pub mod ids;
pub mod impression;

pub use self::banner::Banner;
pub use self::decision::Decision;
pub use self::errors::{ChooserError, ErrorKind, RepositoryError, SinkError};
pub use self::ids::{BannerId, ClientId, Id, IdMarker, PageId, PlayerId};
pub use self::impression::Impression;
