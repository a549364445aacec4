//! Errors - エラー型と運用分類

use thiserror::Error;

use super::BannerId;

/// ErrorKind は失敗の分類（リトライ方針を持つ呼び出し側向け）
///
/// エンジン自身はリトライしない。
/// - Transient: 一時的なエラー（リトライ推奨）
/// - Permanent: 恒久的なエラー（リトライ無意味）
/// - Infrastructure: インフラエラー（配送先そのものの障害）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
    Infrastructure,
}

/// RepositoryError は BannerRepository が返すエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("{0} not found")]
    NotFound(BannerId),

    #[error("banner repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::NotFound(_) => ErrorKind::Permanent,
            RepositoryError::Unavailable(_) => ErrorKind::Transient,
        }
    }
}

/// SinkError は ImpressionSink が返すエラー
///
/// chooser の呼び出し側には届かない（logging レイヤーがログに出して捨てる）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("impression rejected: {0}")]
    Rejected(String),

    #[error("impression sink unavailable: {0}")]
    Unavailable(String),
}

impl SinkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SinkError::Rejected(_) => ErrorKind::Permanent,
            SinkError::Unavailable(_) => ErrorKind::Infrastructure,
        }
    }
}

/// ChooserError は `AdChooser::get_ad` のエラー
///
/// 同じキャッシュミスを待っていた全員に 1 回分の失敗を配れるよう `Clone`。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChooserError {
    #[error("decision failed: {0}")]
    Repository(#[from] RepositoryError),
}

impl ChooserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChooserError::Repository(err) => err.kind(),
        }
    }
}
