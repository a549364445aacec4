//! Domain identifiers (strongly-typed IDs).
//!
//! プレイヤー・バナー・クライアントの ID はどれも外部から来る `u64` なので、
//! Phantom type パターンで 1 つのジェネリック `Id<T>` を共有する。
//!
//! ## Phantom Type パターン
//! `T` は実行時には使わない（PhantomData）マーカー型で、
//! `PlayerId` を `BannerId` の位置に渡すとコンパイルエラーになる。
//!
//! ページは名前（`"profile"`, `"top"`）で識別するので、
//! `PageId` は別の文字列 newtype にしている。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"player-", "banner-", "client-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    /// Display で使うプレフィックス（例: "player-", "banner-"）
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// 中身は `u64` だけ。`T` による区別は実行時コストゼロで、
/// 取り違えはコンパイル時に弾かれる。
///
/// # 例
/// ```ignore
/// let player = PlayerId::new(10);
/// let banner = BannerId::new(10);
/// // player と banner は異なる型なので、混同できない
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T: IdMarker> {
    value: u64,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub const fn get(&self) -> u64 {
        self.value
    }

    /// 値が `modulus` の倍数なら true
    ///
    /// `modulus` が 0 のときは常に false。
    pub fn is_multiple_of(&self, modulus: u64) -> bool {
        modulus != 0 && self.value % modulus == 0
    }
}

impl<T: IdMarker> From<u64> for Id<T> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

// シリアライズ形式は数値そのもの
impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::new)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.value)
    }
}

// ========================================
// マーカー型
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerTag {}

impl IdMarker for PlayerTag {
    fn prefix() -> &'static str {
        "player-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BannerTag {}

impl IdMarker for BannerTag {
    fn prefix() -> &'static str {
        "banner-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClientTag {}

impl IdMarker for ClientTag {
    fn prefix() -> &'static str {
        "client-"
    }
}

/// ページを要求したプレイヤー
pub type PlayerId = Id<PlayerTag>;

/// リポジトリが保持するバナー
pub type BannerId = Id<BannerTag>;

/// バナーを出稿している広告主
pub type ClientId = Id<ClientTag>;

/// 閲覧中のページ（名前で識別）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
