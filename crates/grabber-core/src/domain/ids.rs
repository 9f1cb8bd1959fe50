//! Domain identifiers (strongly-typed IDs).
//!
//! - `TargetId`: 教務システム側のコース ID（数値）をそのまま包む
//! - `RunId`: ワーカー 1 回の実行ごとに振る ULID（ログの span と handle の照合に使う）

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Identifier of an acquisition target.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(u64);

impl TargetId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TargetId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of one worker run.
///
/// ULID なので生成順でソートできる。`start` のたびに新しい値を振る。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(Ulid);

impl RunId {
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl From<Ulid> for RunId {
    fn from(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}
