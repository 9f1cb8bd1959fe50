//! Target - 取得対象（コース）と、それを実行するアカウント。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TargetId;

/// An acquisition candidate.
///
/// `metadata` は AcquisitionClient がリクエストを組み立てるのに必要な情報
/// （教師名、分類など）をそのまま運ぶ。エンジン側では中身を見ない。
///
/// Equality is by `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub name: String,

    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl Target {
    pub fn new(id: impl Into<TargetId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Target {}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Identity handle used to open a client session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub session_id: String,
}

impl Account {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

// session_id はログに出さない
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("session_id", &"<redacted>")
            .finish()
    }
}
