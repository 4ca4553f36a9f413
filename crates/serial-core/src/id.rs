//! 序號 ID 與產生器

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 隨機段字元集（base36）
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 隨機段長度
const RANDOM_LEN: usize = 9;

/// 序號 ID（不透明字串，建立後不可變）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerialId(String);

impl SerialId {
    /// 由現有字串建立 ID（外部傳入的 ID，例如 UI 選取結果）
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SerialId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SerialId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for SerialId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 序號 ID 產生器
///
/// 格式：`{prefix}-{毫秒時間戳}-{遞增序號}-{9 位 base36 隨機碼}`。
/// 遞增序號在產生器生命週期內單調遞增，同一毫秒內批量建立也不會碰撞。
#[derive(Debug, Default)]
pub struct SerialIdGenerator {
    sequence: u64,
}

impl SerialIdGenerator {
    /// 創建新的產生器
    pub fn new() -> Self {
        Self { sequence: 0 }
    }

    /// 已產生的 ID 數量
    pub fn issued(&self) -> u64 {
        self.sequence
    }

    /// 產生下一個 ID
    pub fn next_id(&mut self, prefix: &str, now: DateTime<Utc>) -> SerialId {
        let sequence = self.sequence;
        self.sequence += 1;

        let mut rng = rand::thread_rng();
        let random: String = (0..RANDOM_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();

        SerialId(format!(
            "{}-{}-{}-{}",
            prefix,
            now.timestamp_millis(),
            sequence,
            random
        ))
    }
}
