//! 快照差異
//!
//! 總體操作對找不到的 ID 不報錯；呼叫端可比對前後快照判斷操作是否命中。

use serial_core::{Serial, SerialId};
use std::collections::HashMap;

/// 兩個快照之間的差異
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// 只存在於新快照的序號（依新快照順序）
    pub added: Vec<SerialId>,

    /// 兩邊都存在但內容不同的序號（依新快照順序）
    pub changed: Vec<SerialId>,
}

impl SnapshotDiff {
    /// 比較舊快照與新快照
    pub fn between(old: &[Serial], new: &[Serial]) -> Self {
        let previous: HashMap<&SerialId, &Serial> = old.iter().map(|s| (s.id(), s)).collect();
        let mut diff = SnapshotDiff::default();

        for serial in new {
            match previous.get(serial.id()) {
                None => diff.added.push(serial.id().clone()),
                Some(before) if *before != serial => diff.changed.push(serial.id().clone()),
                Some(_) => {}
            }
        }

        diff
    }

    /// 檢查是否無任何變化
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty()
    }

    pub fn was_changed(&self, id: &SerialId) -> bool {
        self.changed.contains(id)
    }
}
