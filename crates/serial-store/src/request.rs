//! 操作參數記錄

use serde::{Deserialize, Serialize};
use serial_core::{SerialId, TargetType};
use std::collections::BTreeMap;

/// 單筆建立
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSerial {
    pub serial_number: String,
    pub buyer_part_number: String,
    #[serde(default)]
    pub custom_attributes: BTreeMap<String, String>,
}

impl CreateSerial {
    pub fn new(serial_number: impl Into<String>, buyer_part_number: impl Into<String>) -> Self {
        Self {
            serial_number: serial_number.into(),
            buyer_part_number: buyer_part_number.into(),
            custom_attributes: BTreeMap::new(),
        }
    }

    /// 建構器模式：加入自訂屬性
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_attributes.insert(key.into(), value.into());
        self
    }
}

/// 批量建立（流水號）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCreate {
    pub prefix: String,
    pub start_number: u64,
    pub count: u32,
    pub buyer_part_number: String,
}

impl BulkCreate {
    pub fn new(
        prefix: impl Into<String>,
        start_number: u64,
        count: u32,
        buyer_part_number: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            start_number,
            count,
            buyer_part_number: buyer_part_number.into(),
        }
    }

    /// 流水號序列；超出 u64 範圍的部分不產生
    pub fn numbers(&self) -> impl Iterator<Item = u64> + '_ {
        (0..u64::from(self.count)).map_while(move |i| self.start_number.checked_add(i))
    }
}

/// 匯入批次的單筆資料
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub serial_number: String,
    #[serde(default)]
    pub custom_attributes: BTreeMap<String, String>,
}

impl ImportEntry {
    pub fn new(serial_number: impl Into<String>) -> Self {
        Self {
            serial_number: serial_number.into(),
            custom_attributes: BTreeMap::new(),
        }
    }

    /// 建構器模式：加入自訂屬性
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_attributes.insert(key.into(), value.into());
        self
    }
}

/// 外部批次匯入
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportBatch {
    pub entries: Vec<ImportEntry>,
    pub buyer_part_number: String,
}

impl ImportBatch {
    pub fn new(entries: Vec<ImportEntry>, buyer_part_number: impl Into<String>) -> Self {
        Self {
            entries,
            buyer_part_number: buyer_part_number.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 指派請求
///
/// `target_id` 為空字串表示取消指派，此時 `target_type` 會被忽略。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRequest {
    pub serial_ids: Vec<SerialId>,
    pub target_id: String,
    pub target_type: TargetType,
    #[serde(default)]
    pub temporary: bool,
}

impl AssignRequest {
    /// 創建正式指派請求
    pub fn new(
        serial_ids: Vec<SerialId>,
        target_id: impl Into<String>,
        target_type: TargetType,
    ) -> Self {
        Self {
            serial_ids,
            target_id: target_id.into(),
            target_type,
            temporary: false,
        }
    }

    /// 創建取消指派請求
    pub fn unassign(serial_ids: Vec<SerialId>) -> Self {
        Self::new(serial_ids, "", TargetType::Item)
    }

    /// 建構器模式：設為暫時保留
    pub fn as_temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    /// 建構器模式：設置是否暫時保留
    pub fn with_temporary(mut self, temporary: bool) -> Self {
        self.temporary = temporary;
        self
    }

    pub fn is_unassign(&self) -> bool {
        self.target_id.is_empty()
    }
}
