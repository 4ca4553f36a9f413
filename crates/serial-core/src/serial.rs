//! 序號模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{SerialError, SerialId};

/// 序號狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialStatus {
    /// 未指派（初始狀態）
    Unassigned,
    /// 暫時保留
    Reserved,
    /// 已指派
    Assigned,
}

impl fmt::Display for SerialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SerialStatus::Unassigned => "unassigned",
            SerialStatus::Reserved => "reserved",
            SerialStatus::Assigned => "assigned",
        };
        f.write_str(s)
    }
}

/// 指派目標類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// ASN 品項
    Item,
    /// 批次
    Lot,
    /// 包裝
    Package,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetType::Item => "item",
            TargetType::Lot => "lot",
            TargetType::Package => "package",
        };
        f.write_str(s)
    }
}

/// 指派資訊（目標 ID 與類型必須同時存在）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub target_id: String,
    pub target_type: TargetType,
}

/// 序號
///
/// 狀態與指派資訊只能透過 [`Serial::assign`] / [`Serial::unassign`] 一起變更，
/// 因此 `status == Unassigned` 與「無指派資訊」永遠一致。
/// 反序列化時經由 `SerialRecord` 檢查，不一致的記錄會被拒絕。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SerialRecord")]
pub struct Serial {
    id: SerialId,
    serial_number: String,
    buyer_part_number: String,
    status: SerialStatus,
    assignment: Option<Assignment>,
    parent_serial: Option<SerialId>,
    child_serials: Vec<SerialId>,
    custom_attributes: BTreeMap<String, String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Serial {
    /// 創建新的未指派序號
    pub fn new(
        id: SerialId,
        serial_number: String,
        buyer_part_number: String,
        custom_attributes: BTreeMap<String, String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            serial_number,
            buyer_part_number,
            status: SerialStatus::Unassigned,
            assignment: None,
            parent_serial: None,
            child_serials: Vec::new(),
            custom_attributes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &SerialId {
        &self.id
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn buyer_part_number(&self) -> &str {
        &self.buyer_part_number
    }

    pub fn status(&self) -> SerialStatus {
        self.status
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    /// 指派目標 ID
    pub fn assigned_to(&self) -> Option<&str> {
        self.assignment.as_ref().map(|a| a.target_id.as_str())
    }

    /// 指派目標類型
    pub fn assigned_to_type(&self) -> Option<TargetType> {
        self.assignment.as_ref().map(|a| a.target_type)
    }

    pub fn parent_serial(&self) -> Option<&SerialId> {
        self.parent_serial.as_ref()
    }

    pub fn child_serials(&self) -> &[SerialId] {
        &self.child_serials
    }

    pub fn custom_attributes(&self) -> &BTreeMap<String, String> {
        &self.custom_attributes
    }

    /// 取得單一自訂屬性
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.custom_attributes.get(key).map(String::as_str)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_unassigned(&self) -> bool {
        self.status == SerialStatus::Unassigned
    }

    pub fn is_reserved(&self) -> bool {
        self.status == SerialStatus::Reserved
    }

    pub fn is_assigned(&self) -> bool {
        self.status == SerialStatus::Assigned
    }

    pub fn has_parent(&self) -> bool {
        self.parent_serial.is_some()
    }

    pub fn has_children(&self) -> bool {
        !self.child_serials.is_empty()
    }

    /// 檢查是否可作為子序號被連結（未指派且無父序號）
    pub fn is_linkable_child(&self) -> bool {
        self.is_unassigned() && !self.has_parent()
    }

    /// 指派至目標；`temporary` 為 true 時狀態為保留
    pub fn assign(
        &mut self,
        target_id: String,
        target_type: TargetType,
        temporary: bool,
        now: DateTime<Utc>,
    ) {
        self.status = if temporary {
            SerialStatus::Reserved
        } else {
            SerialStatus::Assigned
        };
        self.assignment = Some(Assignment {
            target_id,
            target_type,
        });
        self.updated_at = now;
    }

    /// 取消指派
    pub fn unassign(&mut self, now: DateTime<Utc>) {
        self.status = SerialStatus::Unassigned;
        self.assignment = None;
        self.updated_at = now;
    }

    /// 設置父序號（覆蓋既有值）
    pub fn set_parent(&mut self, parent: SerialId, now: DateTime<Utc>) {
        self.parent_serial = Some(parent);
        self.updated_at = now;
    }

    /// 追加子序號（不去重）
    pub fn append_children(&mut self, children: &[SerialId], now: DateTime<Utc>) {
        self.child_serials.extend_from_slice(children);
        self.updated_at = now;
    }
}

/// 序號的原始序列化記錄（未經檢查）
#[derive(Debug, Deserialize)]
struct SerialRecord {
    id: SerialId,
    serial_number: String,
    buyer_part_number: String,
    status: SerialStatus,
    #[serde(default)]
    assignment: Option<Assignment>,
    #[serde(default)]
    parent_serial: Option<SerialId>,
    #[serde(default)]
    child_serials: Vec<SerialId>,
    #[serde(default)]
    custom_attributes: BTreeMap<String, String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SerialRecord> for Serial {
    type Error = SerialError;

    fn try_from(record: SerialRecord) -> Result<Self, Self::Error> {
        let unassigned = record.status == SerialStatus::Unassigned;
        if unassigned != record.assignment.is_none() {
            return Err(SerialError::InvalidRecord(format!(
                "序號 {} 狀態為 {}，但指派資訊{}",
                record.id,
                record.status,
                if unassigned { "存在" } else { "缺失" }
            )));
        }

        Ok(Self {
            id: record.id,
            serial_number: record.serial_number,
            buyer_part_number: record.buyer_part_number,
            status: record.status,
            assignment: record.assignment,
            parent_serial: record.parent_serial,
            child_serials: record.child_serials,
            custom_attributes: record.custom_attributes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}
