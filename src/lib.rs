//! # Serials
//!
//! ASN 出貨階層的序號追蹤：序號儲存、階層查詢轉接器與共享把手

pub use serial_core::{
    Assignment, Result, Serial, SerialConfig, SerialError, SerialId, SerialNumberPolicy,
    SerialStatus, TargetType,
};
pub use serial_hierarchy::{
    AsnHierarchy, AsnItem, AsnLot, AsnPackage, AssignmentTarget, HierarchyAdapter,
};
pub use serial_store::batch::{parse_csv, parse_csv_str};
pub use serial_store::{
    AssignRequest, BulkCreate, CreateSerial, ImportBatch, ImportEntry, SerialSession, SerialStore,
    Snapshot, SnapshotDiff, StoreHandle,
};

/// 子序號選擇結果
#[derive(Debug, Clone)]
pub struct ChildSelection {
    /// 可選料號（已排除父序號料號）
    pub part_numbers: Vec<String>,

    /// 所選料號下的候選子序號 ID
    pub candidates: Vec<SerialId>,
}

/// 為父序號準備子序號選擇：可選料號與候選清單
///
/// 父序號不存在時回傳 `SerialNotFound`；`buyer_part_number` 為空時候選清單為空。
pub fn prepare_child_selection(
    store: &StoreHandle,
    hierarchy: &HierarchyAdapter<'_>,
    parent_id: &SerialId,
    buyer_part_number: &str,
) -> Result<ChildSelection> {
    let snapshot = store.snapshot();
    let parent = snapshot
        .iter()
        .find(|s| s.id() == parent_id)
        .ok_or_else(|| SerialError::SerialNotFound(parent_id.clone()))?;

    let part_numbers: Vec<String> = hierarchy
        .selectable_child_part_numbers(parent)
        .into_iter()
        .collect();

    // 所選料號不在可選清單內時，不提供候選
    let candidates = if part_numbers.iter().any(|bpn| bpn == buyer_part_number) {
        hierarchy
            .eligible_children(&snapshot, parent, buyer_part_number)
            .into_iter()
            .map(|s| s.id().clone())
            .collect()
    } else {
        Vec::new()
    };

    tracing::debug!(
        "父序號 {} 可選料號 {} 個，候選 {} 筆",
        parent.serial_number(),
        part_numbers.len(),
        candidates.len()
    );

    Ok(ChildSelection {
        part_numbers,
        candidates,
    })
}
