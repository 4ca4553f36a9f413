//! 純函數變更：由（目前快照, 參數）產生新快照
//!
//! 找不到的 ID 一律視為「不變」，不會產生錯誤。

use chrono::{DateTime, Utc};
use serial_core::{Serial, SerialId};
use std::collections::HashSet;

use crate::AssignRequest;

/// 變更結果
#[derive(Debug, Clone)]
pub struct Mutation {
    /// 新的序號集合
    pub serials: Vec<Serial>,

    /// 實際被更新的序號數量
    pub touched: usize,
}

/// 套用指派／取消指派
pub fn apply_assign(serials: &[Serial], request: &AssignRequest, now: DateTime<Utc>) -> Mutation {
    let ids: HashSet<&SerialId> = request.serial_ids.iter().collect();
    let mut touched = 0;

    let serials = serials
        .iter()
        .map(|serial| {
            if !ids.contains(serial.id()) {
                return serial.clone();
            }
            touched += 1;

            let mut updated = serial.clone();
            if request.is_unassign() {
                updated.unassign(now);
            } else {
                updated.assign(
                    request.target_id.clone(),
                    request.target_type,
                    request.temporary,
                    now,
                );
            }
            updated
        })
        .collect();

    Mutation { serials, touched }
}

/// 套用父子連結
///
/// 父序號的子清單直接追加（不去重）；子序號的父序號被覆蓋。
/// 若父序號 ID 同時出現在子清單中，該筆記錄只以父序號身分更新。
pub fn apply_link(
    serials: &[Serial],
    parent_id: &SerialId,
    child_ids: &[SerialId],
    now: DateTime<Utc>,
) -> Mutation {
    let children: HashSet<&SerialId> = child_ids.iter().collect();
    let mut touched = 0;

    let serials = serials
        .iter()
        .map(|serial| {
            if serial.id() == parent_id {
                touched += 1;
                let mut parent = serial.clone();
                parent.append_children(child_ids, now);
                parent
            } else if children.contains(serial.id()) {
                touched += 1;
                let mut child = serial.clone();
                child.set_parent(parent_id.clone(), now);
                child
            } else {
                serial.clone()
            }
        })
        .collect();

    Mutation { serials, touched }
}
