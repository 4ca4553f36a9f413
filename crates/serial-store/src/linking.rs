//! 父子連結結構檢查

use serial_core::{Result, Serial, SerialError, SerialId};
use std::collections::HashSet;

/// 依 ID 查找序號
pub trait SerialLookup {
    fn lookup(&self, id: &SerialId) -> Option<&Serial>;
}

/// 沿父序號向上追溯祖先（由近至遠）
///
/// 遇到重複節點即停止，因此寬鬆連結造成的循環不會無限迴圈。
pub fn ancestors<L: SerialLookup + ?Sized>(lookup: &L, id: &SerialId) -> Vec<SerialId> {
    let mut chain = Vec::new();
    let mut visited: HashSet<&SerialId> = HashSet::new();
    visited.insert(id);

    let mut current = lookup.lookup(id).and_then(Serial::parent_serial);
    while let Some(parent_id) = current {
        if !visited.insert(parent_id) {
            break;
        }
        chain.push(parent_id.clone());
        current = lookup.lookup(parent_id).and_then(Serial::parent_serial);
    }

    chain
}

/// 檢查連結是否會破壞結構（循環、重複子序號、子序號已有其他父序號）
pub fn validate_link<L: SerialLookup + ?Sized>(
    lookup: &L,
    parent_id: &SerialId,
    child_ids: &[SerialId],
) -> Result<()> {
    if child_ids.is_empty() {
        return Err(SerialError::EmptySelection);
    }

    let parent = lookup
        .lookup(parent_id)
        .ok_or_else(|| SerialError::SerialNotFound(parent_id.clone()))?;

    let parent_ancestors: HashSet<SerialId> = ancestors(lookup, parent_id).into_iter().collect();
    let existing_children: HashSet<&SerialId> = parent.child_serials().iter().collect();
    let mut requested: HashSet<&SerialId> = HashSet::new();

    for child_id in child_ids {
        let child = lookup
            .lookup(child_id)
            .ok_or_else(|| SerialError::SerialNotFound(child_id.clone()))?;

        if child_id == parent_id || parent_ancestors.contains(child_id) {
            return Err(SerialError::CycleDetected {
                parent: parent_id.clone(),
                child: child_id.clone(),
            });
        }

        if !requested.insert(child_id) || existing_children.contains(child_id) {
            return Err(SerialError::DuplicateChild {
                parent: parent_id.clone(),
                child: child_id.clone(),
            });
        }

        match child.parent_serial() {
            Some(existing) if existing == parent_id => {
                return Err(SerialError::DuplicateChild {
                    parent: parent_id.clone(),
                    child: child_id.clone(),
                });
            }
            Some(existing) => {
                return Err(SerialError::ChildAlreadyLinked {
                    child: child_id.clone(),
                    existing_parent: existing.clone(),
                });
            }
            None => {}
        }
    }

    Ok(())
}
