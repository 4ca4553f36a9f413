//! 階層查詢轉接器
//!
//! 從唯讀 ASN 階層推導可選買方料號與指派目標，並提供子序號候選過濾。
//! 轉接器本身不持有狀態，所有查詢都是純函數。

use serial_core::{Serial, TargetType};
use std::collections::BTreeSet;

use crate::{AsnHierarchy, AsnPackage};

/// 指派目標
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentTarget {
    pub id: String,
    pub target_type: TargetType,
    /// 目標所屬料號（包裝繼承上層批次或品項的料號）
    pub buyer_part_number: Option<String>,
}

impl AssignmentTarget {
    fn new(id: &str, target_type: TargetType, buyer_part_number: &str) -> Self {
        Self {
            id: id.to_string(),
            target_type,
            buyer_part_number: non_empty(buyer_part_number).map(str::to_string),
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// 階層查詢轉接器
#[derive(Debug, Clone, Copy)]
pub struct HierarchyAdapter<'a> {
    hierarchy: &'a AsnHierarchy,
}

impl<'a> HierarchyAdapter<'a> {
    /// 以唯讀階層建立轉接器
    pub fn new(hierarchy: &'a AsnHierarchy) -> Self {
        Self { hierarchy }
    }

    pub fn hierarchy(&self) -> &'a AsnHierarchy {
        self.hierarchy
    }

    /// 品項與批次上所有非空、去重後的買方料號
    pub fn buyer_part_numbers(&self) -> BTreeSet<String> {
        self.hierarchy
            .items
            .iter()
            .flat_map(|item| {
                std::iter::once(item.buyer_part_number.as_str())
                    .chain(item.lots.iter().map(|lot| lot.buyer_part_number.as_str()))
            })
            .filter_map(non_empty)
            .map(str::to_string)
            .collect()
    }

    /// 連結子序號時可選的料號（排除父序號本身的料號）
    pub fn selectable_child_part_numbers(&self, parent: &Serial) -> BTreeSet<String> {
        let mut part_numbers = self.buyer_part_numbers();
        part_numbers.remove(parent.buyer_part_number());
        part_numbers
    }

    /// 可被連結為子序號的候選
    ///
    /// 料號相符、不是父序號本身、尚無父序號且狀態為未指派。保留快照順序。
    pub fn eligible_children<'s>(
        &self,
        serials: &'s [Serial],
        parent: &Serial,
        buyer_part_number: &str,
    ) -> Vec<&'s Serial> {
        if buyer_part_number.is_empty() {
            return Vec::new();
        }

        let eligible: Vec<&Serial> = serials
            .iter()
            .filter(|s| {
                s.buyer_part_number() == buyer_part_number
                    && s.id() != parent.id()
                    && s.is_linkable_child()
            })
            .collect();

        tracing::debug!(
            "父序號 {} 料號 {} 可連結子序號: {}",
            parent.serial_number(),
            buyer_part_number,
            eligible.len()
        );

        eligible
    }

    /// 所有指派目標（品項 → 品項包裝 → 批次 → 批次包裝）
    pub fn assignment_targets(&self) -> Vec<AssignmentTarget> {
        let mut targets = Vec::new();

        for item in &self.hierarchy.items {
            let item_bpn = item.buyer_part_number.as_str();
            targets.push(AssignmentTarget::new(&item.id, TargetType::Item, item_bpn));
            push_packages(&mut targets, &item.packages, item_bpn);

            for lot in &item.lots {
                // 批次料號為空時沿用品項料號
                let lot_bpn = non_empty(&lot.buyer_part_number).unwrap_or(item_bpn);
                targets.push(AssignmentTarget::new(&lot.id, TargetType::Lot, lot_bpn));
                push_packages(&mut targets, &lot.packages, lot_bpn);
            }
        }

        targets
    }

    /// 指定料號下的指派目標
    pub fn targets_for_part_number(&self, buyer_part_number: &str) -> Vec<AssignmentTarget> {
        if buyer_part_number.is_empty() {
            return Vec::new();
        }
        self.assignment_targets()
            .into_iter()
            .filter(|t| t.buyer_part_number.as_deref() == Some(buyer_part_number))
            .collect()
    }

    /// 依 ID 查找指派目標
    pub fn find_target(&self, id: &str) -> Option<AssignmentTarget> {
        self.assignment_targets().into_iter().find(|t| t.id == id)
    }

    /// 檢查目標是否存在且類型相符
    pub fn has_target(&self, id: &str, target_type: TargetType) -> bool {
        self.find_target(id).is_some_and(|t| t.target_type == target_type)
    }
}

fn push_packages(targets: &mut Vec<AssignmentTarget>, packages: &[AsnPackage], bpn: &str) {
    targets.extend(
        packages
            .iter()
            .map(|p| AssignmentTarget::new(&p.id, TargetType::Package, bpn)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AsnItem, AsnLot};
    use chrono::Utc;
    use rstest::rstest;
    use serial_core::SerialId;
    use std::collections::BTreeMap;

    fn serial(id: &str, bpn: &str) -> Serial {
        Serial::new(
            SerialId::new(id),
            format!("SN-{}", id),
            bpn.to_string(),
            BTreeMap::new(),
            Utc::now(),
        )
    }

    fn sample_hierarchy() -> AsnHierarchy {
        AsnHierarchy::new("ASN-001")
            .with_item(
                AsnItem::new("ITEM-1", "A")
                    .with_lot(AsnLot::new("LOT-1", "A1").with_package(AsnPackage::new("PKG-1")))
                    .with_lot(AsnLot::new("LOT-2", ""))
                    .with_package(AsnPackage::new("PKG-0")),
            )
            .with_item(AsnItem::new("ITEM-2", "B").with_lot(AsnLot::new("LOT-3", "A1")))
            .with_item(AsnItem::new("ITEM-3", ""))
    }

    #[test]
    fn test_buyer_part_numbers_distinct_non_empty() {
        let hierarchy = AsnHierarchy::new("ASN")
            .with_item(AsnItem::new("I1", "A").with_lot(AsnLot::new("L1", "A1")));
        let adapter = HierarchyAdapter::new(&hierarchy);

        let expected: BTreeSet<String> = ["A", "A1"].iter().map(|s| s.to_string()).collect();
        assert_eq!(adapter.buyer_part_numbers(), expected);

        let hierarchy = sample_hierarchy();
        let adapter = HierarchyAdapter::new(&hierarchy);
        let expected: BTreeSet<String> = ["A", "A1", "B"].iter().map(|s| s.to_string()).collect();
        assert_eq!(adapter.buyer_part_numbers(), expected);
    }

    #[test]
    fn test_empty_hierarchy() {
        let hierarchy = AsnHierarchy::default();
        let adapter = HierarchyAdapter::new(&hierarchy);

        assert!(adapter.buyer_part_numbers().is_empty());
        assert!(adapter.assignment_targets().is_empty());
    }

    #[test]
    fn test_selectable_excludes_parent_part_number() {
        let hierarchy = sample_hierarchy();
        let adapter = HierarchyAdapter::new(&hierarchy);
        let parent = serial("p", "A");

        let selectable = adapter.selectable_child_part_numbers(&parent);

        assert!(!selectable.contains("A"));
        assert!(selectable.contains("A1"));
        assert!(selectable.contains("B"));
    }

    #[test]
    fn test_eligible_children_filter() {
        let hierarchy = sample_hierarchy();
        let adapter = HierarchyAdapter::new(&hierarchy);
        let now = Utc::now();

        let parent = serial("p", "A1");
        let free = serial("c1", "A1");
        let mut assigned = serial("c2", "A1");
        assigned.assign("LOT-1".to_string(), TargetType::Lot, false, now);
        let mut reserved = serial("c3", "A1");
        reserved.assign("LOT-1".to_string(), TargetType::Lot, true, now);
        let mut linked = serial("c4", "A1");
        linked.set_parent(SerialId::new("other"), now);
        let other_bpn = serial("c5", "B");
        let free_two = serial("c6", "A1");

        let serials = vec![
            parent.clone(),
            free,
            assigned,
            reserved,
            linked,
            other_bpn,
            free_two,
        ];

        let ids: Vec<&str> = adapter
            .eligible_children(&serials, &parent, "A1")
            .iter()
            .map(|s| s.id().as_str())
            .collect();

        assert_eq!(ids, vec!["c1", "c6"]);
    }

    #[test]
    fn test_eligible_children_requires_selection() {
        let hierarchy = sample_hierarchy();
        let adapter = HierarchyAdapter::new(&hierarchy);
        let parent = serial("p", "A");
        let serials = vec![serial("c1", "")];

        assert!(adapter.eligible_children(&serials, &parent, "").is_empty());
    }

    #[test]
    fn test_assignment_targets_order_and_inheritance() {
        let hierarchy = sample_hierarchy();
        let adapter = HierarchyAdapter::new(&hierarchy);

        let targets = adapter.assignment_targets();
        let ids: Vec<&str> = targets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["ITEM-1", "PKG-0", "LOT-1", "PKG-1", "LOT-2", "ITEM-2", "LOT-3", "ITEM-3"]
        );

        let pkg1 = adapter.find_target("PKG-1").unwrap();
        assert_eq!(pkg1.target_type, TargetType::Package);
        assert_eq!(pkg1.buyer_part_number.as_deref(), Some("A1"));

        // 空料號批次沿用品項料號
        let lot2 = adapter.find_target("LOT-2").unwrap();
        assert_eq!(lot2.buyer_part_number.as_deref(), Some("A"));

        let item3 = adapter.find_target("ITEM-3").unwrap();
        assert_eq!(item3.buyer_part_number, None);
    }

    #[test]
    fn test_targets_for_part_number() {
        let hierarchy = sample_hierarchy();
        let adapter = HierarchyAdapter::new(&hierarchy);

        let ids: Vec<String> = adapter
            .targets_for_part_number("A1")
            .into_iter()
            .map(|t| t.id)
            .collect();

        assert_eq!(ids, vec!["LOT-1", "PKG-1", "LOT-3"]);
        assert!(adapter.targets_for_part_number("").is_empty());
    }

    #[rstest]
    #[case("ITEM-1", TargetType::Item, true)]
    #[case("ITEM-1", TargetType::Lot, false)]
    #[case("LOT-3", TargetType::Lot, true)]
    #[case("PKG-0", TargetType::Package, true)]
    #[case("MISSING", TargetType::Item, false)]
    fn test_has_target(#[case] id: &str, #[case] target_type: TargetType, #[case] expected: bool) {
        let hierarchy = sample_hierarchy();
        let adapter = HierarchyAdapter::new(&hierarchy);

        assert_eq!(adapter.has_target(id, target_type), expected);
    }

    #[test]
    fn test_hierarchy_from_json() {
        let hierarchy: AsnHierarchy = serde_json::from_str(
            r#"{
                "asn_number": "ASN-9",
                "items": [{"id": "I1", "buyer_part_number": "X", "lots": [{"id": "L1"}]}]
            }"#,
        )
        .unwrap();
        let adapter = HierarchyAdapter::new(&hierarchy);

        assert_eq!(adapter.buyer_part_numbers().len(), 1);
        assert_eq!(adapter.assignment_targets().len(), 2);
    }
}
