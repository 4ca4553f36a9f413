//! ASN 階層模型（外部提供，唯讀）

use serde::{Deserialize, Serialize};

/// 包裝
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnPackage {
    pub id: String,
}

impl AsnPackage {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// 批次
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnLot {
    pub id: String,

    /// 買方料號（可為空）
    #[serde(default)]
    pub buyer_part_number: String,

    #[serde(default)]
    pub packages: Vec<AsnPackage>,
}

impl AsnLot {
    pub fn new(id: impl Into<String>, buyer_part_number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            buyer_part_number: buyer_part_number.into(),
            packages: Vec::new(),
        }
    }

    /// 建構器模式：加入包裝
    pub fn with_package(mut self, package: AsnPackage) -> Self {
        self.packages.push(package);
        self
    }
}

/// ASN 品項
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnItem {
    pub id: String,

    #[serde(default)]
    pub buyer_part_number: String,

    #[serde(default)]
    pub lots: Vec<AsnLot>,

    /// 直接掛在品項下的包裝
    #[serde(default)]
    pub packages: Vec<AsnPackage>,
}

impl AsnItem {
    pub fn new(id: impl Into<String>, buyer_part_number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            buyer_part_number: buyer_part_number.into(),
            lots: Vec::new(),
            packages: Vec::new(),
        }
    }

    /// 建構器模式：加入批次
    pub fn with_lot(mut self, lot: AsnLot) -> Self {
        self.lots.push(lot);
        self
    }

    /// 建構器模式：加入包裝
    pub fn with_package(mut self, package: AsnPackage) -> Self {
        self.packages.push(package);
        self
    }
}

/// ASN 階層
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnHierarchy {
    #[serde(default)]
    pub asn_number: String,

    #[serde(default)]
    pub items: Vec<AsnItem>,
}

impl AsnHierarchy {
    pub fn new(asn_number: impl Into<String>) -> Self {
        Self {
            asn_number: asn_number.into(),
            items: Vec::new(),
        }
    }

    /// 建構器模式：加入品項
    pub fn with_item(mut self, item: AsnItem) -> Self {
        self.items.push(item);
        self
    }
}
