//! # Serial Hierarchy
//!
//! ASN 階層查詢轉接器：只讀取外部階層，推導料號與指派目標

pub mod adapter;
pub mod asn;

// Re-export 主要類型
pub use adapter::{AssignmentTarget, HierarchyAdapter};
pub use asn::{AsnHierarchy, AsnItem, AsnLot, AsnPackage};
