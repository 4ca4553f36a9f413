//! # Serial Store
//!
//! 序號儲存與變更引擎：建立、批量建立、匯入、指派與父子連結

pub mod batch;
pub mod diff;
pub mod handle;
pub mod linking;
pub mod mutation;
pub mod request;
pub mod store;

use std::sync::Arc;

// Re-export 主要類型
pub use diff::SnapshotDiff;
pub use handle::{SerialSession, StoreHandle};
pub use request::{AssignRequest, BulkCreate, CreateSerial, ImportBatch, ImportEntry};
pub use store::SerialStore;

/// 序號集合的唯讀快照
pub type Snapshot = Arc<Vec<serial_core::Serial>>;
