//! # Serial Core
//!
//! 序號核心資料模型與類型定義

pub mod config;
pub mod id;
pub mod serial;

// Re-export 主要類型
pub use config::{SerialConfig, SerialNumberPolicy};
pub use id::{SerialId, SerialIdGenerator};
pub use serial::{Assignment, Serial, SerialStatus, TargetType};

/// 序號錯誤類型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerialError {
    #[error("缺少序號儲存上下文: {0}")]
    MissingContext(String),

    #[error("找不到序號: {0}")]
    SerialNotFound(SerialId),

    #[error("連結會形成循環: 父序號 {parent} 與子序號 {child}")]
    CycleDetected { parent: SerialId, child: SerialId },

    #[error("子序號重複連結: 父序號 {parent} 已包含 {child}")]
    DuplicateChild { parent: SerialId, child: SerialId },

    #[error("子序號 {child} 已連結至父序號 {existing_parent}")]
    ChildAlreadyLinked {
        child: SerialId,
        existing_parent: SerialId,
    },

    #[error("序號編碼重複: {0}")]
    DuplicateSerialNumber(String),

    #[error("找不到指派目標: {target_id} ({target_type})")]
    UnknownTarget {
        target_id: String,
        target_type: TargetType,
    },

    #[error("未選擇任何子序號")]
    EmptySelection,

    #[error("無效的請求: {0}")]
    InvalidRequest(String),

    #[error("無效的匯入批次: {0}")]
    InvalidBatch(String),

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("無效的序號記錄: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, SerialError>;
