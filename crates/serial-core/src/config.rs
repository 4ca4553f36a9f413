//! 序號儲存配置模型

use serde::{Deserialize, Serialize};

use crate::{Result, SerialError};

/// 序號編碼唯一性政策
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SerialNumberPolicy {
    /// 不限制（預設；唯一性由呼叫端負責）
    #[default]
    Unconstrained,
    /// 檢查式建立操作拒絕重複編碼
    Unique,
}

/// 序號儲存配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// 批量建立時流水號補零寬度
    pub bulk_number_width: usize,

    /// 序號編碼唯一性政策
    pub serial_number_policy: SerialNumberPolicy,

    /// 單次批量建立上限（僅檢查式操作使用）
    pub max_bulk_count: u32,

    /// 建立/批量建立的 ID 前綴
    pub id_prefix: String,

    /// 批次匯入的 ID 前綴
    pub import_id_prefix: String,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            bulk_number_width: 6,
            serial_number_policy: SerialNumberPolicy::Unconstrained,
            max_bulk_count: 100_000,
            id_prefix: "serial".to_string(),
            import_id_prefix: "serial-csv".to_string(),
        }
    }
}

impl SerialConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 字串載入並驗證
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SerialConfig =
            serde_json::from_str(json).map_err(|e| SerialError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置補零寬度
    pub fn with_bulk_number_width(mut self, width: usize) -> Self {
        self.bulk_number_width = width;
        self
    }

    /// 建構器模式：設置唯一性政策
    pub fn with_serial_number_policy(mut self, policy: SerialNumberPolicy) -> Self {
        self.serial_number_policy = policy;
        self
    }

    /// 建構器模式：設置批量上限
    pub fn with_max_bulk_count(mut self, count: u32) -> Self {
        self.max_bulk_count = count;
        self
    }

    /// 建構器模式：設置 ID 前綴
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// 建構器模式：設置匯入 ID 前綴
    pub fn with_import_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.import_id_prefix = prefix.into();
        self
    }

    /// 檢查配置是否有效
    pub fn validate(&self) -> Result<()> {
        if self.bulk_number_width == 0 {
            return Err(SerialError::InvalidConfig(
                "bulk_number_width 必須至少為 1".to_string(),
            ));
        }
        if self.id_prefix.is_empty() || self.import_id_prefix.is_empty() {
            return Err(SerialError::InvalidConfig("ID 前綴不可為空".to_string()));
        }
        Ok(())
    }

    /// 是否要求序號編碼唯一
    pub fn requires_unique_serial_numbers(&self) -> bool {
        self.serial_number_policy == SerialNumberPolicy::Unique
    }

    /// 依配置寬度格式化批量流水號
    pub fn format_bulk_number(&self, prefix: &str, number: u64) -> String {
        format!("{}{:0width$}", prefix, number, width = self.bulk_number_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = SerialConfig::new();

        assert_eq!(config.bulk_number_width, 6);
        assert_eq!(config.serial_number_policy, SerialNumberPolicy::Unconstrained);
        assert!(!config.requires_unique_serial_numbers());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SerialConfig::new()
            .with_bulk_number_width(8)
            .with_serial_number_policy(SerialNumberPolicy::Unique)
            .with_max_bulk_count(500)
            .with_id_prefix("sn");

        assert_eq!(config.bulk_number_width, 8);
        assert!(config.requires_unique_serial_numbers());
        assert_eq!(config.max_bulk_count, 500);
        assert_eq!(config.id_prefix, "sn");
        assert_eq!(config.import_id_prefix, "serial-csv");
    }

    #[rstest]
    #[case("SN", 1, "SN000001")]
    #[case("SN", 42, "SN000042")]
    #[case("PAL-", 999_999, "PAL-999999")]
    // 超過寬度時不截斷
    #[case("SN", 1_234_567, "SN1234567")]
    #[case("", 7, "000007")]
    fn test_format_bulk_number(#[case] prefix: &str, #[case] number: u64, #[case] expected: &str) {
        assert_eq!(SerialConfig::new().format_bulk_number(prefix, number), expected);
    }

    #[test]
    fn test_from_json_partial() {
        let config = SerialConfig::from_json_str(r#"{"serial_number_policy": "Unique"}"#).unwrap();

        assert!(config.requires_unique_serial_numbers());
        assert_eq!(config.bulk_number_width, 6);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let err = SerialConfig::from_json_str(r#"{"bulk_number_width": 0}"#).unwrap_err();
        assert!(matches!(err, SerialError::InvalidConfig(_)));

        let err = SerialConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, SerialError::InvalidConfig(_)));
    }
}
