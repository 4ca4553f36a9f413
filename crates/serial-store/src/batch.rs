//! CSV 批次解析
//!
//! 第一列必須為標題列。序號欄（`serialNumber`，大小寫不拘，亦接受
//! `serial_number` / `serial number`）作為序號編碼，其餘非空欄位成為自訂屬性。

use serial_core::{Result, SerialError};
use std::collections::BTreeMap;
use std::io::Read;

use crate::{ImportBatch, ImportEntry};

fn is_serial_number_header(header: &str) -> bool {
    let normalized: String = header
        .chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .flat_map(char::to_lowercase)
        .collect();
    normalized == "serialnumber"
}

/// 解析 CSV 為匯入批次
pub fn parse_csv<R: Read>(reader: R, buyer_part_number: &str) -> Result<ImportBatch> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| SerialError::InvalidBatch(e.to_string()))?
        .clone();

    let serial_column = headers
        .iter()
        .position(is_serial_number_header)
        .ok_or_else(|| SerialError::InvalidBatch("缺少序號欄位 serialNumber".to_string()))?;

    let mut entries = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| SerialError::InvalidBatch(e.to_string()))?;

        let serial_number = record.get(serial_column).unwrap_or_default();
        if serial_number.is_empty() {
            // 標題列為第 1 列
            tracing::warn!("略過第 {} 列：序號為空", row + 2);
            continue;
        }

        let custom_attributes: BTreeMap<String, String> = headers
            .iter()
            .enumerate()
            .filter(|(column, header)| *column != serial_column && !header.is_empty())
            .filter_map(|(column, header)| {
                record
                    .get(column)
                    .filter(|value| !value.is_empty())
                    .map(|value| (header.to_string(), value.to_string()))
            })
            .collect();

        entries.push(ImportEntry {
            serial_number: serial_number.to_string(),
            custom_attributes,
        });
    }

    tracing::debug!("CSV 解析完成：{} 筆", entries.len());
    Ok(ImportBatch::new(entries, buyer_part_number))
}

/// 解析 CSV 字串
pub fn parse_csv_str(content: &str, buyer_part_number: &str) -> Result<ImportBatch> {
    parse_csv(content.as_bytes(), buyer_part_number)
}
