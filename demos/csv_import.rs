//! CSV 批次匯入示例

use serials::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const BATCH: &str = "\
serialNumber,color,firmware
SN-A-001,red,1.2.0
SN-A-002,blue,1.2.0
,green,1.1.9
SN-A-003,,1.2.1
";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "serial_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== CSV 批次匯入示例 ===\n");

    let config = SerialConfig::new().with_serial_number_policy(SerialNumberPolicy::Unique);
    let mut store = SerialStore::with_config(config)?;

    let batch = parse_csv_str(BATCH, "CASE-200-A")?;
    let before = store.snapshot();
    let after = store.try_import_from_batch(batch)?;

    let diff = SnapshotDiff::between(&before, &after);
    println!("新增 {} 筆:", diff.added.len());
    for serial in after.iter() {
        println!("  - {} {:?}", serial.serial_number(), serial.custom_attributes());
    }

    // 再匯入相同批次會因唯一性政策被拒絕
    let again = parse_csv_str(BATCH, "CASE-200-A")?;
    match store.try_import_from_batch(again) {
        Ok(_) => println!("\n重複匯入成功"),
        Err(err) => println!("\n重複匯入被拒絕: {}", err),
    }

    Ok(())
}
