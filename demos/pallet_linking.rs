//! 棧板與箱序號連結示例

use serials::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "serial_store=debug,serials=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== 棧板序號連結示例 ===\n");

    let hierarchy = AsnHierarchy::new("ASN-2025-001")
        .with_item(AsnItem::new("ITEM-PALLET", "PAL-100"))
        .with_item(
            AsnItem::new("ITEM-CASE", "CASE-200").with_lot(
                AsnLot::new("LOT-7", "CASE-200-A").with_package(AsnPackage::new("PKG-7-1")),
            ),
        );
    let adapter = HierarchyAdapter::new(&hierarchy);

    let mut session = SerialSession::new(SerialConfig::new());
    let store = session.begin()?;

    let pallet_request = CreateSerial::new("PAL-0001", "PAL-100").with_attribute("dock", "D3");
    let pallet = store.create(pallet_request)[0].id().clone();
    store.bulk_create(BulkCreate::new("CS", 1, 6, "CASE-200-A"));

    let selection = prepare_child_selection(&store, &adapter, &pallet, "CASE-200-A")?;
    println!("可選料號: {:?}", selection.part_numbers);
    println!("候選箱序號: {} 筆", selection.candidates.len());

    store.try_link_children(&pallet, &selection.candidates)?;
    store.try_assign(
        &AssignRequest::new(vec![pallet.clone()], "ITEM-PALLET", TargetType::Item),
        &adapter,
    )?;

    println!("\n序號清單:");
    for serial in store.snapshot().iter() {
        println!(
            "  - {} [{}] 料號 {} 指派 {:?} 父序號 {:?} 子序號 {}",
            serial.serial_number(),
            serial.status(),
            serial.buyer_part_number(),
            serial.assigned_to(),
            serial.parent_serial().map(SerialId::as_str),
            serial.child_serials().len()
        );
    }

    // 反向連結會形成循環，檢查模式會拒絕
    let case_id = selection.candidates[0].clone();
    if let Err(err) = store.try_link_children(&case_id, &[pallet]) {
        println!("\n拒絕連結: {}", err);
    }

    session.end();
    Ok(())
}
