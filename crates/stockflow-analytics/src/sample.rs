//! The fixed ten-product reference dataset.

use chrono::{Days, NaiveDate};
use stockflow_table::{InventoryRecord, OrderRecord, ShipmentRecord, Table, TableResult};

const WAREHOUSES: [&str; 10] = [
    "WH1", "WH2", "WH1", "WH3", "WH2", "WH1", "WH3", "WH2", "WH1", "WH3",
];
const STOCK: [i64; 10] = [150, 200, 120, 300, 180, 250, 270, 190, 160, 220];
const SHIPPED: [i64; 10] = [50, 70, 60, 120, 80, 90, 110, 60, 70, 100];
const DESTINATIONS: [&str; 10] = ["NY", "CA", "TX", "NY", "CA", "TX", "NY", "CA", "TX", "NY"];
const ORDERED: [i64; 10] = [40, 60, 50, 100, 70, 80, 90, 50, 60, 95];

pub fn inventory() -> Vec<InventoryRecord> {
    (0..10)
        .map(|i| InventoryRecord {
            product_id: i as i64 + 1,
            warehouse: WAREHOUSES[i].to_string(),
            stock: STOCK[i],
        })
        .collect()
}

pub fn shipments() -> Vec<ShipmentRecord> {
    (0..10)
        .map(|i| ShipmentRecord {
            shipment_id: 101 + i as i64,
            product_id: i as i64 + 1,
            quantity_shipped: SHIPPED[i],
            destination: DESTINATIONS[i].to_string(),
        })
        .collect()
}

/// One order per product, dated one day apart starting 2025-01-01.
pub fn orders() -> Vec<OrderRecord> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
    (0..10)
        .map(|i| OrderRecord {
            order_id: 1001 + i as i64,
            product_id: i as i64 + 1,
            quantity_ordered: ORDERED[i],
            order_date: start
                .checked_add_days(Days::new(i as u64))
                .unwrap_or(start),
        })
        .collect()
}

/// Inventory, shipments and orders as tables, in join order.
pub fn reference_tables() -> TableResult<Vec<Table>> {
    Ok(vec![
        Table::from_records(inventory())?,
        Table::from_records(shipments())?,
        Table::from_records(orders())?,
    ])
}
