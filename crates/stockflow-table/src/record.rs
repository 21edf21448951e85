//! Statically typed row shapes for the supply-chain input tables.
//!
//! Callers describe their inputs with these structs and convert them with
//! [`crate::Table::from_records`]; the pipeline itself works on column names.

use crate::value::Value;
use chrono::NaiveDate;

/// A typed row that knows its table name and column layout.
pub trait Record {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Values in `COLUMNS` order.
    fn into_row(self) -> Vec<Value>;
}

pub mod columns {
    pub const PRODUCT_ID: &str = "ProductID";
    pub const WAREHOUSE: &str = "Warehouse";
    pub const STOCK: &str = "Stock";
    pub const SUPPLIER: &str = "Supplier";
    pub const REGION: &str = "Region";
    pub const SHIPMENT_ID: &str = "ShipmentID";
    pub const QUANTITY_SHIPPED: &str = "QuantityShipped";
    pub const DESTINATION: &str = "Destination";
    pub const ORDER_ID: &str = "OrderID";
    pub const QUANTITY_ORDERED: &str = "QuantityOrdered";
    pub const ORDER_DATE: &str = "OrderDate";
    pub const STOCK_AFTER_SHIPMENT: &str = "StockAfterShipment";
    pub const STOCK_VS_ORDER: &str = "StockVsOrder";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryRecord {
    pub product_id: i64,
    pub warehouse: String,
    pub stock: i64,
}

impl Record for InventoryRecord {
    const TABLE: &'static str = "Inventory";
    const COLUMNS: &'static [&'static str] =
        &[columns::PRODUCT_ID, columns::WAREHOUSE, columns::STOCK];

    fn into_row(self) -> Vec<Value> {
        vec![self.product_id.into(), self.warehouse.into(), self.stock.into()]
    }
}

/// Inventory row of the synthetic dataset, partitioned by supplier and region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionalInventoryRecord {
    pub product_id: i64,
    pub supplier: String,
    pub region: String,
    pub stock: i64,
}

impl Record for RegionalInventoryRecord {
    const TABLE: &'static str = "Inventory";
    const COLUMNS: &'static [&'static str] = &[
        columns::PRODUCT_ID,
        columns::SUPPLIER,
        columns::REGION,
        columns::STOCK,
    ];

    fn into_row(self) -> Vec<Value> {
        vec![
            self.product_id.into(),
            self.supplier.into(),
            self.region.into(),
            self.stock.into(),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShipmentRecord {
    pub shipment_id: i64,
    pub product_id: i64,
    pub quantity_shipped: i64,
    pub destination: String,
}

impl Record for ShipmentRecord {
    const TABLE: &'static str = "Shipments";
    const COLUMNS: &'static [&'static str] = &[
        columns::SHIPMENT_ID,
        columns::PRODUCT_ID,
        columns::QUANTITY_SHIPPED,
        columns::DESTINATION,
    ];

    fn into_row(self) -> Vec<Value> {
        vec![
            self.shipment_id.into(),
            self.product_id.into(),
            self.quantity_shipped.into(),
            self.destination.into(),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderRecord {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity_ordered: i64,
    pub order_date: NaiveDate,
}

impl Record for OrderRecord {
    const TABLE: &'static str = "Orders";
    const COLUMNS: &'static [&'static str] = &[
        columns::ORDER_ID,
        columns::PRODUCT_ID,
        columns::QUANTITY_ORDERED,
        columns::ORDER_DATE,
    ];

    fn into_row(self) -> Vec<Value> {
        vec![
            self.order_id.into(),
            self.product_id.into(),
            self.quantity_ordered.into(),
            self.order_date.into(),
        ]
    }
}
