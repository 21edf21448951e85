//! Record tables and joins for the stockflow supply-chain pipeline.
//!
//! A [`Table`] is a named, row-major grid of [`Value`]s with a fixed column schema. Inputs can
//! be built from typed [`Record`] shapes and combined with [`join_all`], an inner equality join
//! that reproduces the cross-product on duplicate keys.

#![forbid(unsafe_code)]

mod error;
mod join;
mod record;
mod table;
mod value;

pub use crate::error::{TableError, TableResult};
pub use crate::join::{
    hash_join, inner_join_by, join_all, DatasetJoiner, JoinIndices, JoinOutcome,
};
pub use crate::record::{
    columns, InventoryRecord, OrderRecord, Record, RegionalInventoryRecord, ShipmentRecord,
};
pub use crate::table::Table;
pub use crate::value::Value;
