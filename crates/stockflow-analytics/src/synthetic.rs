//! Seeded pseudo-random supplier/region dataset.
//!
//! The same [`SyntheticConfig`] always produces the same tables.

use crate::error::{AnalyticsError, AnalyticsResult};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stockflow_table::{OrderRecord, RegionalInventoryRecord, ShipmentRecord, Table};

const REGION_NAMES: [&str; 5] = ["North", "South", "East", "West", "Central"];
const DESTINATIONS: [&str; 5] = ["NY", "CA", "TX", "WA", "FL"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub products: usize,
    pub regions: usize,
    pub suppliers: usize,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            products: 50,
            regions: 4,
            suppliers: 5,
        }
    }
}

impl SyntheticConfig {
    fn validate(&self) -> AnalyticsResult<()> {
        for (name, value) in [
            ("products", self.products),
            ("regions", self.regions),
            ("suppliers", self.suppliers),
        ] {
            if value == 0 {
                return Err(AnalyticsError::InvalidConfig(format!(
                    "synthetic dataset needs at least one of {name}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntheticDataset {
    pub inventory: Table,
    pub shipments: Table,
    pub orders: Table,
}

impl SyntheticDataset {
    /// The tables in join order.
    pub fn into_tables(self) -> Vec<Table> {
        vec![self.inventory, self.shipments, self.orders]
    }
}

fn region_name(idx: usize) -> String {
    REGION_NAMES
        .get(idx)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Region{}", idx + 1))
}

pub fn generate(config: &SyntheticConfig) -> AnalyticsResult<SyntheticDataset> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();

    let mut inventory = Vec::with_capacity(config.products);
    let mut shipments = Vec::with_capacity(config.products);
    let mut orders = Vec::with_capacity(config.products);

    for i in 0..config.products {
        let product_id = i as i64 + 1;
        inventory.push(RegionalInventoryRecord {
            product_id,
            supplier: format!("SUP-{:02}", rng.random_range(0..config.suppliers) + 1),
            region: region_name(rng.random_range(0..config.regions)),
            stock: rng.random_range(100..=500),
        });
        shipments.push(ShipmentRecord {
            shipment_id: 101 + i as i64,
            product_id,
            quantity_shipped: rng.random_range(20..=200),
            destination: DESTINATIONS[rng.random_range(0..DESTINATIONS.len())].to_string(),
        });
        let offset = rng.random_range(0..90u64);
        orders.push(OrderRecord {
            order_id: 1001 + i as i64,
            product_id,
            quantity_ordered: rng.random_range(10..=250),
            order_date: start.checked_add_days(Days::new(offset)).unwrap_or(start),
        });
    }

    log::debug!(
        "generated synthetic dataset: seed={} products={}",
        config.seed,
        config.products
    );

    Ok(SyntheticDataset {
        inventory: Table::from_records(inventory)?,
        shipments: Table::from_records(shipments)?,
        orders: Table::from_records(orders)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockflow_table::columns;

    #[test]
    fn same_seed_same_tables() {
        let config = SyntheticConfig {
            products: 20,
            ..SyntheticConfig::default()
        };
        assert_eq!(generate(&config).unwrap(), generate(&config).unwrap());
    }

    #[test]
    fn values_stay_in_range() {
        let data = generate(&SyntheticConfig::default()).unwrap();
        assert_eq!(data.inventory.row_count(), 50);

        let stock = data.inventory.require_column(columns::STOCK).unwrap();
        assert!(data
            .inventory
            .column_values(stock)
            .all(|v| (100..=500).contains(&v.as_i64().unwrap())));

        let region = data.inventory.require_column(columns::REGION).unwrap();
        assert!(data
            .inventory
            .column_values(region)
            .all(|v| REGION_NAMES[..4].contains(&v.as_str().unwrap())));
    }

    #[test]
    fn zero_products_is_rejected() {
        let config = SyntheticConfig {
            products: 0,
            ..SyntheticConfig::default()
        };
        assert!(matches!(
            generate(&config),
            Err(AnalyticsError::InvalidConfig(_))
        ));
    }
}
