//! The join → derive → filter → group → summarize pipeline.

use crate::aggregate::AggSpec;
use crate::derive::DerivedColumn;
use crate::engine::{Aggregates, AggregationEngine, TotalsSpec};
use crate::error::AnalyticsResult;
use crate::filter::Predicate;
use crate::summary::Totals;
use stockflow_table::{columns, DatasetJoiner, Table};

/// Column names used by one pipeline variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    pub join_key: String,
    pub group_key: String,
    pub stock: String,
    pub quantity_shipped: String,
    pub quantity_ordered: String,
    pub stock_after_shipment: String,
    pub stock_vs_order: String,
}

impl Default for PipelineConfig {
    /// Inventory grouped by warehouse.
    fn default() -> Self {
        Self {
            join_key: columns::PRODUCT_ID.to_string(),
            group_key: columns::WAREHOUSE.to_string(),
            stock: columns::STOCK.to_string(),
            quantity_shipped: columns::QUANTITY_SHIPPED.to_string(),
            quantity_ordered: columns::QUANTITY_ORDERED.to_string(),
            stock_after_shipment: columns::STOCK_AFTER_SHIPMENT.to_string(),
            stock_vs_order: columns::STOCK_VS_ORDER.to_string(),
        }
    }
}

impl PipelineConfig {
    /// The synthetic supplier/region variant, grouped by region.
    pub fn regional() -> Self {
        Self {
            group_key: columns::REGION.to_string(),
            ..Self::default()
        }
    }

    /// `StockAfterShipment = Stock - QuantityShipped`, then
    /// `StockVsOrder = StockAfterShipment - QuantityOrdered`.
    pub fn derived_columns(&self) -> Vec<DerivedColumn> {
        vec![
            DerivedColumn::difference(
                &self.stock_after_shipment,
                &self.stock,
                &self.quantity_shipped,
            ),
            DerivedColumn::difference(
                &self.stock_vs_order,
                &self.stock_after_shipment,
                &self.quantity_ordered,
            ),
        ]
    }

    pub fn deficit_predicate(&self) -> Predicate {
        Predicate::lt(&self.stock_vs_order, 0)
    }

    pub fn aggregations(&self) -> Vec<AggSpec> {
        vec![
            AggSpec::sum(&self.stock),
            AggSpec::sum(&self.quantity_shipped),
            AggSpec::sum(&self.quantity_ordered),
        ]
    }

    pub fn engine(&self) -> AggregationEngine {
        AggregationEngine {
            derived: self.derived_columns(),
            filter: self.deficit_predicate(),
            group_key: self.group_key.clone(),
            aggregations: self.aggregations(),
            totals: TotalsSpec {
                key: self.join_key.clone(),
                ordered: self.quantity_ordered.clone(),
                shipped: self.quantity_shipped.clone(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Joined table including the derived columns.
    pub joined: Table,
    /// Rows lost to inner-join semantics.
    pub dropped_rows: usize,
    /// Null cells per column of the joined table, before derivation.
    pub null_counts: Vec<(String, usize)>,
    pub deficits: Table,
    pub summary: Table,
    pub totals: Totals,
}

impl PipelineOutput {
    /// The deficit rows reduced to the join key and the deficit column.
    pub fn deficit_view(&self, config: &PipelineConfig) -> AnalyticsResult<Table> {
        Ok(self
            .deficits
            .select(&[config.join_key.as_str(), config.stock_vs_order.as_str()])?)
    }
}

#[derive(Clone, Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    joiner: DatasetJoiner,
    engine: AggregationEngine,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let joiner = DatasetJoiner::new(config.join_key.clone());
        let engine = config.engine();
        Self {
            config,
            joiner,
            engine,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, tables: &[Table]) -> AnalyticsResult<PipelineOutput> {
        let joined = self.joiner.join(tables)?;
        let null_counts = joined.table.null_counts();
        let Aggregates {
            derived,
            deficits,
            summary,
            totals,
        } = self.engine.run(&joined.table)?;

        log::info!(
            "pipeline: {} joined rows, {} dropped, {} deficit(s), {} group(s)",
            derived.row_count(),
            joined.dropped_rows,
            deficits.row_count(),
            summary.row_count()
        );

        Ok(PipelineOutput {
            joined: derived,
            dropped_rows: joined.dropped_rows,
            null_counts,
            deficits,
            summary,
            totals,
        })
    }
}
