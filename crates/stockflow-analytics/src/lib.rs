//! Derived columns, deficit filtering and grouped summaries over joined supply-chain tables.
//!
//! [`Pipeline`] wires the pieces together: it joins the input tables with a
//! [`stockflow_table::DatasetJoiner`], then hands the joined table to an [`AggregationEngine`]
//! which derives `StockAfterShipment`/`StockVsOrder`, selects the deficit rows, groups by the
//! configured key and computes the process-wide [`Totals`]. Charts are described as
//! [`ChartRequest`]s and passed to a caller-provided [`ChartSink`].

#![forbid(unsafe_code)]

mod aggregate;
mod charts;
mod derive;
mod engine;
mod error;
mod filter;
mod pipeline;
pub mod sample;
mod summary;
pub mod synthetic;

pub use crate::aggregate::{group_by, AggSpec, AggregationKind};
pub use crate::charts::{emit_charts, ChartError, ChartKind, ChartRequest, ChartSink};
pub use crate::derive::{derive_columns, BinaryOp, DerivedColumn};
pub use crate::engine::{Aggregates, AggregationEngine, TotalsSpec};
pub use crate::error::{AnalyticsError, AnalyticsResult};
pub use crate::filter::{filter_rows, Comparison, Predicate};
pub use crate::pipeline::{Pipeline, PipelineConfig, PipelineOutput};
pub use crate::summary::{column_sum, distinct_count, summarize, Totals};
