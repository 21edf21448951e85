//! The fixed derive → filter → group → totals sequence over one joined table.
//!
//! Only the deficit subset is filtered. The grouped summary and the totals are computed from
//! every derived row.

use crate::aggregate::{group_by, AggSpec};
use crate::derive::{derive_columns, DerivedColumn};
use crate::error::AnalyticsResult;
use crate::filter::{filter_rows, Predicate};
use crate::summary::{summarize, Totals};
use stockflow_table::Table;

/// Columns feeding the process-wide [`Totals`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TotalsSpec {
    pub key: String,
    pub ordered: String,
    pub shipped: String,
}

/// Everything the engine computes from one joined table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Aggregates {
    /// The joined table with derived columns appended.
    pub derived: Table,
    pub deficits: Table,
    pub summary: Table,
    pub totals: Totals,
}

/// Derive, filter, group and summarize, in that order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregationEngine {
    pub derived: Vec<DerivedColumn>,
    pub filter: Predicate,
    pub group_key: String,
    pub aggregations: Vec<AggSpec>,
    pub totals: TotalsSpec,
}

impl AggregationEngine {
    pub fn run(&self, joined: &Table) -> AnalyticsResult<Aggregates> {
        let derived = derive_columns(joined, &self.derived)?;
        let deficits = filter_rows(&derived, &self.filter)?;
        // Grouping and totals run over every joined row, not just the filtered subset.
        let summary = group_by(&derived, &self.group_key, &self.aggregations)?;
        let totals = summarize(
            &derived,
            &self.totals.key,
            &self.totals.ordered,
            &self.totals.shipped,
        )?;

        Ok(Aggregates {
            derived,
            deficits,
            summary,
            totals,
        })
    }
}
