//! Hand-off of result tables to a chart renderer.
//!
//! The pipeline never draws anything itself. It describes each chart as a [`ChartRequest`]
//! (a table plus an x column and one or more y columns) and passes it to a [`ChartSink`].

use crate::pipeline::{PipelineConfig, PipelineOutput};
use std::io;
use std::path::PathBuf;
use stockflow_table::{Table, TableError};

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("chart {chart}: unknown column {column}")]
    UnknownColumn { chart: String, column: String },

    #[error("chart {chart}: no y columns")]
    EmptyAxis { chart: String },

    #[error("failed to write chart {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChartRequest<'a> {
    pub file_stem: String,
    pub title: String,
    pub kind: ChartKind,
    pub table: &'a Table,
    pub x: String,
    pub y: Vec<String>,
}

impl ChartRequest<'_> {
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.y.is_empty() {
            return Err(ChartError::EmptyAxis {
                chart: self.file_stem.clone(),
            });
        }
        for column in std::iter::once(&self.x).chain(&self.y) {
            if !self.table.has_column(column) {
                return Err(ChartError::UnknownColumn {
                    chart: self.file_stem.clone(),
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Something that persists or displays a chart.
pub trait ChartSink {
    fn render(&mut self, chart: &ChartRequest<'_>) -> Result<(), ChartError>;
}

/// Emit the standard charts for a pipeline run and return the stems that were rendered.
///
/// The deficit chart is skipped when there are no deficit rows.
pub fn emit_charts<S: ChartSink + ?Sized>(
    output: &PipelineOutput,
    config: &PipelineConfig,
    sink: &mut S,
) -> Result<Vec<String>, ChartError> {
    let group = &config.group_key;
    let mut requests = vec![
        ChartRequest {
            file_stem: format!("stock_per_{}", group.to_ascii_lowercase()),
            title: format!("Total Stock per {group}"),
            kind: ChartKind::Bar,
            table: &output.summary,
            x: group.clone(),
            y: vec![config.stock.clone()],
        },
        ChartRequest {
            file_stem: "shipments_vs_orders".to_string(),
            title: format!("Shipments vs Orders per {group}"),
            kind: ChartKind::Bar,
            table: &output.summary,
            x: group.clone(),
            y: vec![config.quantity_shipped.clone(), config.quantity_ordered.clone()],
        },
    ];

    if output.deficits.is_empty() {
        log::info!("no stock deficits; skipping deficit chart");
    } else {
        requests.push(ChartRequest {
            file_stem: "stock_deficit".to_string(),
            title: "Products with Stock Deficit".to_string(),
            kind: ChartKind::Bar,
            table: &output.deficits,
            x: config.join_key.clone(),
            y: vec![config.stock_vs_order.clone()],
        });
    }

    let mut rendered = Vec::with_capacity(requests.len());
    for request in &requests {
        request.validate()?;
        sink.render(request)?;
        log::debug!("rendered chart {}", request.file_stem);
        rendered.push(request.file_stem.clone());
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(table: &Table, y: Vec<String>) -> ChartRequest<'_> {
        ChartRequest {
            file_stem: "c".to_string(),
            title: "C".to_string(),
            kind: ChartKind::Bar,
            table,
            x: "k".to_string(),
            y,
        }
    }

    #[test]
    fn validate_checks_axes_against_the_table() {
        let table = Table::new("T", vec!["k", "v"]).unwrap();
        assert!(request(&table, vec!["v".to_string()]).validate().is_ok());
        assert!(matches!(
            request(&table, Vec::new()).validate(),
            Err(ChartError::EmptyAxis { .. })
        ));
        assert!(matches!(
            request(&table, vec!["w".to_string()]).validate(),
            Err(ChartError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn table_errors_keep_their_message() {
        let err = ChartError::from(TableError::DuplicateColumn {
            table: "T".to_string(),
            column: "k".to_string(),
        });
        assert!(matches!(err, ChartError::Table(_)));
        assert_eq!(err.to_string(), "duplicate column T[k]");
    }
}
