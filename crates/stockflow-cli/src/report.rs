use serde::Serialize;
use std::io::Write;
use stockflow_analytics::{PipelineConfig, PipelineOutput};
use stockflow_table::{Table, Value};

pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(v) => serde_json::Value::from(*v),
        Value::Number(v) => serde_json::Number::from_f64(v.0)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s.to_string()),
        Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
    }
}

/// Column-ordered JSON form of a table.
#[derive(Debug, Serialize)]
pub struct JsonTable<'a> {
    pub columns: &'a [String],
    pub rows: Vec<Vec<serde_json::Value>>,
}

pub fn table_to_json(table: &Table) -> JsonTable<'_> {
    JsonTable {
        columns: table.columns(),
        rows: table
            .rows()
            .map(|row| row.iter().map(value_to_json).collect())
            .collect(),
    }
}

#[derive(Debug, Serialize)]
struct JsonNullCount<'a> {
    column: &'a str,
    nulls: usize,
}

#[derive(Debug, Serialize)]
struct JsonTotals {
    products: usize,
    ordered: serde_json::Value,
    shipped: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    dataset: &'a str,
    dropped_rows: usize,
    null_counts: Vec<JsonNullCount<'a>>,
    deficits: JsonTable<'a>,
    summary: JsonTable<'a>,
    totals: JsonTotals,
    charts: &'a [String],
}

pub fn write_text_report(
    out: &mut impl Write,
    output: &PipelineOutput,
    config: &PipelineConfig,
    charts: &[String],
) -> anyhow::Result<()> {
    writeln!(out, "Missing values per column:")?;
    let width = output
        .null_counts
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    for (name, nulls) in &output.null_counts {
        writeln!(out, "{name:<width$}  {nulls}")?;
    }
    if output.dropped_rows > 0 {
        writeln!(
            out,
            "\nRows dropped by the {} join (no match in every table): {}",
            config.join_key, output.dropped_rows
        )?;
    }

    writeln!(out, "\nProducts with stock deficit:")?;
    if output.deficits.is_empty() {
        writeln!(out, "(none)")?;
    } else {
        writeln!(out, "{}", output.deficit_view(config)?)?;
    }

    writeln!(out, "\n{} Summary:", config.group_key)?;
    writeln!(out, "{}", output.summary)?;

    writeln!(out, "\nTotal Products: {}", output.totals.distinct_keys)?;
    writeln!(out, "Total Orders: {}", output.totals.total_ordered)?;
    writeln!(out, "Total Quantity Shipped: {}", output.totals.total_shipped)?;

    if !charts.is_empty() {
        writeln!(out, "\nCharts: {}", charts.join(", "))?;
    }
    Ok(())
}

pub fn write_json_report(
    out: &mut impl Write,
    dataset: &str,
    output: &PipelineOutput,
    config: &PipelineConfig,
    charts: &[String],
) -> anyhow::Result<()> {
    let deficits = output.deficit_view(config)?;
    let report = JsonReport {
        dataset,
        dropped_rows: output.dropped_rows,
        null_counts: output
            .null_counts
            .iter()
            .map(|(column, nulls)| JsonNullCount {
                column,
                nulls: *nulls,
            })
            .collect(),
        deficits: table_to_json(&deficits),
        summary: table_to_json(&output.summary),
        totals: JsonTotals {
            products: output.totals.distinct_keys,
            ordered: value_to_json(&output.totals.total_ordered),
            shipped: value_to_json(&output.totals.total_shipped),
        },
        charts,
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    out.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn values_map_to_json_scalars() {
        assert_eq!(value_to_json(&Value::from(-40)), serde_json::json!(-40));
        assert_eq!(value_to_json(&Value::from(2.5)), serde_json::json!(2.5));
        assert_eq!(value_to_json(&Value::from(f64::NAN)), serde_json::Value::Null);
        assert_eq!(value_to_json(&Value::from("WH1")), serde_json::json!("WH1"));
        assert_eq!(value_to_json(&Value::Null), serde_json::Value::Null);
    }

    #[test]
    fn table_json_keeps_column_order() {
        let mut t = Table::new("T", vec!["b", "a"]).unwrap();
        t.push_row(vec![1.into(), "x".into()]).unwrap();
        let json = serde_json::to_value(table_to_json(&t)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "columns": ["b", "a"], "rows": [[1, "x"]] })
        );
    }
}
