//! Writes each chart request as a JSON chart description.
//!
//! Files are written atomically: the description goes to a temp file in the destination
//! directory, is synced, then renamed over `<out_dir>/<file_stem>.json`.

use crate::report::{table_to_json, JsonTable};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use stockflow_analytics::{ChartError, ChartRequest, ChartSink};
use tempfile::NamedTempFile;

#[derive(Debug, Serialize)]
struct JsonChart<'a> {
    title: &'a str,
    mark: &'static str,
    x: &'a str,
    y: &'a [String],
    data: JsonTable<'a>,
}

#[derive(Debug)]
pub struct JsonChartSink {
    out_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonChartSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far, in render order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ChartSink for JsonChartSink {
    fn render(&mut self, chart: &ChartRequest<'_>) -> Result<(), ChartError> {
        chart.validate()?;
        let path = self.out_dir.join(format!("{}.json", chart.file_stem));

        // `x` may also be plotted as a `y` series; the data carries each column once.
        let mut selected = vec![chart.x.as_str()];
        for column in &chart.y {
            if !selected.contains(&column.as_str()) {
                selected.push(column.as_str());
            }
        }
        let data = chart.table.select(&selected)?;

        let description = JsonChart {
            title: &chart.title,
            mark: chart.kind.as_str(),
            x: &chart.x,
            y: &chart.y,
            data: table_to_json(&data),
        };
        atomic_write_json(&path, &description).map_err(|source| ChartError::Io {
            path: path.clone(),
            source,
        })?;

        log::debug!("wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

fn parent_dir_or_dot(path: &Path) -> &Path {
    // `Path::parent` is `Some("")` for bare file names.
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn atomic_write_json(dest: &Path, value: &impl Serialize) -> io::Result<()> {
    let dir = parent_dir_or_dot(dest);
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(tmp.as_file_mut(), value)?;
    tmp.as_file_mut().write_all(b"\n")?;
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;

    tmp.persist(dest).map_err(|err| err.error)?;
    Ok(())
}
