use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use stockflow_analytics::synthetic::{self, SyntheticConfig};
use stockflow_analytics::{emit_charts, sample, Pipeline, PipelineConfig};

use crate::chart_sink::JsonChartSink;
use crate::report::{write_json_report, write_text_report};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Dataset {
    /// Fixed ten-product inventory/shipments/orders sample, grouped by warehouse.
    Reference,
    /// Seeded random supplier/region data, grouped by region.
    Synthetic,
}

impl Dataset {
    fn as_str(self) -> &'static str {
        match self {
            Dataset::Reference => "reference",
            Dataset::Synthetic => "synthetic",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "stockflow",
    about = "Join inventory, shipments and orders, flag stock deficits and summarize by warehouse or region."
)]
pub struct Args {
    /// Input dataset.
    #[arg(long, value_enum, default_value_t = Dataset::Reference)]
    dataset: Dataset,

    /// Seed for the synthetic dataset.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of products in the synthetic dataset.
    #[arg(long, default_value_t = 50)]
    products: usize,

    /// Number of regions in the synthetic dataset.
    #[arg(long, default_value_t = 4)]
    regions: usize,

    /// Number of suppliers in the synthetic dataset.
    #[arg(long, default_value_t = 5)]
    suppliers: usize,

    /// Directory that receives chart descriptions.
    #[arg(long, value_name = "PATH", default_value = "charts")]
    out_dir: PathBuf,

    /// Skip writing chart descriptions.
    #[arg(long)]
    no_charts: bool,

    /// Console output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    run_with_args(args, &mut handle)
}

pub fn run_with_args(args: Args, out: &mut impl Write) -> Result<()> {
    let (tables, config) = match args.dataset {
        Dataset::Reference => (
            sample::reference_tables().context("build reference dataset")?,
            PipelineConfig::default(),
        ),
        Dataset::Synthetic => {
            let synthetic_config = SyntheticConfig {
                seed: args.seed,
                products: args.products,
                regions: args.regions,
                suppliers: args.suppliers,
            };
            let data = synthetic::generate(&synthetic_config)
                .context("generate synthetic dataset")?;
            (data.into_tables(), PipelineConfig::regional())
        }
    };

    let pipeline = Pipeline::new(config);
    let output = pipeline
        .run(&tables)
        .with_context(|| format!("run {} pipeline", args.dataset.as_str()))?;

    let charts = if args.no_charts {
        Vec::new()
    } else {
        let mut sink = JsonChartSink::new(&args.out_dir);
        emit_charts(&output, pipeline.config(), &mut sink)
            .with_context(|| format!("write charts to {}", args.out_dir.display()))?
    };

    match args.format {
        OutputFormat::Text => write_text_report(out, &output, pipeline.config(), &charts)?,
        OutputFormat::Json => write_json_report(
            out,
            args.dataset.as_str(),
            &output,
            pipeline.config(),
            &charts,
        )?,
    }
    Ok(())
}
