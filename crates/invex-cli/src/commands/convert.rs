//! Convert command - extract invoices and write the accounting import.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use invex_core::extract::{FixtureExtractor, save_fixture};
use invex_core::models::config::{InvexConfig, OutputEncoding};
use invex_core::{
    CachedRates, CsvExporter, CurrencyScoop, Document, ExtractedInvoice, InvoiceExtractor,
    Normalizer, OpenAiExtractor,
};

use super::load_config;

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Invoice PDFs or glob patterns
    inputs: Vec<String>,

    /// API key of the extraction service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Replay a saved extraction result instead of calling the service (development only)
    #[arg(long, conflicts_with = "save_fixture")]
    fixture: Option<PathBuf>,

    /// Save the extraction result as a fixture for later runs
    #[arg(long)]
    save_fixture: Option<PathBuf>,

    /// Number of the first document
    #[arg(long, alias = "startid", default_value_t = 1)]
    start_id: u32,

    /// API key of the forex provider
    #[arg(long, env = "INVEX_FOREX_API_KEY", hide_env_values = true)]
    forex_api_key: Option<String>,

    /// Output encoding (overrides the configuration)
    #[arg(long, value_enum)]
    encoding: Option<EncodingArg>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum EncodingArg {
    /// UTF-8
    Utf8,
    /// Windows-1250
    Cp1250,
}

impl From<EncodingArg> for OutputEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Utf8 => OutputEncoding::Utf8,
            EncodingArg::Cp1250 => OutputEncoding::Cp1250,
        }
    }
}

pub async fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let invoices = match &args.fixture {
        Some(path) => {
            if !args.inputs.is_empty() {
                warn!("Input files are ignored when replaying a fixture");
            }
            FixtureExtractor::from_file(path)?.extract(&[]).await?
        }
        None => extract_documents(&args, &config).await?,
    };

    if let Some(path) = &args.save_fixture {
        save_fixture(path, &invoices)?;
    }

    let forex = CurrencyScoop::new(&config.forex, args.forex_api_key.clone())?;
    let rates = CachedRates::from_config(forex, &config.forex);
    let rows = Normalizer::new(&rates, &config.accounting)
        .normalize(invoices, args.start_id)
        .await?;

    let mut exporter = CsvExporter::from_config(&config.output)?;
    if let Some(encoding) = args.encoding {
        exporter = exporter.with_encoding(encoding.into());
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create {}", path.display()))?;
            exporter.write(&rows, file)?;
            eprintln!(
                "{} Wrote {} rows to {}",
                style("✓").green(),
                rows.len(),
                path.display()
            );
        }
        None => exporter.write(&rows, io::stdout().lock())?,
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

async fn extract_documents(
    args: &ConvertArgs,
    config: &InvexConfig,
) -> anyhow::Result<Vec<ExtractedInvoice>> {
    let paths = expand_inputs(&args.inputs)?;
    if paths.is_empty() {
        anyhow::bail!("No input files given");
    }

    let Some(api_key) = args.api_key.clone() else {
        anyhow::bail!("An extraction API key is required (--api-key or OPENAI_API_KEY)");
    };

    let documents = paths
        .iter()
        .map(|path| {
            Document::read(path).with_context(|| format!("Cannot read {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    info!("Extracting {} documents", documents.len());

    let extractor = OpenAiExtractor::new(&config.extraction, api_key)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Extracting {} documents...", documents.len()));
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = extractor.extract(&documents).await;
    pb.finish_and_clear();

    Ok(result?)
}

/// Resolve plain paths and glob patterns into a list of files.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.contains(['*', '?', '[']) {
            let matches: Vec<PathBuf> = glob(input)?.filter_map(|r| r.ok()).collect();
            if matches.is_empty() {
                anyhow::bail!("No files match pattern: {}", input);
            }
            files.extend(matches);
        } else {
            let path = Path::new(input);
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
