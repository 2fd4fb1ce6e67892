//! jobscout CLI - discover job links and extract postings to JSON files
//!
//! `discover` prints a JSON array of links; `extract` reads such an array
//! from stdin (or `--input`) and prints the written file paths. Logs go to
//! stderr so the two can be piped together:
//!
//! ```text
//! jobscout discover rustjobs | jobscout extract
//! ```

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tabled::{Table, Tabled};
use tokio::io::AsyncReadExt;
use tracing::info;

use jobscout_core::adapter::{AdapterRegistry, SourceSummary};
use jobscout_core::application::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_OUTPUT_DIR,
};
use jobscout_core::application::{parse_link_list, render_link_list, Pipeline, PipelineConfig};
use jobscout_core::domain::SourceName;
use jobscout_core::port::SessionOptions;
use jobscout_core::ScoutError;
use jobscout_infra_fs::FsRecordWriter;
use jobscout_infra_render::{HttpRenderer, HttpRendererConfig};

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Job posting scraper", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Links extracted concurrently (also the bound on open pages)
    #[arg(long, global = true, env = "JOBSCOUT_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Directory receiving one JSON file per record (`~` is expanded)
    #[arg(long, global = true, env = "JOBSCOUT_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: String,

    /// Browserless base URL; pages are fetched directly when unset
    #[arg(long, global = true, env = "JOBSCOUT_BROWSERLESS_URL")]
    browserless_url: Option<String>,

    /// Browserless API token
    #[arg(long, global = true, env = "JOBSCOUT_BROWSERLESS_TOKEN", hide_env_values = true)]
    browserless_token: Option<String>,

    /// Per-request renderer timeout
    #[arg(long, global = true, env = "JOBSCOUT_TIMEOUT_SECS", default_value_t = DEFAULT_NAVIGATION_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover job links (all sources when SOURCE is omitted)
    Discover {
        /// Source name (e.g. rustjobs, golangprojects, indeed, functionalworks)
        source: Option<String>,
    },

    /// Extract records for a JSON array of links
    Extract {
        /// Read links from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List known sources
    Sources,
}

#[derive(Tabled)]
struct SourceRow {
    source: String,
    discovery: String,
    extraction: String,
    tags: String,
}

impl From<SourceSummary> for SourceRow {
    fn from(summary: SourceSummary) -> Self {
        Self {
            source: summary.source.to_string(),
            discovery: if summary.discovery { "yes" } else { "no" }.to_string(),
            extraction: summary.signature.unwrap_or_else(|| "-".to_string()),
            tags: summary.tags.join(", "),
        }
    }
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let output_dir = shellexpand::tilde(&self.output_dir).into_owned();
        let config = PipelineConfig {
            batch_size: self.batch_size,
            output_dir: PathBuf::from(output_dir),
            session: SessionOptions {
                timeout: Duration::from_secs(self.timeout_secs),
                ..SessionOptions::default()
            },
        };
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn build_pipeline(&self, registry: Arc<AdapterRegistry>) -> Result<Pipeline> {
        let renderer = HttpRenderer::new(HttpRendererConfig {
            browserless_url: self.browserless_url.clone(),
            browserless_token: self.browserless_token.clone(),
        });

        Ok(Pipeline::new(
            self.pipeline_config()?,
            registry,
            Arc::new(renderer),
            Arc::new(FsRecordWriter::new()),
        )?)
    }
}

/// Source to discover, rejected unless it has a discovery adapter
fn discovery_source(registry: &AdapterRegistry, name: Option<&str>) -> Result<Option<SourceName>> {
    let Some(name) = name else {
        return Ok(None);
    };
    let source: SourceName = name.parse()?;
    if registry.resolve_discovery(source).is_none() {
        return Err(ScoutError::UnknownSource(source.to_string()).into());
    }
    Ok(Some(source))
}

async fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("Failed to read links from stdin")?;
            Ok(raw)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init_logging()?;

    let registry = Arc::new(AdapterRegistry::builtin().context("Invalid adapter registry")?);

    match &cli.command {
        Commands::Discover { source } => {
            // Resolve the name before any session is opened
            let source = discovery_source(&registry, source.as_deref())?;

            let pipeline = cli.build_pipeline(registry)?;
            let links = pipeline.run_discovery(source).await?;

            println!("{}", render_link_list(&links)?);
            eprintln!(
                "{}",
                format!("✓ Discovered {} links", links.len()).green().bold()
            );
        }

        Commands::Extract { input } => {
            let raw = read_input(input.as_ref()).await?;
            let links = parse_link_list(&raw)?;

            let pipeline = cli.build_pipeline(registry)?;
            info!(output_dir = %pipeline.config().output_dir.display(), "Extracting");
            let run = pipeline.run_extraction(&links).await?;

            let written: Vec<String> = run
                .written
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            println!("{}", serde_json::to_string_pretty(&written)?);

            eprintln!(
                "{}",
                format!("✓ Wrote {} records", written.len()).green().bold()
            );
            if !run.report.skipped.is_empty() {
                eprintln!(
                    "  {} {} links matched no source",
                    "○".yellow(),
                    run.report.skipped.len()
                );
            }
            if !run.report.failed.is_empty() {
                eprintln!("  {} {} links failed", "✗".red(), run.report.failed.len());
            }
        }

        Commands::Sources => {
            let rows: Vec<SourceRow> = registry.summaries().into_iter().map(SourceRow::from).collect();
            println!("{}", "Known sources".cyan().bold());
            println!();
            println!("{}", Table::new(rows));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["jobscout", "sources"]).unwrap();
        let config = cli.pipeline_config().unwrap();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.session.timeout, DEFAULT_NAVIGATION_TIMEOUT);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["jobscout", "discover", "rustjobs", "--batch-size", "3"]).unwrap();
        assert_eq!(cli.batch_size, 3);
        assert!(matches!(cli.command, Commands::Discover { source: Some(ref s) } if s == "rustjobs"));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let cli = Cli::try_parse_from(["jobscout", "extract", "--batch-size", "0"]).unwrap();
        assert!(cli.pipeline_config().is_err());
    }

    #[test]
    fn test_output_dir_tilde_expanded() {
        let cli = Cli::try_parse_from(["jobscout", "extract", "--output-dir", "~/jobs"]).unwrap();
        let config = cli.pipeline_config().unwrap();
        assert!(!config.output_dir.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_discovery_source_needs_discovery_adapter() {
        let registry = AdapterRegistry::builtin().unwrap();
        assert_eq!(discovery_source(&registry, None).unwrap(), None);
        assert_eq!(
            discovery_source(&registry, Some("RustJobs")).unwrap(),
            Some(SourceName::Rustjobs)
        );

        for name in ["jooble", "monster"] {
            let err = discovery_source(&registry, Some(name)).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ScoutError>(),
                Some(ScoutError::UnknownSource(s)) if s == name
            ));
        }
    }

    #[test]
    fn test_source_rows() {
        let registry = AdapterRegistry::builtin().unwrap();
        let rows: Vec<SourceRow> = registry.summaries().into_iter().map(SourceRow::from).collect();
        let jooble = rows.iter().find(|r| r.source == "jooble").unwrap();
        assert_eq!(jooble.discovery, "no");
        assert_eq!(jooble.extraction, "contains jooble");
    }
}
