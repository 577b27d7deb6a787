//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, SweepConfig};
use crate::display::{DisplaySink, TableDisplay, TableOptions};
use crate::engine::{AggregationState, Aggregator};
use crate::error::Result;
use crate::http::HttpClient;
use crate::output::{Destination, ExportSink, FileExporter};
use crate::source::HttpPageClient;
use crate::types::{Column, Listing};
use std::borrow::Cow;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Fetch {
                format,
                search,
                sort,
                desc,
                page,
                page_length,
            } => {
                let options = TableOptions {
                    search: search.clone(),
                    sort: sort.as_deref().map(str::parse::<Column>).transpose()?,
                    order: Commands::sort_order(*desc),
                    page: *page,
                    page_length: *page_length,
                };
                self.fetch(&config, *format, options).await
            }
            Commands::Export {
                format,
                output,
                file_name,
                compression,
            } => {
                let mut config = config;
                if let Some(format) = format {
                    config.export.format = *format;
                }
                if let Some(output) = output {
                    config.export.destination.clone_from(output);
                }
                if let Some(file_name) = file_name {
                    config.export.file_name = Some(file_name.clone());
                }
                if let Some(compression) = compression {
                    config.export.compression = *compression;
                }
                self.export(&config).await
            }
            Commands::Serve { port } => crate::cli::serve(&config, *port).await,
        }
    }

    /// Load the config file and apply command-line overrides
    fn load_config(&self) -> Result<SweepConfig> {
        let mut config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => SweepConfig::default(),
        };

        if let Some(base_url) = &self.cli.base_url {
            config.source.base_url.clone_from(base_url);
        }
        if let Some(max_pages) = self.cli.max_pages {
            config.aggregation.max_pages = Some(max_pages);
        }

        config.validate()?;
        Ok(config)
    }

    /// Run one aggregation, cancelled by Ctrl-C
    async fn aggregate(&self, config: &SweepConfig) -> Result<AggregationState> {
        let aggregator = build_aggregator(config)?;
        let cancel = CancellationToken::new();

        let on_signal = cancel.clone();
        let signal = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, keeping listings fetched so far");
                on_signal.cancel();
            }
        });

        let state = aggregator.fetch_all(&config.fetch_context(), &cancel).await;
        signal.abort();
        state
    }

    /// Fetch and print
    async fn fetch(
        &self,
        config: &SweepConfig,
        format: OutputFormat,
        options: TableOptions,
    ) -> Result<()> {
        let state = self.aggregate(config).await?;

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&state)?);
            }
            OutputFormat::Pretty => {
                for listing in state.listings() {
                    println!("{}", summary_line(listing));
                }
                println!(
                    "{} listings from {} pages",
                    state.len(),
                    state.pages_fetched
                );
            }
            OutputFormat::Table => {
                let mut display = TableDisplay::new(options);
                display.rebuild(state.listings());
                print!("{}", display.render());
            }
        }

        finish(state)
    }

    /// Fetch and export, keeping partial results
    async fn export(&self, config: &SweepConfig) -> Result<()> {
        let state = self.aggregate(config).await?;

        if state.is_partial() {
            warn!(
                listings = state.len(),
                "Exporting a partial collection"
            );
        }

        let exporter = build_exporter(config)?;
        let receipt = exporter.export(state.listings()).await?;
        println!("{}", serde_json::to_string(&receipt)?);

        finish(state)
    }
}

/// Build the aggregator described by a config
pub fn build_aggregator(config: &SweepConfig) -> Result<Aggregator> {
    let client = HttpClient::with_config(config.http_client_config())?;
    let source = HttpPageClient::new(client)
        .with_path(&config.source.path)
        .with_page_param(&config.source.page_param);

    info!(endpoint = %source.endpoint(), "Using listing source");
    Ok(Aggregator::new(Arc::new(source)).with_config(config.aggregator_config()))
}

/// Build the file exporter described by a config
pub fn build_exporter(config: &SweepConfig) -> Result<FileExporter> {
    let destination = Destination::parse(&config.export.destination)?;
    let mut exporter = FileExporter::new(destination, config.export.format)
        .with_parquet_config(config.parquet_config());
    if let Some(file_name) = &config.export.file_name {
        exporter = exporter.with_file_name(file_name);
    }
    Ok(exporter)
}

/// Surface the run's error, if any, after output has been produced
fn finish(state: AggregationState) -> Result<()> {
    match state.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn summary_line(listing: &Listing) -> String {
    let mut line = listing
        .field(Column::Name)
        .map_or_else(|| "(no name)".to_string(), Cow::into_owned);
    if let Some(bar) = listing.field(Column::BarNumber) {
        let _ = write!(line, " [#{bar}]");
    }
    for column in [Column::Practice, Column::Email, Column::OfficePhone] {
        if let Some(value) = listing.field(column) {
            line.push_str(" - ");
            line.push_str(&value);
        }
    }
    line
}
