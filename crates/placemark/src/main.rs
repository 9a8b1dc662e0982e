use anyhow::{Context, Result};
use clap::Parser;
use placemark::cli::convert_cmd::{self, ConvertArgs};
use placemark::cli::output::{self, Styled};
use placemark::config::Settings;
use placemark::document::OutputFormat;
use placemark::logging::{init_logging, LogConfig};
use placemark::PipelineOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "placemark", version)]
#[command(about = "Convert Google Maps saved places (CSV or ZIP) into layered KML/KMZ")]
struct Args {
    /// Input CSV file, or a ZIP archive of CSV files
    input: PathBuf,

    /// Output file for CSV input, output directory for ZIP input
    output: PathBuf,

    /// Look up an address for every place (Nominatim)
    #[arg(long)]
    geocode: bool,

    /// Write plain KML instead of KMZ
    #[arg(long)]
    kml: bool,

    /// Do not split places into Sleep/Eat/Do layers
    #[arg(long)]
    no_layers: bool,

    /// Do not attach category icons
    #[arg(long)]
    no_icons: bool,

    /// Geocode cache capacity (0 = unbounded)
    #[arg(long)]
    cache_size: Option<usize>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Suppress progress and summary output
    #[arg(long, short)]
    quiet: bool,

    /// Print a JSON summary to stdout
    #[arg(long)]
    json: bool,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Emit console logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn convert_args(&self) -> ConvertArgs {
        ConvertArgs {
            input: self.input.clone(),
            output: self.output.clone(),
            format: if self.kml {
                OutputFormat::Kml
            } else {
                OutputFormat::Kmz
            },
            options: PipelineOptions {
                geocode: self.geocode,
                layers: !self.no_layers,
                icons: !self.no_icons,
            },
        }
    }

    fn log_config(&self) -> LogConfig {
        LogConfig {
            debug: self.debug,
            quiet: self.quiet || self.json,
            json: self.log_json,
            file: self.log_file.clone(),
        }
    }
}

fn main() {
    let args = Args::parse();

    // Set before the runtime spawns worker threads.
    if args.quiet {
        std::env::set_var(output::ENV_QUIET, "1");
    }
    if args.json {
        std::env::set_var(output::ENV_JSON, "1");
    }

    let result = tokio::runtime::Runtime::new()
        .context("failed to start async runtime")
        .and_then(|rt| rt.block_on(run(&args)));

    if let Err(e) = result {
        let s = Styled::new();
        eprintln!("  {} {e:#}", s.fail_sym());
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<()> {
    init_logging(&args.log_config()).context("failed to open log file")?;

    let mut settings = Settings::from_env()?;
    if let Some(size) = args.cache_size {
        settings.cache_capacity = size;
    }

    convert_cmd::run(&args.convert_args(), &settings).await
}
