//! CLI binary for sourcead-client.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClientConfig`, drives one upload, and prints the rendered result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sourcead_client::{
    ClientConfig, Observer, ProcessingOptions, UploadClient, UploadObserver,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Terminal observer using indicatif ────────────────────────────────────────

/// Terminal observer: a selection tick on stderr and a spinner for the
/// busy state. The spinner starts and stops with the submission, so the
/// prompt is never left with a stale indicator.
struct CliObserver {
    spinner: ProgressBar,
}

impl CliObserver {
    fn new() -> Arc<Self> {
        let spinner = ProgressBar::hidden();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        Arc::new(Self { spinner })
    }
}

impl UploadObserver for CliObserver {
    fn on_file_selected(&self, name: &str) {
        eprintln!("{} {}", green("✓"), bold(name));
    }

    fn on_submission_start(&self) {
        self.spinner.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.spinner.set_prefix("Processing");
        self.spinner.set_message("waiting for the extraction service…");
        self.spinner.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_submission_finished(&self) {
        self.spinner.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Submit a document with automatic type detection, CSV output
  sourcead invoice.pdf

  # Explicit data type and format, save the converted artifact
  sourcead --data-type budget --format xlsx budget_2024.png -o budget_2024.xlsx

  # Raw JSON payload instead of rendered text
  sourcead --json scan.tiff

  # What does the service offer?
  sourcead --list-options

  # Is the service up?
  sourcead --health

ENVIRONMENT VARIABLES:
  SOURCEAD_BASE_URL   Extraction service root (default http://127.0.0.1:5000)
  SOURCEAD_DATA_TYPE  Default --data-type
  SOURCEAD_FORMAT     Default --format

ACCEPTED FILE TYPES:
  PNG, JPEG, PDF, TIFF — anything else is rejected before any upload.
"#;

/// Upload documents to the SourceAd extraction service.
#[derive(Parser, Debug)]
#[command(
    name = "sourcead",
    version,
    about = "Upload documents to the SourceAd extraction service and render the result",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document to submit (PNG, JPEG, PDF, or TIFF).
    #[arg(required_unless_present_any = ["list_options", "health"])]
    input: Option<PathBuf>,

    /// Data-type id understood by the service (see --list-options).
    #[arg(long, env = "SOURCEAD_DATA_TYPE", default_value = "auto")]
    data_type: String,

    /// Output-format id understood by the service (see --list-options).
    #[arg(long, env = "SOURCEAD_FORMAT", default_value = "csv")]
    format: String,

    /// Download the converted artifact to this path after a success.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extraction service root URL.
    #[arg(long, env = "SOURCEAD_BASE_URL", default_value = sourcead_client::DEFAULT_BASE_URL)]
    base_url: String,

    /// Print the raw extraction payload as JSON instead of rendered text.
    #[arg(long)]
    json: bool,

    /// List the service's data types and output formats, then exit.
    #[arg(long)]
    list_options: bool,

    /// Check service health, then exit.
    #[arg(long)]
    health: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "SOURCEAD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SOURCEAD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, env = "SOURCEAD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active; the
    // spinner provides the feedback that matters.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build client ─────────────────────────────────────────────────────
    let mut builder = ClientConfig::builder().base_url(&cli.base_url);
    if show_progress {
        builder = builder.observer(CliObserver::new() as Observer);
    }
    let config = builder.build().context("Invalid configuration")?;
    let mut client = UploadClient::new(config).context("Failed to create HTTP client")?;

    // ── Health check mode ────────────────────────────────────────────────
    if cli.health {
        let health = client
            .health()
            .await
            .context("Extraction service is not reachable")?;
        println!("{}  {}", bold(&health.status), health.message);
        return Ok(());
    }

    // ── Option listing mode ──────────────────────────────────────────────
    if cli.list_options {
        let options = client.load_options().await;
        print_options("Data types", &options.data_types);
        println!();
        print_options("Output formats", &options.formats);
        if options.data_types.is_empty() && options.formats.is_empty() {
            eprintln!(
                "{} No options received — is the service running at {}?",
                red("✗"),
                cli.base_url
            );
        }
        return Ok(());
    }

    // ── Submit ───────────────────────────────────────────────────────────
    let input = cli
        .input
        .as_ref()
        .context("No input document given")?;
    client
        .select_file(input)
        .with_context(|| format!("Cannot select {}", input.display()))?;

    let options = ProcessingOptions::new(&cli.data_type, &cli.format);
    let extraction = client
        .submit(&options)
        .await
        .context("Submission failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&extraction.result)
            .context("Failed to serialise extraction payload")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let rendered = extraction.render();
        handle
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
        if !rendered.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    // ── Download the artifact ────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let written = client
            .download_to(output_path)
            .await
            .context("Artifact download failed")?;
        if !cli.quiet {
            eprintln!(
                "{}  {}  {}",
                green("✔"),
                bold(&output_path.display().to_string()),
                dim(&format!("{written} bytes")),
            );
        }
    } else if let Ok(reference) = client.download_reference() {
        if !cli.quiet {
            eprintln!("{} {}", dim("artifact:"), reference);
        }
    }

    Ok(())
}

fn print_options(heading: &str, entries: &[sourcead_client::OptionEntry]) {
    println!("{}", bold(heading));
    for entry in entries {
        println!("  {:<16} {}", entry.id, entry.name);
    }
    if entries.is_empty() {
        println!("  {}", dim("(none)"));
    }
}
