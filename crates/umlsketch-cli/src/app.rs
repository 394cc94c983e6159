//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use umlsketch_diagrams::{
    validate, DiagramEncoder, DiagramSource, Previewer, Settings, Submission, SurfaceId,
    CONFIG_FILE_NAME,
};
use umlsketch_tutorial::PageTable;

use crate::sink::{check_surface_name, ConsoleSink};

/// Output format for diagnostics and listings
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "umlsketch")]
#[command(author, version, about = "Preview PlantUML diagrams", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a diagram for issues without rendering it
    Check {
        /// Input diagram file, `-` for stdin
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the image URL of a diagram on every configured server
    Url {
        /// Input diagram file, `-` for stdin
        input: PathBuf,
    },

    /// Render a diagram and save the PNG with a copy of its source
    Render {
        /// Input diagram file, `-` for stdin
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Surface name used for the HTML fragment
        #[arg(short, long, default_value = "preview")]
        surface: String,

        /// Also write the preview panel as an HTML fragment
        #[arg(long)]
        html: bool,
    },

    /// Show the tutorial pages, or the neighbours of one page
    Pages {
        /// Path of the page being read, e.g. pages/class.html
        #[arg(long)]
        current: Option<String>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check { input, format } => {
            if !check_command(&input, format)? {
                std::process::exit(1);
            }
        }
        Commands::Url { input } => {
            let settings = load_settings(&cli.config)?;
            url_command(&input, &settings)?;
        }
        Commands::Render {
            input,
            output,
            surface,
            html,
        } => {
            let settings = load_settings(&cli.config)?;
            render_command(&input, &output, &surface, html, &settings).await?;
        }
        Commands::Pages { current, format } => {
            pages_command(current.as_deref(), format)?;
        }
    }

    Ok(())
}

/// Install the stderr subscriber; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (tests calling run paths twice) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

/// Load settings from `path`, falling back to defaults when it is absent
pub fn load_settings(path: &Path) -> Result<Settings> {
    Settings::load_or_default(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Read diagram source from a file, or stdin for `-`
pub fn read_source(input: &Path) -> Result<DiagramSource> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read diagram from stdin")?;
        return Ok(DiagramSource::new(text));
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    Ok(DiagramSource::new(text))
}

/// Execute the check command
///
/// Returns `true` when the diagram has no issues.
pub fn check_command(input: &Path, format: OutputFormat) -> Result<bool> {
    let source = read_source(input)?;
    let errors = validate(&source);

    match format {
        OutputFormat::Json => {
            let diagnostics: Vec<_> = errors.iter().map(|e| e.to_diagnostic()).collect();
            let json = serde_json::to_string_pretty(&diagnostics)
                .context("Failed to serialize diagnostics to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if errors.is_empty() {
                println!("✓ No issues found in {}", input.display());
            } else {
                for error in &errors {
                    println!("error[{}]: {}", error.code(), error.message());
                    println!("  = help: {}", error.help());
                    println!();
                }
                println!("Found {} error(s)", errors.len());
            }
        }
    }

    Ok(errors.is_empty())
}

/// Execute the url command
///
/// The diagram is encoded once; every server URL shares the token.
pub fn url_command(input: &Path, settings: &Settings) -> Result<Vec<String>> {
    let source = read_source(input)?;
    let errors = validate(&source);
    if let Some(first) = errors.first() {
        anyhow::bail!("Invalid diagram: {}", first);
    }

    let payload = settings
        .encoder()
        .encode(&source)
        .context("Failed to encode diagram")?;

    let urls: Vec<String> = settings
        .endpoints
        .iter()
        .map(|endpoint| endpoint.url_for(&payload))
        .collect();

    for (endpoint, url) in settings.endpoints.iter().zip(&urls) {
        println!("{}: {}", endpoint.name(), url);
    }

    Ok(urls)
}

/// Execute the render command
///
/// Runs the full preview flow against the configured servers. Returns the
/// files written (PNG, source copy, optional HTML fragment).
pub async fn render_command(
    input: &Path,
    output_dir: &Path,
    surface: &str,
    html: bool,
    settings: &Settings,
) -> Result<Vec<PathBuf>> {
    check_surface_name(surface)?;
    let source = read_source(input)?;
    println!("umlsketch v{}", umlsketch_diagrams::VERSION);
    println!("Rendering: {}", input.display());

    let pipeline = settings.pipeline().context("Failed to build render pipeline")?;
    let sink = ConsoleSink::new(output_dir).with_html(html);
    let previewer = Previewer::new(pipeline, settings.panels(), sink);

    match previewer.submit(SurfaceId::new(surface), source).await {
        Submission::Invalid(errors) => {
            anyhow::bail!("Diagram rejected with {} error(s)", errors.len());
        }
        Submission::Presented(outcome) | Submission::Superseded(outcome) => {
            if let Some(reason) = outcome.failure() {
                anyhow::bail!("Render failed: {}", reason);
            }
        }
    }

    if let Some(err) = previewer.sink().take_error() {
        return Err(err.context(format!(
            "Failed to save render output to {}",
            output_dir.display()
        )));
    }

    let written = previewer.sink().written();
    println!();
    println!("Render complete!");
    Ok(written)
}

/// Execute the pages command
pub fn pages_command(current: Option<&str>, format: OutputFormat) -> Result<()> {
    let table = PageTable::tutorial();

    let Some(current) = current else {
        match format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(table.pages())
                    .context("Failed to serialize pages to JSON")?;
                println!("{}", json);
            }
            OutputFormat::Text => {
                for (i, page) in table.pages().iter().enumerate() {
                    println!("{:>2}. {:<14} {}", i + 1, page.title, page.path);
                }
            }
        }
        return Ok(());
    };

    let page = table
        .hint_for(current)
        .with_context(|| format!("Not a tutorial page: {}", current))?;
    let progress = table
        .progress(current)
        .with_context(|| format!("Not a tutorial page: {}", current))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "page": page,
                "progress": progress,
                "percent": progress.percent(),
            });
            let json =
                serde_json::to_string_pretty(&json).context("Failed to serialize page to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!(
                "{} ({}/{}, {:.0}%)",
                page.title,
                progress.completed,
                progress.total,
                progress.percent()
            );
            if let Some(prev) = page.prev {
                println!("  Previous: {}", prev);
            }
            if let Some(next) = page.next {
                println!("  Next: {}", next);
            }
        }
    }

    Ok(())
}
