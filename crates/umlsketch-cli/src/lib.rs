//! umlsketch CLI - Command-line interface library
//!
//! This library provides the CLI functionality for umlsketch, including:
//! - Check: Validate a PlantUML diagram without rendering it
//! - Url: Print the server URLs of a diagram
//! - Render: Fetch the PNG and save it with a copy of the source
//! - Pages: Navigate the bundled tutorial
//!
//! # Library Usage
//!
//! ```ignore
//! use umlsketch_cli::{check_command, render_command, OutputFormat};
//!
//! check_command(&input, OutputFormat::Json)?;
//! render_command(&input, &output, "preview", false, &settings).await?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Check a diagram for issues
//! umlsketch check sequence.puml --format json
//!
//! # Render a diagram into ./output
//! umlsketch render sequence.puml --output output --html
//!
//! # Where am I in the tutorial?
//! umlsketch pages --current pages/class.html
//! ```

pub mod app;
pub mod sink;

// Re-export main entry point and types
pub use app::{
    check_command, load_settings, pages_command, read_source, render_command, url_command,
};
pub use app::{run_cli, OutputFormat};
pub use sink::{check_surface_name, ConsoleSink};
