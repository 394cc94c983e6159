//! Terminal presentation sink
//!
//! The CLI counterpart of the preview element: panels are printed to
//! stdout, the download action saves the PNG into the output directory and
//! the copy-source action saves the diagram text next to it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use umlsketch_diagrams::{Action, HtmlPreviewSink, Presentation, PresentationSink, SurfaceId};

/// Prints panels and writes render artifacts to a directory
#[derive(Debug)]
pub struct ConsoleSink {
    out_dir: PathBuf,
    write_html: bool,
    written: Mutex<Vec<PathBuf>>,
    error: Mutex<Option<anyhow::Error>>,
}

impl ConsoleSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            write_html: false,
            written: Mutex::new(Vec::new()),
            error: Mutex::new(None),
        }
    }

    /// Also write the HTML fragment of each surface to `<surface>.html`
    pub fn with_html(mut self, write_html: bool) -> Self {
        self.write_html = write_html;
        self
    }

    /// Files written so far, in order
    pub fn written(&self) -> Vec<PathBuf> {
        self.written
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// First presentation failure since the last call, if any
    pub fn take_error(&self) -> Option<anyhow::Error> {
        self.error.lock().unwrap_or_else(|e| e.into_inner()).take()
    }

    fn write(&self, path: PathBuf, contents: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.out_dir).with_context(|| {
            format!("Failed to create output directory: {}", self.out_dir.display())
        })?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  Created: {}", path.display());
        self.written
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path);
        Ok(())
    }

    fn present_inner(&self, surface: &SurfaceId, presentation: &Presentation) -> Result<()> {
        match presentation {
            Presentation::Loading => {
                println!("Generating diagram...");
            }
            Presentation::Invalid { errors } => {
                for error in errors {
                    println!("error[{}]: {}", error.code(), error);
                }
            }
            Presentation::Image {
                image_url,
                endpoint,
                image,
                source,
                actions,
                ..
            } => {
                println!("Rendered via {} ({} bytes)", endpoint, image.len());
                for action in actions {
                    match action {
                        Action::Download { file_name } => {
                            self.write(self.out_dir.join(file_name), &image.data)?;
                            let source_path = source_path(&self.out_dir, file_name);
                            self.write(source_path, source.as_str().as_bytes())?;
                        }
                        Action::OpenFullSize { url } => println!("  Full size: {}", url),
                        _ => {}
                    }
                }
                tracing::debug!("Presented {} on {}", image_url, surface);
            }
            Presentation::Error {
                reason, actions, ..
            } => {
                println!("Render error: {}", reason);
                println!("  Alternatives:");
                for action in actions {
                    match action {
                        Action::Remediation(link) => println!("    {}: {}", link.label, link.url),
                        Action::Retry(ticket) => {
                            println!("  Retry: run the render command again for '{}'", ticket.surface)
                        }
                        _ => {}
                    }
                }
            }
        }

        if self.write_html && !matches!(presentation, Presentation::Loading) {
            let html = HtmlPreviewSink::render(presentation);
            self.write(
                self.out_dir.join(format!("{}.html", surface)),
                html.as_bytes(),
            )?;
        }

        Ok(())
    }
}

impl PresentationSink for ConsoleSink {
    fn present(&self, surface: &SurfaceId, presentation: &Presentation) {
        if let Err(e) = self.present_inner(surface, presentation) {
            tracing::error!("Failed to present on {}: {:#}", surface, e);
            let mut first = self.error.lock().unwrap_or_else(|p| p.into_inner());
            if first.is_none() {
                *first = Some(e);
            }
        }
    }
}

/// `plantuml-diagram-123.png` -> `plantuml-diagram-123.puml`
fn source_path(dir: &Path, image_name: &str) -> PathBuf {
    dir.join(Path::new(image_name).with_extension("puml"))
}

/// Check that a surface name is usable as a file stem in the output directory
pub fn check_surface_name(surface: &str) -> Result<()> {
    if surface.is_empty()
        || surface == "."
        || surface == ".."
        || surface.contains(['/', '\\'])
    {
        anyhow::bail!(
            "Invalid surface name '{}': use a plain name without path separators",
            surface
        );
    }
    Ok(())
}
