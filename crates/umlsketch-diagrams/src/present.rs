//! Presentation of render outcomes
//!
//! [`PanelBuilder`] turns an outcome into a [`Presentation`]: the image with
//! its actions, or an error panel that is always actionable (reason,
//! remediation links, copy source, retry). A [`PresentationSink`] writes
//! presentations to an output surface.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::loader::LoadedImage;
use crate::outcome::{FailureReason, RenderOutcome};
use crate::types::{DiagramSource, RequestId, SurfaceId};
use crate::validate::ValidationError;

/// Link to another place the user can author the diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationLink {
    pub label: String,
    pub url: String,
}

impl RemediationLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    /// PlantUML online editor and Kroki
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("PlantUML online editor", "https://www.plantuml.com/plantuml/uml/"),
            Self::new("Kroki", "https://kroki.io/"),
        ]
    }
}

/// Everything needed to run a request again
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryTicket {
    pub surface: SurfaceId,
    pub source: DiagramSource,
}

/// Control offered next to a rendered image or an error panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Save the image locally under `file_name`
    Download { file_name: String },
    /// Copy the diagram source text
    CopySource,
    /// View the image at full size
    OpenFullSize { url: String },
    /// Author the diagram elsewhere
    Remediation(RemediationLink),
    /// Run the full pipeline again with the same source
    Retry(RetryTicket),
}

/// What a surface should show
#[derive(Debug, Clone)]
pub enum Presentation {
    /// A request is in flight
    Loading,
    /// Source was rejected before rendering
    Invalid { errors: Vec<ValidationError> },
    /// Diagram image with its controls
    Image {
        request: RequestId,
        image_url: String,
        endpoint: String,
        image: LoadedImage,
        source: DiagramSource,
        actions: Vec<Action>,
    },
    /// Render failed
    Error {
        request: RequestId,
        reason: FailureReason,
        source: DiagramSource,
        actions: Vec<Action>,
    },
}

impl Presentation {
    pub fn actions(&self) -> &[Action] {
        match self {
            Self::Image { actions, .. } | Self::Error { actions, .. } => actions.as_slice(),
            Self::Loading | Self::Invalid { .. } => &[],
        }
    }

    /// File name offered by the download action, if any
    pub fn download_name(&self) -> Option<&str> {
        self.actions().iter().find_map(|action| match action {
            Action::Download { file_name } => Some(file_name.as_str()),
            _ => None,
        })
    }

    /// Retry ticket offered by the error panel, if any
    pub fn retry_ticket(&self) -> Option<&RetryTicket> {
        self.actions().iter().find_map(|action| match action {
            Action::Retry(ticket) => Some(ticket),
            _ => None,
        })
    }
}

/// File name of a downloaded diagram, derived from a millisecond timestamp
pub fn download_file_name(unix_millis: u128) -> String {
    format!("plantuml-diagram-{}.png", unix_millis)
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Builds presentations from outcomes
#[derive(Debug, Clone)]
pub struct PanelBuilder {
    remediation: Vec<RemediationLink>,
    clock: fn() -> u128,
}

impl Default for PanelBuilder {
    fn default() -> Self {
        Self::new(RemediationLink::defaults())
    }
}

impl PanelBuilder {
    pub fn new(remediation: Vec<RemediationLink>) -> Self {
        Self {
            remediation,
            clock: unix_millis,
        }
    }

    /// Replace the timestamp source used for download names
    pub fn with_clock(mut self, clock: fn() -> u128) -> Self {
        self.clock = clock;
        self
    }

    pub fn remediation(&self) -> &[RemediationLink] {
        &self.remediation
    }

    /// Build the presentation for a terminal outcome on `surface`
    pub fn build(&self, surface: &SurfaceId, outcome: RenderOutcome) -> Presentation {
        match outcome {
            RenderOutcome::Rendered {
                request,
                rendered,
                source,
            } => Presentation::Image {
                request,
                actions: vec![
                    Action::Download {
                        file_name: download_file_name((self.clock)()),
                    },
                    Action::CopySource,
                    Action::OpenFullSize {
                        url: rendered.image_url.clone(),
                    },
                ],
                image_url: rendered.image_url,
                endpoint: rendered.endpoint,
                image: rendered.image,
                source,
            },
            RenderOutcome::Failed {
                request,
                reason,
                source,
            } => {
                let mut actions: Vec<Action> = self
                    .remediation
                    .iter()
                    .cloned()
                    .map(Action::Remediation)
                    .collect();
                actions.push(Action::CopySource);
                actions.push(Action::Retry(RetryTicket {
                    surface: surface.clone(),
                    source: source.clone(),
                }));

                Presentation::Error {
                    request,
                    reason,
                    source,
                    actions,
                }
            }
        }
    }
}

/// Consumer of presentations for one or more surfaces
pub trait PresentationSink: Send + Sync {
    /// Replace whatever `surface` currently shows
    fn present(&self, surface: &SurfaceId, presentation: &Presentation);
}

/// Keeps the latest HTML fragment per surface
///
/// Produces the markup a preview element would hold: the image and its
/// controls, or the error panel.
#[derive(Debug, Default)]
pub struct HtmlPreviewSink {
    fragments: Mutex<HashMap<SurfaceId, String>>,
}

impl HtmlPreviewSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current markup of `surface`
    pub fn fragment(&self, surface: &SurfaceId) -> Option<String> {
        self.fragments
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(surface)
            .cloned()
    }

    /// Render a presentation to markup
    pub fn render(presentation: &Presentation) -> String {
        match presentation {
            Presentation::Loading => {
                r#"<span class="loading">Generating diagram...</span>"#.to_string()
            }
            Presentation::Invalid { errors } => errors
                .iter()
                .map(|e| format!(r#"<span class="error">Error: {}</span>"#, html_escape(&e.message())))
                .collect::<Vec<_>>()
                .join("\n"),
            Presentation::Image {
                image_url,
                source,
                actions,
                ..
            } => format!(
                "<img src=\"{url}\" alt=\"PlantUML diagram\" class=\"diagram\">\n<div class=\"diagram-controls\">\n{controls}\n</div>",
                url = html_escape(image_url),
                controls = render_actions(actions, source, image_url),
            ),
            Presentation::Error {
                reason,
                source,
                actions,
                ..
            } => format!(
                "<div class=\"render-error\">\n<h3>Render error</h3>\n<p>{reason}</p>\n<div class=\"diagram-controls\">\n{controls}\n</div>\n</div>",
                reason = html_escape(&reason.to_string()),
                controls = render_actions(actions, source, ""),
            ),
        }
    }
}

impl PresentationSink for HtmlPreviewSink {
    fn present(&self, surface: &SurfaceId, presentation: &Presentation) {
        let markup = Self::render(presentation);
        self.fragments
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(surface.clone(), markup);
    }
}

fn render_actions(actions: &[Action], source: &DiagramSource, image_url: &str) -> String {
    actions
        .iter()
        .map(|action| match action {
            Action::Download { file_name } => format!(
                r#"<a class="btn" href="{}" download="{}">Download PNG</a>"#,
                html_escape(image_url),
                html_escape(file_name)
            ),
            Action::CopySource => format!(
                r#"<button class="btn" data-action="copy-source" data-source="{}">Copy source</button>"#,
                html_escape(source.as_str())
            ),
            Action::OpenFullSize { url } => format!(
                r#"<a class="btn" href="{}" target="_blank" rel="noopener">Open full size</a>"#,
                html_escape(url)
            ),
            Action::Remediation(link) => format!(
                r#"<a class="remediation" href="{}" target="_blank" rel="noopener">{}</a>"#,
                html_escape(&link.url),
                html_escape(&link.label)
            ),
            Action::Retry(ticket) => format!(
                r#"<button class="btn" data-action="retry" data-surface="{}">Retry</button>"#,
                html_escape(ticket.surface.as_str())
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
