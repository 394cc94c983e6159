//! Render request surface
//!
//! [`Previewer`] wires validator, pipeline and sink together: submit text
//! for a surface, get the surface updated. Stale outcomes (a newer request
//! was issued for the same surface while this one was in flight) are
//! dropped instead of overwriting the newer result.

use crate::outcome::RenderOutcome;
use crate::pipeline::RenderPipeline;
use crate::present::{PanelBuilder, Presentation, PresentationSink, RetryTicket};
use crate::surface::SurfaceRegistry;
use crate::types::{DiagramSource, SurfaceId};
use crate::validate::{validate, ValidationError};

/// What happened to a submission
#[derive(Debug, Clone)]
pub enum Submission {
    /// Source failed validation; the pipeline never ran
    Invalid(Vec<ValidationError>),
    /// Outcome was written to the surface
    Presented(RenderOutcome),
    /// Outcome arrived after a newer request and was discarded
    Superseded(RenderOutcome),
}

impl Submission {
    /// The pipeline outcome, if the pipeline ran
    pub fn outcome(&self) -> Option<&RenderOutcome> {
        match self {
            Self::Presented(outcome) | Self::Superseded(outcome) => Some(outcome),
            Self::Invalid(_) => None,
        }
    }
}

/// Entry point for render requests against named surfaces
pub struct Previewer<S: PresentationSink> {
    pipeline: RenderPipeline,
    panels: PanelBuilder,
    registry: SurfaceRegistry,
    sink: S,
}

impl<S: PresentationSink> Previewer<S> {
    pub fn new(pipeline: RenderPipeline, panels: PanelBuilder, sink: S) -> Self {
        Self {
            pipeline,
            panels,
            registry: SurfaceRegistry::new(),
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    /// Validate, render and present `source` on `surface`
    pub async fn submit(&self, surface: SurfaceId, source: DiagramSource) -> Submission {
        let (request, errors) = self.registry.begin_with(&surface, |request| {
            let errors = validate(&source);
            if errors.is_empty() {
                self.sink.present(&surface, &Presentation::Loading);
            } else {
                log::debug!("Rejected {} on {}: {} error(s)", request, surface, errors.len());
                self.sink.present(
                    &surface,
                    &Presentation::Invalid {
                        errors: errors.clone(),
                    },
                );
            }
            errors
        });
        if !errors.is_empty() {
            return Submission::Invalid(errors);
        }

        let outcome = self.pipeline.render(request, source).await;

        let presented = self.registry.if_current(&surface, request, || {
            let presentation = self.panels.build(&surface, outcome.clone());
            self.sink.present(&surface, &presentation);
        });
        if presented.is_none() {
            log::debug!("Discarding stale outcome {} for {}", request, surface);
            return Submission::Superseded(outcome);
        }

        Submission::Presented(outcome)
    }

    /// Run the full pipeline again for a failed panel's ticket
    pub async fn retry(&self, ticket: &RetryTicket) -> Submission {
        log::info!("Retrying render on {}", ticket.surface);
        self.submit(ticket.surface.clone(), ticket.source.clone())
            .await
    }
}
