//! Encode-and-fetch pipeline with endpoint fallback
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌────────────────┐   ┌──────────────────┐
//! │   Idle   │──▶│ Encoding  │──▶│ Attempting(0)  │──▶│ Attempting(1..n) │
//! └──────────┘   └─────┬─────┘   └───────┬────────┘   └────────┬─────────┘
//!                      │ unavailable /   │ loaded              │ loaded / all failed
//!                      ▼ encode error    ▼                     ▼
//!                   Failed           Rendered          Rendered | Failed
//! ```
//!
//! The source is encoded exactly once per request; every endpoint attempt
//! reuses the same payload. Attempts run one after another, never
//! concurrently, and the first image that loads wins.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::encoder::DiagramEncoder;
use crate::error::{DiagramError, LoadError, Result};
use crate::loader::{ImageLoader, LoadedImage, DEFAULT_TIMEOUT};
use crate::outcome::{FailureReason, RenderOutcome, RenderedImage};
use crate::types::{DiagramSource, RenderEndpoint, RequestId};

/// Pipeline state, used for tracing transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Encoding,
    Attempting(usize),
    Rendered,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Encoding => write!(f, "encoding"),
            Self::Attempting(0) => write!(f, "attempting primary"),
            Self::Attempting(n) => write!(f, "attempting fallback {}", n),
            Self::Rendered => write!(f, "rendered"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Renders diagram source into an image via an ordered endpoint list
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use umlsketch_diagrams::{
///     DiagramSource, HttpImageLoader, PlantUmlEncoder, RenderEndpoint, RenderPipeline, RequestId,
/// };
///
/// # async fn demo() -> umlsketch_diagrams::Result<()> {
/// let pipeline = RenderPipeline::new(
///     Some(Arc::new(PlantUmlEncoder::new())),
///     Arc::new(HttpImageLoader::new()?),
///     RenderEndpoint::defaults(),
/// )?;
///
/// let outcome = pipeline
///     .render(RequestId::new(1), DiagramSource::from("@startuml\nA -> B\n@enduml"))
///     .await;
/// println!("{:?}", outcome.image_url());
/// # Ok(())
/// # }
/// ```
pub struct RenderPipeline {
    encoder: Option<Arc<dyn DiagramEncoder>>,
    loader: Arc<dyn ImageLoader>,
    endpoints: Vec<RenderEndpoint>,
    attempt_timeout: Duration,
}

impl RenderPipeline {
    /// Create a pipeline
    ///
    /// `encoder` is `None` when the encoding capability failed to load; such
    /// a pipeline still builds and answers every request with
    /// [`FailureReason::EncoderUnavailable`].
    pub fn new(
        encoder: Option<Arc<dyn DiagramEncoder>>,
        loader: Arc<dyn ImageLoader>,
        endpoints: Vec<RenderEndpoint>,
    ) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(DiagramError::InvalidConfig(
                "at least one render endpoint is required".to_string(),
            ));
        }

        Ok(Self {
            encoder,
            loader,
            endpoints,
            attempt_timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Bound each endpoint attempt; expiry counts as a load failure
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Endpoints in the order they are tried
    pub fn endpoints(&self) -> &[RenderEndpoint] {
        &self.endpoints
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Run one render request to its terminal outcome
    pub async fn render(&self, request: RequestId, source: DiagramSource) -> RenderOutcome {
        let mut stage = PipelineStage::Idle;
        log::trace!("Render {} {}", request, stage);

        stage = transition(request, stage, PipelineStage::Encoding);
        let encoder = match &self.encoder {
            Some(encoder) if encoder.is_available() => encoder,
            _ => {
                transition(request, stage, PipelineStage::Failed);
                return RenderOutcome::Failed {
                    request,
                    reason: FailureReason::EncoderUnavailable,
                    source,
                };
            }
        };

        let payload = match encoder.encode(&source) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Encoder {} failed: {}", encoder.name(), e);
                transition(request, stage, PipelineStage::Failed);
                return RenderOutcome::Failed {
                    request,
                    reason: FailureReason::EncodeFailed(e.to_string()),
                    source,
                };
            }
        };

        for (index, endpoint) in self.endpoints.iter().enumerate() {
            stage = transition(request, stage, PipelineStage::Attempting(index));
            let url = endpoint.url_for(&payload);

            match self.attempt(&url).await {
                Ok(image) => {
                    log::debug!(
                        "Rendered {} via {} ({} bytes)",
                        request,
                        endpoint.name(),
                        image.len()
                    );
                    transition(request, stage, PipelineStage::Rendered);
                    return RenderOutcome::Rendered {
                        request,
                        rendered: RenderedImage {
                            image_url: url,
                            endpoint: endpoint.name().to_string(),
                            image,
                        },
                        source,
                    };
                }
                Err(e) => {
                    log::warn!("Endpoint {} failed: {}", endpoint.name(), e);
                }
            }
        }

        transition(request, stage, PipelineStage::Failed);
        RenderOutcome::Failed {
            request,
            reason: FailureReason::AllEndpointsUnavailable {
                attempted: self.endpoints.len(),
            },
            source,
        }
    }

    async fn attempt(&self, url: &str) -> std::result::Result<LoadedImage, LoadError> {
        match tokio::time::timeout(self.attempt_timeout, self.loader.load(url)).await {
            Ok(result) => result,
            Err(_) => Err(LoadError::Timeout(self.attempt_timeout.as_millis())),
        }
    }
}

fn transition(request: RequestId, from: PipelineStage, to: PipelineStage) -> PipelineStage {
    log::debug!("Render {}: {} -> {}", request, from, to);
    to
}
