//! Terminal results of a render request

use std::fmt;

use crate::loader::LoadedImage;
use crate::types::{DiagramSource, RequestId};

/// Why a render request ended without an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// No encoding capability is loaded
    EncoderUnavailable,
    /// The encoder rejected the source
    EncodeFailed(String),
    /// Every configured endpoint failed to deliver an image
    AllEndpointsUnavailable {
        /// Number of endpoints tried
        attempted: usize,
    },
}

impl FailureReason {
    /// Short machine-readable tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EncoderUnavailable => "encoder_unavailable",
            Self::EncodeFailed(_) => "encode_failed",
            Self::AllEndpointsUnavailable { .. } => "endpoints_unavailable",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EncoderUnavailable => {
                write!(f, "The diagram encoder is not available")
            }
            Self::EncodeFailed(message) => write!(f, "Could not encode the diagram: {}", message),
            Self::AllEndpointsUnavailable { attempted: 1 } => {
                write!(f, "The PlantUML server is not available")
            }
            Self::AllEndpointsUnavailable { attempted } => {
                write!(f, "None of the {} PlantUML servers are available", attempted)
            }
        }
    }
}

/// Successfully loaded diagram image
#[derive(Debug, Clone)]
pub struct RenderedImage {
    /// URL the image was loaded from
    pub image_url: String,
    /// Name of the endpoint that served it
    pub endpoint: String,
    /// Loaded PNG bytes
    pub image: LoadedImage,
}

/// Result of one render request, consumed once by a presentation sink
#[derive(Debug, Clone)]
pub enum RenderOutcome {
    Rendered {
        request: RequestId,
        rendered: RenderedImage,
        source: DiagramSource,
    },
    Failed {
        request: RequestId,
        reason: FailureReason,
        source: DiagramSource,
    },
}

impl RenderOutcome {
    pub fn request(&self) -> RequestId {
        match self {
            Self::Rendered { request, .. } | Self::Failed { request, .. } => *request,
        }
    }

    pub fn source(&self) -> &DiagramSource {
        match self {
            Self::Rendered { source, .. } | Self::Failed { source, .. } => source,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }

    /// URL of the rendered image, if any
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Rendered { rendered, .. } => Some(&rendered.image_url),
            Self::Failed { .. } => None,
        }
    }

    /// Failure reason, if any
    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Failed { reason, .. } => Some(reason),
            Self::Rendered { .. } => None,
        }
    }
}
