//! # umlsketch-diagrams
//!
//! PlantUML preview pipeline: validate diagram source, encode it once, load
//! the rendered PNG from a primary server with ordered fallbacks, and hand
//! a tagged outcome to a presentation sink.
//!
//! ## Stages
//!
//! - [`validate`]: rejects blank source and source without
//!   `@startuml`/`@enduml` before any work is done
//! - [`RenderPipeline`]: encode via a [`DiagramEncoder`], then try each
//!   [`RenderEndpoint`] in order through an [`ImageLoader`]
//! - [`PresentationSink`]: shows the image with its controls, or an
//!   actionable error panel
//!
//! ## Example
//!
//! ```no_run
//! use umlsketch_diagrams::{HtmlPreviewSink, Previewer, Settings, SurfaceId};
//!
//! # async fn demo() -> umlsketch_diagrams::Result<()> {
//! let settings = Settings::default();
//! let previewer = Previewer::new(settings.pipeline()?, settings.panels(), HtmlPreviewSink::new());
//!
//! let surface = SurfaceId::from("preview-sequence");
//! previewer
//!     .submit(surface.clone(), "@startuml\nAlice -> Bob: hi\n@enduml".into())
//!     .await;
//! println!("{}", previewer.sink().fragment(&surface).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod loader;
pub mod outcome;
pub mod pipeline;
pub mod present;
pub mod previewer;
pub mod surface;
pub mod types;
pub mod validate;

pub use config::{RenderSettings, Settings, CONFIG_FILE_NAME};
pub use encoder::{decode_token, DiagramEncoder, PlantUmlEncoder};
pub use error::{DiagramError, EncodeError, LoadError, Result};
pub use loader::{is_png, HttpImageLoader, ImageLoader, LoadedImage};
pub use outcome::{FailureReason, RenderOutcome, RenderedImage};
pub use pipeline::{PipelineStage, RenderPipeline};
pub use present::{
    download_file_name, Action, HtmlPreviewSink, PanelBuilder, Presentation, PresentationSink,
    RemediationLink, RetryTicket,
};
pub use previewer::{Previewer, Submission};
pub use surface::SurfaceRegistry;
pub use types::{
    DiagramSource, EncodedPayload, RenderEndpoint, RequestId, SurfaceId, END_MARKER, START_MARKER,
};
pub use validate::{validate, Diagnostic, ValidationError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
