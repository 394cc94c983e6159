//! Preview configuration
//!
//! Settings are loaded from `umlsketch.toml`:
//!
//! ```toml
//! [render]
//! timeout_secs = 10
//! compression_level = 9
//!
//! [[endpoints]]
//! name = "local"
//! template = "http://localhost:8080/png/{token}"
//!
//! [[endpoints]]
//! name = "plantuml.com"
//! template = "https://www.plantuml.com/plantuml/png/{token}"
//!
//! [[remediation]]
//! label = "Kroki"
//! url = "https://kroki.io/"
//! ```
//!
//! Every section is optional; missing ones fall back to the defaults.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::encoder::PlantUmlEncoder;
use crate::error::{DiagramError, Result};
use crate::loader::HttpImageLoader;
use crate::pipeline::RenderPipeline;
use crate::present::{PanelBuilder, RemediationLink};
use crate::types::RenderEndpoint;

/// Name of the configuration file looked up by the CLI
pub const CONFIG_FILE_NAME: &str = "umlsketch.toml";

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Request settings
    pub render: RenderSettings,
    /// Rendering servers in the order they are tried
    pub endpoints: Vec<RenderEndpoint>,
    /// Links shown on the error panel
    pub remediation: Vec<RemediationLink>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render: RenderSettings::default(),
            endpoints: RenderEndpoint::defaults(),
            remediation: RemediationLink::defaults(),
        }
    }
}

/// Request tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Timeout of one endpoint attempt, in seconds
    pub timeout_secs: u64,
    /// DEFLATE level used by the encoder (0-9)
    pub compression_level: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            compression_level: 9,
        }
    }
}

impl RenderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Parse settings from a TOML string and validate them
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(toml_str)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load settings from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            log::debug!("Loading config: {}", path.display());
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(DiagramError::InvalidConfig(
                "at least one [[endpoints]] entry is required".to_string(),
            ));
        }
        if self.render.timeout_secs == 0 {
            return Err(DiagramError::InvalidConfig(
                "render.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.render.compression_level > 9 {
            return Err(DiagramError::InvalidConfig(format!(
                "render.compression_level must be 0-9, got {}",
                self.render.compression_level
            )));
        }
        Ok(())
    }

    /// Build the default encoder with the configured level
    pub fn encoder(&self) -> PlantUmlEncoder {
        PlantUmlEncoder::new().with_level(self.render.compression_level)
    }

    /// Build an HTTP-backed pipeline from these settings
    pub fn pipeline(&self) -> Result<RenderPipeline> {
        let loader = HttpImageLoader::with_timeout(self.render.timeout())?;
        Ok(RenderPipeline::new(
            Some(Arc::new(self.encoder())),
            Arc::new(loader),
            self.endpoints.clone(),
        )?
        .with_attempt_timeout(self.render.timeout()))
    }

    /// Panel builder using the configured remediation links
    pub fn panels(&self) -> PanelBuilder {
        PanelBuilder::new(self.remediation.clone())
    }
}
