//! Type definitions for diagram rendering
//!
//! This module defines the values that flow through one render request:
//! the diagram source, the encoded payload, endpoints and surface tags.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{DiagramError, Result};

/// Marker that must open a PlantUML diagram
pub const START_MARKER: &str = "@startuml";

/// Marker that must close a PlantUML diagram
pub const END_MARKER: &str = "@enduml";

/// Placeholder substituted with the encoded payload in endpoint templates
pub const TOKEN_PLACEHOLDER: &str = "{token}";

/// Raw diagram text submitted for rendering
///
/// Immutable once created; clones share the same buffer so the pipeline,
/// the outcome and a retry ticket can all hold it cheaply.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagramSource(Arc<str>);

impl DiagramSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Arc::from(text.into()))
    }

    /// The text exactly as submitted
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the text is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for DiagramSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for DiagramSource {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for DiagramSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque token produced by an encoder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A rendering server, described by a URL template
///
/// The template must contain `{token}` exactly where the encoded payload
/// goes, e.g. `https://www.plantuml.com/plantuml/png/{token}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EndpointSpec", into = "EndpointSpec")]
pub struct RenderEndpoint {
    name: String,
    template: String,
}

#[derive(Serialize, Deserialize)]
struct EndpointSpec {
    name: String,
    template: String,
}

impl TryFrom<EndpointSpec> for RenderEndpoint {
    type Error = DiagramError;

    fn try_from(spec: EndpointSpec) -> Result<Self> {
        RenderEndpoint::new(spec.name, spec.template)
    }
}

impl From<RenderEndpoint> for EndpointSpec {
    fn from(endpoint: RenderEndpoint) -> Self {
        Self {
            name: endpoint.name,
            template: endpoint.template,
        }
    }
}

impl RenderEndpoint {
    /// Create an endpoint, rejecting templates without a `{token}` slot
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let template = template.into().trim().to_string();

        if !template.contains(TOKEN_PLACEHOLDER) {
            return Err(DiagramError::InvalidEndpoint {
                name,
                reason: format!("template must contain {}", TOKEN_PLACEHOLDER),
            });
        }
        if !(template.starts_with("http://") || template.starts_with("https://")) {
            return Err(DiagramError::InvalidEndpoint {
                name,
                reason: "template must be an http(s) URL".to_string(),
            });
        }

        Ok(Self { name, template })
    }

    /// Official PlantUML server
    pub fn plantuml_official() -> Self {
        Self {
            name: "plantuml.com".to_string(),
            template: "https://www.plantuml.com/plantuml/png/{token}".to_string(),
        }
    }

    /// Community mirror used as the default fallback
    pub fn plantuml_mirror() -> Self {
        Self {
            name: "kkeisuke mirror".to_string(),
            template: "https://plantuml-server.kkeisuke.com/png/{token}".to_string(),
        }
    }

    /// Default ordered endpoint list: official server, then the mirror
    pub fn defaults() -> Vec<Self> {
        vec![Self::plantuml_official(), Self::plantuml_mirror()]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Build the image URL for a payload
    pub fn url_for(&self, payload: &EncodedPayload) -> String {
        self.template.replace(TOKEN_PLACEHOLDER, payload.as_str())
    }
}

impl fmt::Display for RenderEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.template)
    }
}

/// Identifier of an output surface (one preview area)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ticket issued for each render request on a surface
///
/// Tickets increase monotonically per surface; only the latest one may
/// write to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_substitution() {
        let endpoint = RenderEndpoint::new("local", "http://localhost:8080/png/{token}").unwrap();
        let url = endpoint.url_for(&EncodedPayload::new("ABC123"));
        assert_eq!(url, "http://localhost:8080/png/ABC123");
    }

    #[test]
    fn test_endpoint_requires_placeholder() {
        let err = RenderEndpoint::new("broken", "https://example.com/png/").unwrap_err();
        assert!(matches!(err, DiagramError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_endpoint_requires_http_scheme() {
        assert!(RenderEndpoint::new("ftp", "ftp://example.com/{token}").is_err());
    }

    #[test]
    fn test_default_endpoints_order() {
        let endpoints = RenderEndpoint::defaults();
        assert_eq!(endpoints.len(), 2);
        assert!(endpoints[0].template().starts_with("https://www.plantuml.com/"));
        assert!(endpoints[1].template().contains("kkeisuke"));
    }

    #[test]
    fn test_endpoint_deserialize_validates() {
        let ok: RenderEndpoint =
            serde_json::from_str(r#"{"name":"a","template":"https://a.test/png/{token}"}"#).unwrap();
        assert_eq!(ok.name(), "a");

        let bad = serde_json::from_str::<RenderEndpoint>(r#"{"name":"b","template":"https://b.test/"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_source_blank() {
        assert!(DiagramSource::from("  \n\t").is_blank());
        assert!(!DiagramSource::from("@startuml").is_blank());
    }

    #[test]
    fn test_request_id_ordering() {
        assert!(RequestId::new(2) > RequestId::new(1));
        assert_eq!(RequestId::new(7).to_string(), "#7");
    }
}
