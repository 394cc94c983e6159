//! Input validation for diagram source
//!
//! Gates obviously malformed input before any encoding or network work.
//! Passing validation does not promise the server will render the diagram.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{DiagramSource, END_MARKER, START_MARKER};

/// A structural problem in submitted diagram source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    /// Source is empty or whitespace only
    Empty,
    /// `@startuml` is missing
    MissingStartMarker,
    /// `@enduml` is missing
    MissingEndMarker,
    /// `@enduml` appears before the first `@startuml`
    MarkersOutOfOrder,
}

impl ValidationError {
    /// Stable diagnostic code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "PUML001",
            Self::MissingStartMarker => "PUML002",
            Self::MissingEndMarker => "PUML003",
            Self::MarkersOutOfOrder => "PUML004",
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        match self {
            Self::Empty => "diagram source must not be empty".to_string(),
            Self::MissingStartMarker => format!("diagram must begin with {}", START_MARKER),
            Self::MissingEndMarker => format!("diagram must end with {}", END_MARKER),
            Self::MarkersOutOfOrder => {
                format!("{} must come after {}", END_MARKER, START_MARKER)
            }
        }
    }

    /// Suggested fix
    pub fn help(&self) -> String {
        match self {
            Self::Empty => format!("start from a skeleton: {}\\n\\n{}", START_MARKER, END_MARKER),
            Self::MissingStartMarker => format!("add {} as the first line", START_MARKER),
            Self::MissingEndMarker => format!("add {} as the last line", END_MARKER),
            Self::MarkersOutOfOrder => format!(
                "move {} to the top and {} to the bottom",
                START_MARKER, END_MARKER
            ),
        }
    }

    /// Convert into a serializable diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            code: self.code().to_string(),
            message: self.message(),
            help: Some(self.help()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Validation finding in the shape the CLI reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable code, e.g. "PUML002"
    pub code: String,
    /// The diagnostic message
    pub message: String,
    /// Suggested fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Check that `source` is worth sending to the pipeline
///
/// Blank input yields exactly one [`ValidationError::Empty`] and no other
/// checks run. An empty list means the source may be rendered.
pub fn validate(source: &DiagramSource) -> Vec<ValidationError> {
    if source.is_blank() {
        return vec![ValidationError::Empty];
    }

    let text = source.as_str();
    let start = text.find(START_MARKER);
    let end = text.rfind(END_MARKER);

    let mut errors = Vec::new();
    if start.is_none() {
        errors.push(ValidationError::MissingStartMarker);
    }
    if end.is_none() {
        errors.push(ValidationError::MissingEndMarker);
    }
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.push(ValidationError::MarkersOutOfOrder);
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> Vec<ValidationError> {
        validate(&DiagramSource::from(text))
    }

    #[test]
    fn test_valid_source() {
        assert!(check("@startuml\nAlice -> Bob: hi\n@enduml").is_empty());
    }

    #[test]
    fn test_bare_skeleton_is_valid() {
        assert!(check("@startuml\n@enduml").is_empty());
    }

    #[test]
    fn test_empty_short_circuits() {
        assert_eq!(check(""), vec![ValidationError::Empty]);
        assert_eq!(check("   \n  "), vec![ValidationError::Empty]);
    }

    #[test]
    fn test_missing_markers() {
        assert_eq!(check("Alice -> Bob\n@enduml"), vec![ValidationError::MissingStartMarker]);
        assert_eq!(check("@startuml\nAlice -> Bob"), vec![ValidationError::MissingEndMarker]);
        assert_eq!(
            check("Alice -> Bob"),
            vec![ValidationError::MissingStartMarker, ValidationError::MissingEndMarker]
        );
    }

    #[test]
    fn test_markers_out_of_order() {
        assert_eq!(check("@enduml\nA -> B\n@startuml"), vec![ValidationError::MarkersOutOfOrder]);
    }

    #[test]
    fn test_diagnostic_shape() {
        let diag = ValidationError::MissingEndMarker.to_diagnostic();
        assert_eq!(diag.code, "PUML003");
        assert_eq!(diag.message, "diagram must end with @enduml");
        assert!(diag.help.is_some());

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"code\":\"PUML003\""));
    }
}
