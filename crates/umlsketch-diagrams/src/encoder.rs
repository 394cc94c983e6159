//! Encoding capability for diagram source
//!
//! The pipeline treats encoding as an external capability behind the
//! [`DiagramEncoder`] trait and never looks inside the token it returns.
//! [`PlantUmlEncoder`] is the default capability: raw DEFLATE followed by
//! PlantUML's own 64-character alphabet, the format PlantUML servers accept
//! in `/png/<token>` URLs.

use std::io::Write;

use base64::alphabet::Alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD};
use base64::Engine;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::EncodeError;
use crate::types::{DiagramSource, EncodedPayload};

/// PlantUML's URL alphabet (digits first, unlike standard base64)
const PLANTUML_ALPHABET: Alphabet =
    match Alphabet::new("0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_") {
        Ok(alphabet) => alphabet,
        Err(_) => panic!("invalid PlantUML alphabet"),
    };

const PLANTUML_ENGINE: GeneralPurpose = GeneralPurpose::new(&PLANTUML_ALPHABET, NO_PAD);

/// Transform from diagram source to a URL token
///
/// # Thread Safety
///
/// Encoders must be `Send + Sync`; one instance is shared by every render.
pub trait DiagramEncoder: Send + Sync {
    /// Human-readable name of this encoder
    fn name(&self) -> &'static str;

    /// Whether the capability is loaded and usable
    fn is_available(&self) -> bool {
        true
    }

    /// Encode the source into an opaque token
    fn encode(&self, source: &DiagramSource) -> Result<EncodedPayload, EncodeError>;
}

/// PlantUML text encoding: deflate, then 6-bit groups over the PlantUML alphabet
#[derive(Debug, Clone, Copy)]
pub struct PlantUmlEncoder {
    level: Compression,
}

impl Default for PlantUmlEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlantUmlEncoder {
    /// Create an encoder using maximum compression (shortest URLs)
    pub fn new() -> Self {
        Self {
            level: Compression::best(),
        }
    }

    /// Set the DEFLATE compression level (0-9)
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Compression::new(level.min(9));
        self
    }

    /// Encode raw text (deflate + PlantUML base64)
    pub fn encode_text(&self, text: &str) -> Result<String, EncodeError> {
        let mut encoder = DeflateEncoder::new(Vec::new(), self.level);
        encoder
            .write_all(text.as_bytes())
            .map_err(|e| EncodeError::new(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| EncodeError::new(e.to_string()))?;

        let mut token = PLANTUML_ENGINE.encode(&compressed);
        // Partial trailing groups are emitted as full four-character groups
        // with zero bits; '0' is the zero symbol of this alphabet.
        while token.len() % 4 != 0 {
            token.push('0');
        }
        Ok(token)
    }
}

impl DiagramEncoder for PlantUmlEncoder {
    fn name(&self) -> &'static str {
        "plantuml-deflate"
    }

    fn encode(&self, source: &DiagramSource) -> Result<EncodedPayload, EncodeError> {
        self.encode_text(source.as_str()).map(EncodedPayload::new)
    }
}

/// Decode a PlantUML token back to text
pub fn decode_token(token: &str) -> Result<String, EncodeError> {
    use std::io::Read;

    let compressed = PLANTUML_ENGINE
        .decode(token)
        .map_err(|e| EncodeError::new(format!("invalid token: {}", e)))?;
    let mut decoder = flate2::read::DeflateDecoder::new(compressed.as_slice());
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .map_err(|e| EncodeError::new(format!("invalid token: {}", e)))?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "@startuml\nAlice -> Bob: hello\nBob --> Alice: hi!\n@enduml";

    #[test]
    fn test_token_uses_plantuml_alphabet() {
        let token = PlantUmlEncoder::new().encode_text(SAMPLE).unwrap();

        assert!(!token.is_empty());
        assert_eq!(token.len() % 4, 0);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let encoder = PlantUmlEncoder::new();
        let a = encoder.encode(&DiagramSource::from(SAMPLE)).unwrap();
        let b = encoder.encode(&DiagramSource::from(SAMPLE)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_token_decodes_to_source() {
        let token = PlantUmlEncoder::new().encode_text(SAMPLE).unwrap();
        assert_eq!(decode_token(&token).unwrap(), SAMPLE);
    }

    #[test]
    fn test_unicode_source() {
        let text = "@startuml\nAlicia -> Bob: ¿qué tal? 🎉\n@enduml";
        let token = PlantUmlEncoder::new().encode_text(text).unwrap();
        assert_eq!(decode_token(&token).unwrap(), text);
    }

    #[test]
    fn test_decodes_token_from_plantuml_server() {
        // Token from the PlantUML text encoding documentation
        let text = decode_token("SyfFKj2rKt3CoKnELR1Io4ZDoSa70000").unwrap();
        assert_eq!(text, "Bob -> Alice : hello");
    }

    #[test]
    fn test_alphabet_starts_with_digits() {
        // Empty deflate stream 03 00: 000000 110000 0000 -> "0m0"
        let compressed = [0x03, 0x00];
        assert_eq!(PLANTUML_ENGINE.encode(compressed), "0m0");

        assert_eq!(decode_token("0m00").unwrap(), "");
    }

    #[test]
    fn test_decode_rejects_foreign_symbols() {
        assert!(decode_token("abc+/=").is_err());
    }

    #[test]
    fn test_encoder_available_by_default() {
        assert!(PlantUmlEncoder::default().is_available());
        assert_eq!(PlantUmlEncoder::default().name(), "plantuml-deflate");
    }
}
