//! Payload text decoding
//!
//! Print jobs arrive as text. This module turns that text back into the raw
//! byte stream that goes to the spooler:
//! - Hex with optional space/hyphen separators (`"1B 40"`, `"1B-40"`)
//! - Standard base64 with padding
//!
//! Decoding is strict: any malformed input yields [`PrintError::MalformedInput`]
//! and no bytes at all.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::{PrintError, PrintResult};

/// Text encoding of an incoming payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    Hex,
    Base64,
}

impl PayloadEncoding {
    /// Decode `text` according to this encoding
    pub fn decode(self, text: &str) -> PrintResult<Vec<u8>> {
        match self {
            PayloadEncoding::Hex => decode_hex(text),
            PayloadEncoding::Base64 => decode_base64(text),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PayloadEncoding::Hex => "hex",
            PayloadEncoding::Base64 => "base64",
        }
    }
}

impl std::fmt::Display for PayloadEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode a hex string, ignoring space and hyphen separators
///
/// An empty string decodes to an empty buffer.
pub fn decode_hex(text: &str) -> PrintResult<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| *c != ' ' && *c != '-').collect();

    hex::decode(&cleaned).map_err(|e| match e {
        hex::FromHexError::OddLength => {
            PrintError::MalformedInput("Invalid HEX string length".to_string())
        }
        hex::FromHexError::InvalidHexCharacter { index, .. } => {
            // Report the whole pair the bad digit belongs to
            let start = index - index % 2;
            let segment = cleaned
                .get(start..start + 2)
                .or_else(|| cleaned.get(start..))
                .unwrap_or_default();
            PrintError::MalformedInput(format!("Invalid HEX segment '{}'", segment))
        }
        other => PrintError::MalformedInput(other.to_string()),
    })
}

/// Decode standard (padded) base64
///
/// ASCII whitespace is ignored so that line-wrapped payloads decode.
/// Blank input is rejected.
pub fn decode_base64(text: &str) -> PrintResult<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    if cleaned.is_empty() {
        return Err(PrintError::MalformedInput("Empty Base64 string".to_string()));
    }

    STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| PrintError::MalformedInput(format!("Invalid Base64: {}", e)))
}
