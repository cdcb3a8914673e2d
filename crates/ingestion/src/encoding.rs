//! Text encodings accepted for uploaded tables.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::IngestionError;

/// A supported input encoding.
///
/// Latin-1 and ISO-8859-1 are the same byte-to-code-point mapping; both are
/// accepted so either label can appear in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    /// UTF-16 with byte order taken from the BOM, little endian without one
    #[serde(rename = "utf-16")]
    Utf16,
    #[serde(rename = "utf-16-be")]
    Utf16Be,
    #[serde(rename = "utf-16-le")]
    Utf16Le,
    #[serde(rename = "latin-1")]
    Latin1,
    #[serde(rename = "iso-8859-1")]
    Iso8859_1,
}

impl TextEncoding {
    /// Every encoding in the order they are tried.
    pub const ALL: [TextEncoding; 6] = [
        TextEncoding::Utf8,
        TextEncoding::Utf16,
        TextEncoding::Utf16Be,
        TextEncoding::Utf16Le,
        TextEncoding::Latin1,
        TextEncoding::Iso8859_1,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16 => "utf-16",
            TextEncoding::Utf16Be => "utf-16-be",
            TextEncoding::Utf16Le => "utf-16-le",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Iso8859_1 => "iso-8859-1",
        }
    }

    /// Whether the encoding uses two bytes per code unit.
    pub fn is_wide(&self) -> bool {
        matches!(
            self,
            TextEncoding::Utf16 | TextEncoding::Utf16Be | TextEncoding::Utf16Le
        )
    }

    /// Strictly decode `bytes`, returning `None` on any malformed sequence.
    ///
    /// A leading byte order mark is removed. The single-byte encodings never
    /// fail.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            TextEncoding::Utf8 => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                strict(UTF_8, body)
            }
            TextEncoding::Utf16 => {
                if let Some(body) = bytes.strip_prefix(b"\xFF\xFE") {
                    strict(UTF_16LE, body)
                } else if let Some(body) = bytes.strip_prefix(b"\xFE\xFF") {
                    strict(UTF_16BE, body)
                } else {
                    strict(UTF_16LE, bytes)
                }
            }
            TextEncoding::Utf16Be => strict(UTF_16BE, bytes).map(strip_bom),
            TextEncoding::Utf16Le => strict(UTF_16LE, bytes).map(strip_bom),
            TextEncoding::Latin1 | TextEncoding::Iso8859_1 => {
                Some(encoding_rs::mem::decode_latin1(bytes))
            }
        }
    }
}

fn strict<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}

fn strip_bom(text: Cow<'_, str>) -> Cow<'_, str> {
    if text.starts_with('\u{FEFF}') {
        Cow::Owned(text['\u{FEFF}'.len_utf8()..].to_string())
    } else {
        text
    }
}

impl FromStr for TextEncoding {
    type Err = IngestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-16" | "utf16" => Ok(TextEncoding::Utf16),
            "utf-16-be" | "utf-16be" => Ok(TextEncoding::Utf16Be),
            "utf-16-le" | "utf-16le" => Ok(TextEncoding::Utf16Le),
            "latin-1" | "latin1" => Ok(TextEncoding::Latin1),
            "iso-8859-1" => Ok(TextEncoding::Iso8859_1),
            _ => Err(IngestionError::UnknownEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
