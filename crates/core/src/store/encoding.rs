//! Text encodings supported for stored blobs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Text encoding applied when writing and reading text blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1: one byte per code point, U+0000 through U+00FF.
    Latin1,
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// Encode text to bytes.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if a character has no representation
    /// in this encoding.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, Error> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c))
                        .map_err(|_| Error::InvalidInput(format!("{c:?} is not representable in latin-1")))
                })
                .collect(),
        }
    }

    /// Decode bytes into text, or `None` if they are invalid for this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_rejects_invalid_bytes() {
        assert_eq!(TextEncoding::Utf8.decode(&[0xff, 0xfe]), None);
        assert_eq!(TextEncoding::Utf8.decode("Pokémon".as_bytes()).as_deref(), Some("Pokémon"));
    }

    #[test]
    fn test_latin1_single_byte_per_char() {
        let bytes = TextEncoding::Latin1.encode("Pokémon").unwrap();
        assert_eq!(bytes.len(), 7);
        assert_eq!(bytes[4], 0xe9);
        assert_eq!(TextEncoding::Latin1.decode(&bytes).as_deref(), Some("Pokémon"));
    }

    #[test]
    fn test_latin1_rejects_wide_chars() {
        let result = TextEncoding::Latin1.encode("ポケモン");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
