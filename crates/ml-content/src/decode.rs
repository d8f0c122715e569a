//! Byte-order-mark aware text decoding.
//!
//! Resources without a BOM are read as UTF-8. Malformed sequences are replaced
//! with U+FFFD rather than rejected, so a damaged resource still yields text.

/// Text encoding announced by a byte order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl TextEncoding {
    /// Detect the encoding from a leading byte order mark.
    ///
    /// Returns the encoding and the length of the mark (0 when absent).
    #[must_use]
    pub fn detect(bytes: &[u8]) -> (Self, usize) {
        match bytes {
            [0xEF, 0xBB, 0xBF, ..] => (Self::Utf8, 3),
            [0xFF, 0xFE, ..] => (Self::Utf16Le, 2),
            [0xFE, 0xFF, ..] => (Self::Utf16Be, 2),
            _ => (Self::Utf8, 0),
        }
    }
}

/// Decode resource bytes into text, honouring a leading BOM.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    let (encoding, bom_len) = TextEncoding::detect(bytes);
    let body = &bytes[bom_len..];

    match encoding {
        TextEncoding::Utf8 => String::from_utf8_lossy(body).into_owned(),
        TextEncoding::Utf16Le => decode_utf16(body, u16::from_le_bytes),
        TextEncoding::Utf16Be => decode_utf16(body, u16::from_be_bytes),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let chunks = bytes.chunks_exact(2);
    let dangling = !chunks.remainder().is_empty();

    let mut text: String = char::decode_utf16(chunks.map(|chunk| unit([chunk[0], chunk[1]])))
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}
