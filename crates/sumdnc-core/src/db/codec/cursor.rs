//! Text form of continuation tokens: lowercase hex over the binary payload.
//! Only encoding lives here; token semantics belong to `db::cursor`.

// Decode bound for untrusted cursor text.
pub(crate) const MAX_CURSOR_TOKEN_HEX_LEN: usize = 8 * 1024;

///
/// CursorDecodeError
///

#[derive(Clone, Debug, Eq, thiserror::Error, PartialEq)]
pub enum CursorDecodeError {
    #[error("cursor token is empty")]
    Empty,

    #[error("cursor token exceeds max length: {len} hex chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("cursor token must have an even number of hex characters")]
    OddLength,

    #[error("invalid hex character at position {position}")]
    InvalidHex { position: usize },
}

#[must_use]
pub(crate) fn encode_cursor(bytes: &[u8]) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Decode hex cursor text, tolerating surrounding whitespace and either case.
pub(crate) fn decode_cursor(token: &str) -> Result<Vec<u8>, CursorDecodeError> {
    let token = token.trim();

    if token.is_empty() {
        return Err(CursorDecodeError::Empty);
    }
    if token.len() > MAX_CURSOR_TOKEN_HEX_LEN {
        return Err(CursorDecodeError::TooLong {
            len: token.len(),
            max: MAX_CURSOR_TOKEN_HEX_LEN,
        });
    }
    if !token.len().is_multiple_of(2) {
        return Err(CursorDecodeError::OddLength);
    }

    token
        .as_bytes()
        .chunks_exact(2)
        .enumerate()
        .map(|(pair, chunk)| {
            let position = pair * 2;
            let hi = decode_hex_nibble(chunk[0])
                .ok_or(CursorDecodeError::InvalidHex { position: position + 1 })?;
            let lo = decode_hex_nibble(chunk[1])
                .ok_or(CursorDecodeError::InvalidHex { position: position + 2 })?;

            Ok((hi << 4) | lo)
        })
        .collect()
}

const fn decode_hex_nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
