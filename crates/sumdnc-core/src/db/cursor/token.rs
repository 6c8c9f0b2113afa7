use crate::{
    db::{
        codec::cursor::{decode_cursor, encode_cursor},
        cursor::{ContinuationSignature, CursorError},
    },
    serialize::{deserialize_bounded, serialize},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

const MAX_CONTINUATION_TOKEN_BYTES: usize = 4 * 1024;

///
/// CursorTokenVersion
///
/// Wire-level token version. Version parsing stays here so compatibility
/// behavior has one home.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CursorTokenVersion {
    V1,
}

impl CursorTokenVersion {
    const V1_TAG: u8 = 1;

    const fn decode(raw: u8) -> Option<Self> {
        match raw {
            Self::V1_TAG => Some(Self::V1),
            _ => None,
        }
    }

    const fn encode(self) -> u8 {
        match self {
            Self::V1 => Self::V1_TAG,
        }
    }
}

///
/// ContinuationTokenWire
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
struct ContinuationTokenWire {
    version: u8,
    signature: [u8; 32],
    anchor_id: String,
}

///
/// TokenWireError
/// Cursor token wire encode/decode failures.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TokenWireError {
    #[error("failed to encode cursor token: {0}")]
    Encode(String),

    #[error("failed to decode cursor token: {0}")]
    Decode(String),

    #[error("unsupported cursor token version: {version}")]
    UnsupportedVersion { version: u8 },
}

///
/// ContinuationToken
///
/// Opaque cursor payload: the id of the last row returned, bound to the
/// signature of the query that produced it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContinuationToken {
    signature: ContinuationSignature,
    anchor_id: String,
}

impl ContinuationToken {
    pub fn new(signature: ContinuationSignature, anchor_id: impl Into<String>) -> Self {
        Self {
            signature,
            anchor_id: anchor_id.into(),
        }
    }

    #[must_use]
    pub const fn signature(&self) -> ContinuationSignature {
        self.signature
    }

    #[must_use]
    pub fn anchor_id(&self) -> &str {
        &self.anchor_id
    }

    pub fn encode(&self) -> Result<Vec<u8>, TokenWireError> {
        self.encode_with_version(CursorTokenVersion::V1.encode())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, TokenWireError> {
        let wire: ContinuationTokenWire = deserialize_bounded(bytes, MAX_CONTINUATION_TOKEN_BYTES)
            .map_err(|err| TokenWireError::Decode(err.to_string()))?;

        // Version first, so an unknown layout is reported as such.
        CursorTokenVersion::decode(wire.version).ok_or(TokenWireError::UnsupportedVersion {
            version: wire.version,
        })?;

        if wire.anchor_id.is_empty() {
            return Err(TokenWireError::Decode("anchor id is empty".to_string()));
        }

        Ok(Self::new(
            ContinuationSignature::from_bytes(wire.signature),
            wire.anchor_id,
        ))
    }

    /// Encode to the opaque text form handed to callers.
    pub fn to_text(&self) -> Result<String, TokenWireError> {
        self.encode().map(|bytes| encode_cursor(&bytes))
    }

    /// Parse the opaque text form.
    pub fn parse_text(text: &str) -> Result<Self, CursorError> {
        let bytes = decode_cursor(text).map_err(CursorError::InvalidToken)?;

        Self::decode(&bytes).map_err(CursorError::from_token_wire_error)
    }

    fn encode_with_version(&self, version: u8) -> Result<Vec<u8>, TokenWireError> {
        let wire = ContinuationTokenWire {
            version,
            signature: self.signature.into_bytes(),
            anchor_id: self.anchor_id.clone(),
        };

        serialize(&wire).map_err(|err| TokenWireError::Encode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{codec::cursor::CursorDecodeError, predicate::Predicate};
    use crate::test_support::TestRow;

    fn token(anchor: &str) -> ContinuationToken {
        ContinuationToken::new(
            ContinuationSignature::for_query::<TestRow>(&Predicate::True),
            anchor,
        )
    }

    #[test]
    fn text_form_is_lowercase_hex_and_parses_back() {
        let original = token("row-10");
        let text = original.to_text().expect("token should encode");

        assert!(
            text.chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
        let parsed = ContinuationToken::parse_text(&text).expect("token text should parse");
        assert_eq!(parsed, original);
        assert_eq!(parsed.anchor_id(), "row-10");
    }

    #[test]
    fn parse_text_rejects_non_hex_input() {
        let err = ContinuationToken::parse_text("row-10").expect_err("raw ids are not tokens");
        assert!(matches!(
            err,
            CursorError::InvalidToken(CursorDecodeError::InvalidHex { .. })
        ));
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let bytes = token("a")
            .encode_with_version(9)
            .expect("test token should encode");
        let err = ContinuationToken::decode(&bytes).expect_err("version 9 is unknown");

        assert_eq!(err, TokenWireError::UnsupportedVersion { version: 9 });
    }

    #[test]
    fn decode_rejects_garbage_and_empty_anchor() {
        let err = ContinuationToken::decode(&[0x01, 0x02]).expect_err("garbage should fail");
        assert!(matches!(err, TokenWireError::Decode(_)));

        let bytes = token("").encode().expect("test token should encode");
        let err = ContinuationToken::decode(&bytes).expect_err("empty anchor should fail");
        assert!(matches!(err, TokenWireError::Decode(_)));
    }
}
