use crate::{
    db::{codec::cursor::CursorDecodeError, cursor::TokenWireError},
    error::InternalError,
};
use thiserror::Error as ThisError;

///
/// CursorError
///
/// Continuation token validation failures. All of them are caller errors:
/// a token that does not decode, or that was minted for a different query.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CursorError {
    /// Cursor text could not be decoded.
    #[error("invalid continuation cursor: {0}")]
    InvalidToken(CursorDecodeError),

    /// Cursor payload is invalid after text decode.
    #[error("invalid continuation cursor: {reason}")]
    InvalidPayload { reason: String },

    /// Cursor token version is unsupported.
    #[error("unsupported continuation cursor version: {version}")]
    VersionMismatch { version: u8 },

    /// Cursor was minted for another entity or filter.
    #[error(
        "continuation cursor does not match query signature for '{entity_path}': expected={expected}, actual={actual}"
    )]
    SignatureMismatch {
        entity_path: &'static str,
        expected: String,
        actual: String,
    },
}

impl CursorError {
    pub(crate) fn from_token_wire_error(err: TokenWireError) -> Self {
        match err {
            TokenWireError::Encode(reason) | TokenWireError::Decode(reason) => {
                Self::InvalidPayload { reason }
            }
            TokenWireError::UnsupportedVersion { version } => Self::VersionMismatch { version },
        }
    }
}

impl From<CursorError> for InternalError {
    fn from(err: CursorError) -> Self {
        Self::cursor_validation(err.to_string())
    }
}
