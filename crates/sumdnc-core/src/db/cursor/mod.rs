//! Module: cursor
//! Responsibility: continuation token minting and validation.
//! Does not own: store traversal or page assembly.

mod error;
mod signature;
mod token;

pub use error::CursorError;
pub use signature::ContinuationSignature;
pub use token::{ContinuationToken, TokenWireError};

use crate::{error::InternalError, traits::EntityKind};

/// Decode an optional caller cursor into the anchor id to resume after.
pub(crate) fn prepare_cursor<E: EntityKind>(
    cursor: Option<&str>,
    expected: ContinuationSignature,
) -> Result<Option<String>, CursorError> {
    let Some(text) = cursor else {
        return Ok(None);
    };

    let token = ContinuationToken::parse_text(text)?;
    if token.signature() != expected {
        return Err(CursorError::SignatureMismatch {
            entity_path: E::PATH,
            expected: expected.to_string(),
            actual: token.signature().to_string(),
        });
    }

    Ok(Some(token.anchor_id().to_string()))
}

/// Mint the opaque continuation text for the last row of a page.
pub(crate) fn next_cursor(
    signature: ContinuationSignature,
    anchor_id: &str,
) -> Result<String, InternalError> {
    ContinuationToken::new(signature, anchor_id)
        .to_text()
        .map_err(|err| InternalError::serialize_internal(err.to_string()))
}
