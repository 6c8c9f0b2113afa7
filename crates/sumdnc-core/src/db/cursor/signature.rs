use crate::{
    db::{
        codec::cursor::encode_cursor,
        predicate::{Predicate, hash_predicate, write_str},
    },
    traits::EntityKind,
};
use sha2::{Digest, Sha256};
use std::fmt;

// Bumped whenever the canonical order or fingerprint layout changes, so
// tokens minted under an older layout stop matching.
const SIGNATURE_DOMAIN: &str = "sumdnc:continuation:created_at-desc:id-asc:v1";

///
/// ContinuationSignature
///
/// Stable hash of the continuation-relevant query shape: entity path,
/// canonical order, and filter. Excludes `limit` and the cursor itself.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ContinuationSignature([u8; 32]);

impl ContinuationSignature {
    #[must_use]
    pub fn for_query<E: EntityKind>(predicate: &Predicate) -> Self {
        let mut hasher = Sha256::new();
        write_str(&mut hasher, SIGNATURE_DOMAIN);
        write_str(&mut hasher, E::PATH);
        hash_predicate(&mut hasher, predicate);

        Self(hasher.finalize().into())
    }

    pub(crate) const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub(crate) const fn into_bytes(self) -> [u8; 32] {
        self.0
    }

    #[must_use]
    pub fn as_hex(&self) -> String {
        encode_cursor(&self.0)
    }
}

impl fmt::Display for ContinuationSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}
