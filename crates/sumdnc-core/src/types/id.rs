use crate::types::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use ulid::Ulid;

/// Build a ULID string from a creation time and a caller-chosen entropy value.
///
/// ULIDs sort by their timestamp prefix, so ids minted for later rows also
/// compare greater as strings when the millisecond differs.
#[must_use]
pub fn new_id(created_at: Timestamp, entropy: u128) -> String {
    Ulid::from_parts(created_at.as_millis(), entropy).to_string()
}

///
/// IdGenerator
///
/// Process-local id source. Entropy is a monotonically increasing counter,
/// so ids minted within the same millisecond stay unique and ordered.
///

#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    pub fn next(&self, created_at: Timestamp) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);

        new_id(created_at, u128::from(seq))
    }
}
