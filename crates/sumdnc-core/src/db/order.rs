use crate::{traits::EntityKind, types::Timestamp};
use std::cmp::Ordering;

///
/// OrderKey
///
/// Canonical listing position of one row: `created_at` descending, then
/// `id` ascending. The id tiebreak makes the order total, which is what
/// keeps cursor pagination deterministic when timestamps collide.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct OrderKey {
    created_at: Timestamp,
    id: String,
}

impl OrderKey {
    pub fn new(created_at: Timestamp, id: impl Into<String>) -> Self {
        Self {
            created_at,
            id: id.into(),
        }
    }

    pub fn of<E: EntityKind>(entity: &E) -> Self {
        Self::new(entity.created_at(), entity.id())
    }

    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .created_at
            .cmp(&self.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
