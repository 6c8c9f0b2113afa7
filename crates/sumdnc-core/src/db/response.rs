//! Module: response
//! Responsibility: page payloads returned by listing.

///
/// Page
///
/// One bounded slice of an ordered, filtered collection.
/// `next_cursor` is opaque and valid for one follow-up call; its absence
/// means no further rows matched at the time of the call.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<E> {
    pub items: Vec<E>,
    pub next_cursor: Option<String>,
}

impl<E> Page<E> {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Project every item, keeping the continuation cursor.
    /// The first error discards the page.
    pub fn try_map<T, Err>(self, f: impl FnMut(E) -> Result<T, Err>) -> Result<Page<T>, Err> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            next_cursor: self.next_cursor,
        })
    }
}
