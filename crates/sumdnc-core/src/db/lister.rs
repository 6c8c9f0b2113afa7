//! Module: lister
//! Responsibility: cursor-paginated listing over a `Store`.
//! Does not own: storage traversal, token wire format, or retries.
//!
//! Each call validates its inputs, resolves the cursor anchor, and performs
//! exactly one store range read of `limit + 1` rows. The extra row is only a
//! lookahead: it decides whether a continuation cursor is emitted and is
//! never returned.

use crate::{
    db::{
        cursor::{self, ContinuationSignature, CursorError},
        predicate::{Predicate, PredicateError},
        response::Page,
        store::{RangeQuery, Store, StoreError},
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
    obs::sink::{self, ListSpan, MetricsEvent},
    traits::EntityKind,
};
use std::marker::PhantomData;
use thiserror::Error as ThisError;

/// Page size used when the caller omits `limit`.
pub const DEFAULT_LIMIT: u32 = 10;

/// Smallest accepted page size.
pub const MIN_LIMIT: u32 = 1;

/// Largest accepted page size.
pub const MAX_LIMIT: u32 = 100;

///
/// PagePolicy
///
/// Limit defaults and bounds. The maximum may be lowered below
/// `MAX_LIMIT` but never raised above it.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PagePolicy {
    default_limit: u32,
    max_limit: u32,
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PagePolicy {
    pub const DEFAULT: Self = Self {
        default_limit: DEFAULT_LIMIT,
        max_limit: MAX_LIMIT,
    };

    pub const fn new(default_limit: u32, max_limit: u32) -> Result<Self, ListError> {
        if max_limit < MIN_LIMIT || max_limit > MAX_LIMIT {
            return Err(ListError::InvalidPolicy {
                default_limit,
                max_limit,
            });
        }
        if default_limit < MIN_LIMIT || default_limit > max_limit {
            return Err(ListError::InvalidPolicy {
                default_limit,
                max_limit,
            });
        }

        Ok(Self {
            default_limit,
            max_limit,
        })
    }

    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.default_limit
    }

    #[must_use]
    pub const fn max_limit(&self) -> u32 {
        self.max_limit
    }

    /// Apply the default, then reject anything outside `[MIN_LIMIT, max]`.
    /// Out-of-range values are rejected, never clamped.
    pub fn resolve_limit(&self, requested: Option<i64>) -> Result<usize, ListError> {
        let limit = requested.unwrap_or_else(|| i64::from(self.default_limit));

        if limit < i64::from(MIN_LIMIT) || limit > i64::from(self.max_limit) {
            return Err(ListError::LimitOutOfRange {
                limit,
                min: MIN_LIMIT,
                max: self.max_limit,
            });
        }

        usize::try_from(limit).map_err(|_| ListError::LimitOutOfRange {
            limit,
            min: MIN_LIMIT,
            max: self.max_limit,
        })
    }
}

///
/// ListRequest
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListRequest {
    pub limit: Option<i64>,
    pub cursor: Option<String>,
    pub predicate: Predicate,
}

impl ListRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Attach an opaque cursor returned by a previous page.
    #[must_use]
    pub fn cursor(mut self, token: impl Into<String>) -> Self {
        self.cursor = Some(token.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = self.predicate.and(predicate);
        self
    }
}

///
/// ListError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ListError {
    #[error("limit must be between {min} and {max}, got {limit}")]
    LimitOutOfRange { limit: i64, min: u32, max: u32 },

    #[error("invalid page policy: default {default_limit}, max {max_limit}")]
    InvalidPolicy { default_limit: u32, max_limit: u32 },

    #[error(transparent)]
    Predicate(#[from] PredicateError),

    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// The cursor decoded, but the row it points at no longer exists.
    #[error("continuation cursor anchor not found: {entity_path}:{id}")]
    CursorAnchorNotFound {
        entity_path: &'static str,
        id: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl ListError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::LimitOutOfRange { .. }
            | Self::InvalidPolicy { .. }
            | Self::Predicate(_)
            | Self::Cursor(_) => ErrorClass::Validation,
            Self::CursorAnchorNotFound { .. } => ErrorClass::NotFound,
            Self::Store(err) => err.class(),
            Self::Internal(err) => err.class,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::LimitOutOfRange { .. } | Self::InvalidPolicy { .. } | Self::Predicate(_) => {
                ErrorOrigin::Query
            }
            Self::Cursor(_) | Self::CursorAnchorNotFound { .. } => ErrorOrigin::Cursor,
            Self::Store(_) => ErrorOrigin::Store,
            Self::Internal(err) => err.origin,
        }
    }
}

impl From<ListError> for InternalError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::Internal(inner) => inner,
            other => Self::new(other.class(), other.origin(), other.to_string()),
        }
    }
}

///
/// PaginatedLister
///
/// Stateless cursor pagination over one store. Holds no locks between
/// calls and is safe to share across threads whenever the store is.
///

pub struct PaginatedLister<'a, E, S>
where
    E: EntityKind,
    S: Store<E> + ?Sized,
{
    store: &'a S,
    policy: PagePolicy,
    _marker: PhantomData<fn() -> E>,
}

impl<'a, E, S> PaginatedLister<'a, E, S>
where
    E: EntityKind,
    S: Store<E> + ?Sized,
{
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self::with_policy(store, PagePolicy::DEFAULT)
    }

    #[must_use]
    pub const fn with_policy(store: &'a S, policy: PagePolicy) -> Self {
        Self {
            store,
            policy,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> PagePolicy {
        self.policy
    }

    /// Fetch one page. Either a complete page or an error; never partial.
    pub fn list(&self, request: &ListRequest) -> Result<Page<E>, ListError> {
        let mut span = ListSpan::<E>::new();

        let limit = self.policy.resolve_limit(request.limit)?;
        request.predicate.validate::<E>()?;

        let signature = ContinuationSignature::for_query::<E>(&request.predicate);
        let after = cursor::prepare_cursor::<E>(request.cursor.as_deref(), signature)
            .inspect_err(|err| reject_cursor::<E>(&err.to_string()))?;

        let scan = self
            .store
            .range(RangeQuery {
                predicate: &request.predicate,
                after: after.as_deref(),
                take: limit.saturating_add(1),
            })
            .map_err(|err| match (err, after.as_deref()) {
                (StoreError::NotFound { .. }, Some(id)) => {
                    reject_cursor::<E>("anchor row no longer exists");
                    ListError::CursorAnchorNotFound {
                        entity_path: E::PATH,
                        id: id.to_string(),
                    }
                }
                (err, _) => ListError::Store(err),
            })?;

        let mut items = scan.rows;
        let has_more = items.len() > limit;
        let next_cursor = if has_more {
            items.truncate(limit);
            let last = items.last().ok_or_else(|| {
                InternalError::new(
                    ErrorClass::Internal,
                    ErrorOrigin::Query,
                    "lookahead page has no last row",
                )
            })?;
            Some(cursor::next_cursor(signature, last.id())?)
        } else {
            None
        };

        let rows_loaded = u64::try_from(items.len()).unwrap_or(u64::MAX);
        span.set_page(rows_loaded, scan.rows_scanned, has_more);
        tracing::debug!(
            entity = E::PATH,
            limit,
            rows = rows_loaded,
            rows_scanned = scan.rows_scanned,
            has_more,
            "listed page"
        );

        Ok(Page { items, next_cursor })
    }
}

fn reject_cursor<E: EntityKind>(reason: &str) {
    sink::record(MetricsEvent::CursorRejected {
        entity_path: E::PATH,
    });
    tracing::warn!(entity = E::PATH, reason, "rejected continuation cursor");
}

///
/// TESTS
///
