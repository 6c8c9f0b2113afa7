//! Module: predicate
//! Responsibility: filter value objects passed explicitly to stores.
//! Does not own: ordering, windowing, or cursor state.

mod fingerprint;

pub(crate) use fingerprint::{hash_predicate, write_str};

use crate::{
    error::InternalError,
    traits::EntityKind,
    value::{Value, ValueKind},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error as ThisError;

///
/// Predicate
///
/// Filter applied before pagination, so page boundaries are computed only
/// against matching rows.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Predicate {
    #[default]
    True,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare(ComparePredicate),
}

impl Predicate {
    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate::new(field, CompareOp::Eq, value))
    }

    /// `field != value`
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate::new(field, CompareOp::Ne, value))
    }

    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate::new(field, op, value))
    }

    /// Conjoin two predicates, flattening nested `And` and dropping `True`.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, p) | (p, Self::True) => p,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), p) => {
                left.push(p);
                Self::And(left)
            }
            (p, Self::And(mut right)) => {
                right.insert(0, p);
                Self::And(right)
            }
            (left, right) => Self::And(vec![left, right]),
        }
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Check every referenced field against the entity model.
    pub fn validate<E: EntityKind>(&self) -> Result<(), PredicateError> {
        match self {
            Self::True => Ok(()),
            Self::And(children) | Self::Or(children) => {
                children.iter().try_for_each(Self::validate::<E>)
            }
            Self::Not(inner) => inner.validate::<E>(),
            Self::Compare(compare) => compare.validate::<E>(),
        }
    }

    /// Evaluate against one row. Unknown fields never match.
    #[must_use]
    pub fn matches<E: EntityKind>(&self, entity: &E) -> bool {
        match self {
            Self::True => true,
            Self::And(children) => children.iter().all(|child| child.matches(entity)),
            Self::Or(children) => children.iter().any(|child| child.matches(entity)),
            Self::Not(inner) => !inner.matches(entity),
            Self::Compare(compare) => compare.matches(entity),
        }
    }
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ComparePredicate {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl ComparePredicate {
    pub fn new(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    fn validate<E: EntityKind>(&self) -> Result<(), PredicateError> {
        let Some(model) = E::field_model(&self.field) else {
            return Err(PredicateError::UnknownField {
                entity_path: E::PATH,
                field: self.field.clone(),
            });
        };

        match self.value.kind() {
            None if !model.nullable => Err(PredicateError::NullOnRequiredField {
                field: self.field.clone(),
            }),
            None if !self.op.is_equality() => Err(PredicateError::UnsupportedOperator {
                field: self.field.clone(),
                op: self.op,
            }),
            Some(kind) if kind != model.kind => Err(PredicateError::LiteralTypeMismatch {
                field: self.field.clone(),
                expected: model.kind,
                found: kind,
            }),
            Some(ValueKind::Bool) if !self.op.is_equality() => {
                Err(PredicateError::UnsupportedOperator {
                    field: self.field.clone(),
                    op: self.op,
                })
            }
            _ => Ok(()),
        }
    }

    fn matches<E: EntityKind>(&self, entity: &E) -> bool {
        let Some(actual) = entity.field_value(&self.field) else {
            return false;
        };

        match self.op {
            CompareOp::Eq => actual == self.value,
            CompareOp::Ne => actual != self.value,
            op => actual
                .strict_cmp(&self.value)
                .is_some_and(|ordering| op.accepts(ordering)),
        }
    }
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }

    const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::Ne => !matches!(ordering, Ordering::Equal),
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::Lte => !matches!(ordering, Ordering::Greater),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Gte => !matches!(ordering, Ordering::Less),
        }
    }

    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Eq => 0x01,
            Self::Ne => 0x02,
            Self::Lt => 0x03,
            Self::Lte => 0x04,
            Self::Gt => 0x05,
            Self::Gte => 0x06,
        }
    }
}

///
/// PredicateError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PredicateError {
    #[error("unknown field '{field}' for '{entity_path}'")]
    UnknownField {
        entity_path: &'static str,
        field: String,
    },

    #[error("field '{field}' expects {expected}, found {found}")]
    LiteralTypeMismatch {
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("field '{field}' is not nullable")]
    NullOnRequiredField { field: String },

    #[error("operator {op:?} is not supported for field '{field}'")]
    UnsupportedOperator { field: String, op: CompareOp },
}

impl PredicateError {
    /// Field the failure refers to.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::UnknownField { field, .. }
            | Self::LiteralTypeMismatch { field, .. }
            | Self::NullOnRequiredField { field }
            | Self::UnsupportedOperator { field, .. } => field,
        }
    }
}

impl From<PredicateError> for InternalError {
    fn from(err: PredicateError) -> Self {
        Self::query_validation(err.to_string())
    }
}

///
/// TESTS
///
