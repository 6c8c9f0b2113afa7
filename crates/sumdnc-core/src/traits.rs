use crate::{
    types::Timestamp,
    value::{Value, ValueKind},
};

///
/// FieldModel
/// Static description of one filterable entity field.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldModel {
    pub name: &'static str,
    pub kind: ValueKind,
    pub nullable: bool,
}

impl FieldModel {
    #[must_use]
    pub const fn required(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    #[must_use]
    pub const fn nullable(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
        }
    }
}

///
/// EntityKind
///
/// A row type that can live in an ordered store and be paginated.
/// `id` must be unique and immutable; `created_at` never changes after insert.
///

pub trait EntityKind: Clone + Send + Sync + 'static {
    /// Stable path used in metrics, errors, and cursor signatures.
    const PATH: &'static str;

    /// Fields that predicates may reference.
    const FIELDS: &'static [FieldModel];

    /// Fields with a store-enforced uniqueness constraint.
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> &str;

    fn created_at(&self) -> Timestamp;

    /// Project one field into a `Value`; `None` for unknown fields.
    fn field_value(&self, field: &str) -> Option<Value>;

    #[must_use]
    fn field_model(field: &str) -> Option<&'static FieldModel> {
        Self::FIELDS.iter().find(|model| model.name == field)
    }
}
