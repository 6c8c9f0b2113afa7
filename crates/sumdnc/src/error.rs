use candid::CandidType;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use sumdnc_core::{
    db::{ListError, StoreError, cursor::CursorError},
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// Validation failure attributed to one input field.
    pub fn invalid_field(
        origin: ErrorOrigin,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let issues = ValidationIssues::default().with_field(field, message.clone());

        Self::new(ErrorKind::Validation(issues), origin, message)
    }

    pub fn not_found(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, origin, message)
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation(_))
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }

    /// Field issues carried by a validation error.
    #[must_use]
    pub const fn issues(&self) -> Option<&ValidationIssues> {
        match &self.kind {
            ErrorKind::Validation(issues) => Some(issues),
            _ => None,
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match err.class {
            ErrorClass::Validation => {
                ErrorKind::Validation(ValidationIssues::default().with_form(err.message.clone()))
            }
            ErrorClass::NotFound => ErrorKind::NotFound,
            ErrorClass::Unavailable => ErrorKind::Storage(StorageErrorKind::Unavailable),
            ErrorClass::Conflict => ErrorKind::Storage(StorageErrorKind::Conflict),
            ErrorClass::Internal => ErrorKind::Internal,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<ListError> for Error {
    fn from(err: ListError) -> Self {
        match err {
            ListError::LimitOutOfRange { .. } => {
                Self::invalid_field(ErrorOrigin::Query, "limit", err.to_string())
            }
            ListError::Cursor(CursorError::SignatureMismatch { .. }) => Self::invalid_field(
                ErrorOrigin::Cursor,
                "cursor",
                "cursor was issued for a different listing",
            ),
            ListError::Cursor(_) => {
                Self::invalid_field(ErrorOrigin::Cursor, "cursor", "invalid cursor")
            }
            ListError::CursorAnchorNotFound { .. } => {
                Self::not_found(ErrorOrigin::Cursor, err.to_string())
            }
            _ => InternalError::from(err).into(),
        }
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Caller input was rejected; never retried.
    Validation(ValidationIssues),

    /// A referenced resource (or cursor anchor) does not exist.
    NotFound,

    Storage(StorageErrorKind),

    /// The caller cannot remediate this.
    Internal,
}

///
/// StorageErrorKind
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StorageErrorKind {
    Unavailable,
    Conflict,
}

///
/// ValidationIssues
///
/// Flattened issue list: form-level messages plus messages keyed by the
/// input field they refer to.
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssues {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationIssues {
    #[must_use]
    pub fn with_form(mut self, message: impl Into<String>) -> Self {
        self.form_errors.push(message.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.push_field(field, message);
        self
    }

    pub fn push_field(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    /// Messages recorded for one field.
    #[must_use]
    pub fn field(&self, field: &str) -> &[String] {
        self.field_errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Cursor,
    Interface,
    Query,
    Serialize,
    Store,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Cursor => Self::Cursor,
            CoreErrorOrigin::Interface => Self::Interface,
            CoreErrorOrigin::Query => Self::Query,
            CoreErrorOrigin::Serialize => Self::Serialize,
            CoreErrorOrigin::Store => Self::Store,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_errors_are_attributed_to_the_limit_field() {
        let err: Error = ListError::LimitOutOfRange {
            limit: 0,
            min: 1,
            max: 100,
        }
        .into();

        let issues = err.issues().expect("limit error should be validation");
        assert_eq!(issues.field("limit").len(), 1);
        assert_eq!(err.origin, ErrorOrigin::Query);
    }

    #[test]
    fn dangling_cursor_maps_to_not_found() {
        let err: Error = ListError::CursorAnchorNotFound {
            entity_path: "post",
            id: "gone".to_string(),
        }
        .into();

        assert!(err.is_not_found());
        assert_eq!(err.origin, ErrorOrigin::Cursor);
    }

    #[test]
    fn unavailable_store_maps_to_storage_kind() {
        let err: Error = StoreError::Unavailable {
            reason: "offline".to_string(),
        }
        .into();

        assert_eq!(err.kind, ErrorKind::Storage(StorageErrorKind::Unavailable));
        assert_eq!(err.origin, ErrorOrigin::Store);
    }

    #[test]
    fn duplicate_unique_value_maps_to_storage_conflict() {
        let err: Error = StoreError::Conflict {
            entity_path: "post",
            field: "slug",
            key: "hello".to_string(),
        }
        .into();

        assert_eq!(err.kind, ErrorKind::Storage(StorageErrorKind::Conflict));
        assert_eq!(err.origin, ErrorOrigin::Store);
    }

    #[test]
    fn core_classes_map_onto_public_kinds() {
        let cases = [
            (ErrorClass::Validation, false),
            (ErrorClass::NotFound, true),
            (ErrorClass::Internal, false),
        ];
        for (class, not_found) in cases {
            let err: Error = InternalError::new(class, CoreErrorOrigin::Query, "x").into();
            assert_eq!(err.is_not_found(), not_found, "{class:?}");
            assert_eq!(err.is_validation(), class == ErrorClass::Validation, "{class:?}");
        }
    }

    #[test]
    fn issues_serialize_in_flattened_shape() {
        let issues = ValidationIssues::default()
            .with_form("bad input")
            .with_field("id", "Required");
        let json = serde_json::to_value(&issues).expect("issues should serialize");

        assert_eq!(
            json,
            serde_json::json!({
                "formErrors": ["bad input"],
                "fieldErrors": { "id": ["Required"] }
            })
        );
    }
}
