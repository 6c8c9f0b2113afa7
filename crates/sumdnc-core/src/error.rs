use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// The facade maps `class` onto its public taxonomy; `message` is the only
/// human-facing part.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a query-origin validation failure.
    pub fn query_validation(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Validation, ErrorOrigin::Query, message)
    }

    /// Construct a cursor-origin validation failure.
    pub fn cursor_validation(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Validation, ErrorOrigin::Cursor, message)
    }

    pub(crate) fn serialize_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Serialize, message)
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Caller input is malformed or out of range. Never retried.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// The backing store could not serve the request.
    Unavailable,
    /// A write collided with an existing unique value.
    Conflict,
    Internal,
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Cursor,
    Query,
    Store,
    Serialize,
    Interface,
}
