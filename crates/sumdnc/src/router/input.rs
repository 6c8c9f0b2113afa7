use crate::error::{Error, ErrorKind, ErrorOrigin, ValidationIssues};
use serde_json::{Map, Value as Json};

///
/// Input
///
/// Field-by-field reader over a procedure's JSON input object. Every type
/// problem is collected so one response reports all bad fields. Unknown
/// keys are ignored.
///

pub(crate) struct Input {
    fields: Map<String, Json>,
    issues: ValidationIssues,
}

impl Input {
    /// Accept an object; `null` counts as `{}` when every field is optional.
    pub(crate) fn parse(raw: Json, null_is_empty: bool) -> Result<Self, Error> {
        let fields = match raw {
            Json::Object(fields) => fields,
            Json::Null if null_is_empty => Map::new(),
            other => {
                return Err(Error::new(
                    ErrorKind::Validation(ValidationIssues::default().with_form(format!(
                        "Expected object, received {}",
                        type_name(&other)
                    ))),
                    ErrorOrigin::Interface,
                    "invalid input",
                ));
            }
        };

        Ok(Self {
            fields,
            issues: ValidationIssues::default(),
        })
    }

    pub(crate) fn required_string(&mut self, field: &str) -> Option<String> {
        match self.fields.remove(field) {
            None => {
                self.issues.push_field(field, "Required");
                None
            }
            Some(raw) => self.string(field, raw),
        }
    }

    pub(crate) fn optional_string(&mut self, field: &str) -> Option<String> {
        match self.fields.remove(field) {
            None | Some(Json::Null) => None,
            Some(raw) => self.string(field, raw),
        }
    }

    /// Whole numbers only, `10.0` included; range checks belong to the caller.
    pub(crate) fn optional_integer(&mut self, field: &str) -> Option<i64> {
        match self.fields.remove(field) {
            None | Some(Json::Null) => None,
            Some(Json::Number(n)) => n.as_i64().or_else(|| match n.as_f64() {
                Some(f) if f.fract() != 0.0 => {
                    self.issues.push_field(field, "Expected integer, received float");
                    None
                }
                Some(f) if (I64_MIN_F64..I64_MAX_F64).contains(&f) => Some(whole_to_i64(f)),
                _ => {
                    self.issues.push_field(field, "Number is too large");
                    None
                }
            }),
            Some(other) => {
                self.mismatch(field, "number", &other);
                None
            }
        }
    }

    pub(crate) fn optional_bool(&mut self, field: &str) -> Option<bool> {
        match self.fields.remove(field) {
            None | Some(Json::Null) => None,
            Some(Json::Bool(b)) => Some(b),
            Some(other) => {
                self.mismatch(field, "boolean", &other);
                None
            }
        }
    }

    /// Return `value` when no issue was recorded.
    pub(crate) fn finish<T>(self, value: Option<T>) -> Result<T, Error> {
        match value {
            Some(value) if self.issues.is_empty() => Ok(value),
            _ => Err(Error::new(
                ErrorKind::Validation(self.issues),
                ErrorOrigin::Interface,
                "invalid input",
            )),
        }
    }

    fn string(&mut self, field: &str, raw: Json) -> Option<String> {
        match raw {
            Json::String(s) => Some(s),
            other => {
                self.mismatch(field, "string", &other);
                None
            }
        }
    }

    fn mismatch(&mut self, field: &str, expected: &str, received: &Json) {
        self.issues.push_field(
            field,
            format!("Expected {expected}, received {}", type_name(received)),
        );
    }
}

// i64::MIN is exact in f64; i64::MAX rounds up to 2^63, so that bound is exclusive.
#[allow(clippy::cast_precision_loss)]
const I64_MIN_F64: f64 = i64::MIN as f64;
#[allow(clippy::cast_precision_loss)]
const I64_MAX_F64: f64 = i64::MAX as f64;

#[allow(clippy::cast_possible_truncation)]
fn whole_to_i64(value: f64) -> i64 {
    value as i64
}

const fn type_name(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
