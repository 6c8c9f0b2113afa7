use candid::CandidType;
use serde::{Deserialize, Serialize};
use sumdnc_core::{
    traits::{EntityKind, FieldModel},
    types::Timestamp,
    value::{Value, ValueKind},
};

///
/// Role
///

#[derive(CandidType, Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

///
/// User
///
/// Stored user row. Serializes directly as the public user view.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub role: Role,
    pub created_at: Timestamp,
}

impl EntityKind for User {
    const PATH: &'static str = "sumdnc::model::user::User";
    const FIELDS: &'static [FieldModel] = &[
        FieldModel::required("id", ValueKind::Text),
        FieldModel::nullable("name", ValueKind::Text),
        FieldModel::required("email", ValueKind::Text),
        FieldModel::nullable("image", ValueKind::Text),
        FieldModel::required("role", ValueKind::Text),
        FieldModel::required("createdAt", ValueKind::Timestamp),
    ];
    const UNIQUE_FIELDS: &'static [&'static str] = &["email"];

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        let value = match field {
            "id" => self.id.clone().into(),
            "name" => self.name.clone().into(),
            "email" => self.email.clone().into(),
            "image" => self.image.clone().into(),
            "role" => self.role.as_str().into(),
            "createdAt" => self.created_at.into(),
            _ => return None,
        };

        Some(value)
    }
}

///
/// NewUser
/// Insert payload; id and (optionally) creation time are assigned on insert.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub role: Role,
    pub created_at: Option<Timestamp>,
}

impl NewUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub const fn created_at(mut self, at: Timestamp) -> Self {
        self.created_at = Some(at);
        self
    }
}
