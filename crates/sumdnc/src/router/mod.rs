//! Procedure router: `resource.procedure` paths over JSON input/output.

mod input;
pub mod post;
pub mod user;

use crate::{
    context::Context,
    error::{Error, ErrorKind, ErrorOrigin},
};
use serde::Serialize;
use serde_json::Value as Json;

///
/// Procedure
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Procedure {
    UserGetById,
    UserGetAll,
    PostGetById,
    PostGetBySlug,
    PostGetAll,
}

impl Procedure {
    pub const ALL: [Self; 5] = [
        Self::UserGetById,
        Self::UserGetAll,
        Self::PostGetById,
        Self::PostGetBySlug,
        Self::PostGetAll,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::UserGetById => "user.getById",
            Self::UserGetAll => "user.getAll",
            Self::PostGetById => "post.getById",
            Self::PostGetBySlug => "post.getBySlug",
            Self::PostGetAll => "post.getAll",
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.path() == path)
    }
}

/// Dispatch one procedure call by path.
#[tracing::instrument(skip(ctx, input), err(Display))]
pub fn call(ctx: &Context, path: &str, input: Json) -> Result<Json, Error> {
    let Some(procedure) = Procedure::from_path(path) else {
        return Err(Error::not_found(
            ErrorOrigin::Interface,
            format!("no procedure on path \"{path}\""),
        ));
    };

    match procedure {
        Procedure::UserGetById => to_json(&user::get_by_id(ctx, input)?),
        Procedure::UserGetAll => to_json(&user::get_all(ctx, input)?),
        Procedure::PostGetById => to_json(&post::get_by_id(ctx, input)?),
        Procedure::PostGetBySlug => to_json(&post::get_by_slug(ctx, input)?),
        Procedure::PostGetAll => to_json(&post::get_all(ctx, input)?),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Json, Error> {
    serde_json::to_value(value).map_err(|err| {
        Error::new(ErrorKind::Internal, ErrorOrigin::Serialize, err.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_procedure_round_trips_its_path() {
        for procedure in Procedure::ALL {
            assert_eq!(Procedure::from_path(procedure.path()), Some(procedure));
        }
        assert_eq!(Procedure::from_path("post.delete"), None);
    }
}
