use crate::{
    context::Context,
    error::{Error, ErrorOrigin},
    model::User,
    router::input::Input,
};
use serde::Serialize;
use serde_json::Value as Json;
use sumdnc_core::db::ListRequest;

///
/// UserPage
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub users: Vec<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// `user.getById { id }`; a missing user is an error, not `null`.
pub fn get_by_id(ctx: &Context, raw: Json) -> Result<User, Error> {
    let mut input = Input::parse(raw, false)?;
    let id = input.required_string("id");
    let id = input.finish(id)?;

    ctx.db()
        .user(&id)?
        .ok_or_else(|| Error::not_found(ErrorOrigin::Query, "User not found"))
}

/// `user.getAll { limit = 10, cursor? }`
pub fn get_all(ctx: &Context, raw: Json) -> Result<UserPage, Error> {
    let mut input = Input::parse(raw, true)?;
    let limit = input.optional_integer("limit");
    let cursor = input.optional_string("cursor");
    input.finish(Some(()))?;

    let request = ListRequest {
        limit,
        cursor,
        ..ListRequest::default()
    };
    let page = ctx.db().list_users(ctx.page_policy(), &request)?;

    Ok(UserPage {
        users: page.items,
        next_cursor: page.next_cursor,
    })
}
