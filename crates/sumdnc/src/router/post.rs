use crate::{context::Context, error::Error, model::PostView, router::input::Input};
use serde::Serialize;
use serde_json::Value as Json;
use sumdnc_core::db::{ListRequest, Predicate};

///
/// PostPage
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<PostView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// `post.getById { id }`; `null` when absent.
pub fn get_by_id(ctx: &Context, raw: Json) -> Result<Option<PostView>, Error> {
    let mut input = Input::parse(raw, false)?;
    let id = input.required_string("id");
    let id = input.finish(id)?;

    ctx.db().post(&id)
}

/// `post.getBySlug { slug }`; `null` when absent.
pub fn get_by_slug(ctx: &Context, raw: Json) -> Result<Option<PostView>, Error> {
    let mut input = Input::parse(raw, false)?;
    let slug = input.required_string("slug");
    let slug = input.finish(slug)?;

    ctx.db().post_by_slug(&slug)
}

/// `post.getAll { limit = 10, cursor?, published = true }`
pub fn get_all(ctx: &Context, raw: Json) -> Result<PostPage, Error> {
    let mut input = Input::parse(raw, true)?;
    let limit = input.optional_integer("limit");
    let cursor = input.optional_string("cursor");
    let published = input.optional_bool("published").unwrap_or(true);
    input.finish(Some(()))?;

    let request = ListRequest {
        limit,
        cursor,
        predicate: Predicate::eq("published", published),
    };
    let page = ctx.db().list_posts(ctx.page_policy(), &request)?;

    Ok(PostPage {
        posts: page.items,
        next_cursor: page.next_cursor,
    })
}
