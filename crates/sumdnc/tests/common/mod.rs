#![allow(dead_code)]

use serde_json::{Value as Json, json};
use sumdnc::{
    config::Config,
    context::Context,
    core::types::Timestamp,
    model::{NewPost, NewUser},
    router,
};

pub fn test_config() -> Config {
    Config::from_sources(None, |key| {
        let value = match key {
            "DATABASE_URL" => "postgres://localhost:5432/sumdnc_test",
            "NEXTAUTH_URL" => "http://localhost:3000",
            "NEXTAUTH_SECRET" => "test-secret",
            "NODE_ENV" => "test",
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("test config should be valid")
}

/// Context with one author and `count` posts created at 1..=count ms.
/// Post `i` has slug `post-i`; every third post is a draft.
pub fn context_with_posts(count: u64) -> Context {
    let ctx = Context::new(test_config());
    let author = ctx
        .db()
        .create_user(
            NewUser::new("author@example.com")
                .name("Author")
                .created_at(Timestamp::from_millis(0)),
        )
        .expect("author should insert");

    for i in 1..=count {
        ctx.db()
            .create_post(
                NewPost::new(format!("Post {i}"), format!("post-{i}"), author.id.clone())
                    .published(i % 3 != 0)
                    .created_at(Timestamp::from_millis(i)),
            )
            .expect("post should insert");
    }

    ctx
}

/// Context with `count` users created at 1..=count ms, emails `user-i@…`.
pub fn context_with_users(count: u64) -> Context {
    let ctx = Context::new(test_config());
    for i in 1..=count {
        ctx.db()
            .create_user(
                NewUser::new(format!("user-{i}@example.com"))
                    .created_at(Timestamp::from_millis(i)),
            )
            .expect("user should insert");
    }

    ctx
}

pub fn call_ok(ctx: &Context, path: &str, input: Json) -> Json {
    router::call(ctx, path, input).expect("procedure should succeed")
}

pub fn call_err(ctx: &Context, path: &str, input: Json) -> sumdnc::Error {
    router::call(ctx, path, input).expect_err("procedure should fail")
}

pub fn strings(page: &Json, list: &str, field: &str) -> Vec<String> {
    page[list]
        .as_array()
        .expect("page list should be an array")
        .iter()
        .map(|item| item[field].as_str().expect("string field").to_string())
        .collect()
}

pub fn next_cursor(page: &Json) -> Option<String> {
    page.get("nextCursor")
        .and_then(Json::as_str)
        .map(str::to_string)
}

pub fn page_input(limit: i64, cursor: Option<&str>) -> Json {
    match cursor {
        Some(cursor) => json!({ "limit": limit, "cursor": cursor }),
        None => json!({ "limit": limit }),
    }
}
