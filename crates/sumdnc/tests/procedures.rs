mod common;

use common::*;
use serde_json::json;
use sumdnc::{
    config::Config, context::Context, core::types::Timestamp, error::ErrorOrigin, model::NewUser,
};

#[test]
fn user_get_by_id_returns_the_user_view() {
    let ctx = context_with_users(1);
    let page = call_ok(&ctx, "user.getAll", json!({}));
    let id = strings(&page, "users", "id").remove(0);

    let user = call_ok(&ctx, "user.getById", json!({ "id": id }));
    assert_eq!(user["email"], "user-1@example.com");
    assert_eq!(user["role"], "USER");
    assert_eq!(user["createdAt"], 1);
}

#[test]
fn missing_user_is_not_found() {
    let ctx = context_with_users(1);

    let err = call_err(&ctx, "user.getById", json!({ "id": "nope" }));
    assert!(err.is_not_found());
    assert_eq!(err.message, "User not found");
}

#[test]
fn missing_post_is_null() {
    let ctx = context_with_posts(1);

    assert!(call_ok(&ctx, "post.getById", json!({ "id": "nope" })).is_null());
    assert!(call_ok(&ctx, "post.getBySlug", json!({ "slug": "nope" })).is_null());
}

#[test]
fn post_by_slug_includes_author_summary() {
    let ctx = context_with_posts(2);

    let post = call_ok(&ctx, "post.getBySlug", json!({ "slug": "post-2" }));
    assert_eq!(post["title"], "Post 2");
    assert_eq!(post["author"]["name"], "Author");
    assert!(
        post["author"].get("email").is_none(),
        "author summary hides email"
    );

    let by_id = call_ok(&ctx, "post.getById", json!({ "id": post["id"] }));
    assert_eq!(by_id, post);
}

#[test]
fn malformed_input_reports_field_issues() {
    let ctx = context_with_posts(1);

    let err = call_err(&ctx, "post.getById", json!({}));
    let issues = err.issues().expect("validation error");
    assert_eq!(issues.field("id"), ["Required"]);
    assert_eq!(err.origin, ErrorOrigin::Interface);

    let err = call_err(
        &ctx,
        "post.getAll",
        json!({ "limit": 2.5, "published": "yes" }),
    );
    let issues = err.issues().expect("validation error");
    assert_eq!(issues.field("limit").len(), 1);
    assert_eq!(issues.field("published").len(), 1);

    let err = call_err(&ctx, "user.getById", json!("id"));
    assert!(err.is_validation());
}

#[test]
fn unknown_path_is_not_found() {
    let ctx = context_with_users(0);

    let err = call_err(&ctx, "user.delete", json!({ "id": "x" }));
    assert!(err.is_not_found());
    assert_eq!(err.origin, ErrorOrigin::Interface);
}

#[test]
fn error_serializes_with_flattened_issues() {
    let ctx = context_with_users(0);
    let err = call_err(&ctx, "user.getAll", json!({ "limit": 0 }));

    let json = serde_json::to_value(&err).expect("error should serialize");
    assert!(json["kind"]["Validation"]["fieldErrors"]["limit"].is_array());
}

#[test]
fn lowered_max_limit_is_enforced() {
    let file = "[pagination]\ndefault_limit = 5\nmax_limit = 5\n";
    let config = Config::from_sources(Some(file), |key| {
        let value = match key {
            "DATABASE_URL" => "postgres://localhost/db",
            "NEXTAUTH_URL" => "http://localhost",
            "NEXTAUTH_SECRET" => "x",
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("config should be valid");
    let ctx = Context::new(config);
    ctx.db()
        .create_user(NewUser::new("a@example.com").created_at(Timestamp::from_millis(1)))
        .expect("insert should succeed");

    assert!(call_err(&ctx, "user.getAll", json!({ "limit": 6 })).is_validation());
    call_ok(&ctx, "user.getAll", json!({ "limit": 5 }));
}

#[test]
fn whole_number_float_limit_is_accepted() {
    let ctx = context_with_users(4);

    let page = call_ok(&ctx, "user.getAll", json!({ "limit": 3.0 }));
    assert_eq!(strings(&page, "users", "id").len(), 3);

    let err = call_err(&ctx, "user.getAll", json!({ "limit": 2.5 }));
    assert_eq!(
        err.issues().expect("validation error").field("limit"),
        ["Expected integer, received float"]
    );
}
