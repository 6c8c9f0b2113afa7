mod common;

use common::*;
use serde_json::json;
use sumdnc::{
    core::types::Timestamp,
    error::{ErrorKind, StorageErrorKind},
    model::NewUser,
};

#[test]
fn twenty_five_users_page_as_ten_ten_five() {
    let ctx = context_with_users(25);
    // newest first
    let expected: Vec<String> = (1..=25)
        .rev()
        .map(|i| format!("user-{i}@example.com"))
        .collect();

    let first = call_ok(&ctx, "user.getAll", page_input(10, None));
    assert_eq!(strings(&first, "users", "email"), expected[0..10]);
    let token = next_cursor(&first).expect("first page has more");

    let second = call_ok(&ctx, "user.getAll", page_input(10, Some(&token)));
    assert_eq!(strings(&second, "users", "email"), expected[10..20]);
    let token = next_cursor(&second).expect("second page has more");

    let third = call_ok(&ctx, "user.getAll", page_input(10, Some(&token)));
    assert_eq!(strings(&third, "users", "email"), expected[20..25]);
    assert!(
        third.get("nextCursor").is_none(),
        "last page omits nextCursor"
    );
}

#[test]
fn omitted_input_defaults_to_ten() {
    let ctx = context_with_users(15);

    let page = call_ok(&ctx, "user.getAll", json!(null));
    assert_eq!(strings(&page, "users", "id").len(), 10);
    assert!(next_cursor(&page).is_some());
}

#[test]
fn limit_bounds_are_validation_errors() {
    let ctx = context_with_users(3);

    for limit in [0, 101] {
        let err = call_err(&ctx, "user.getAll", json!({ "limit": limit }));
        let issues = err.issues().expect("limit should be a validation error");
        assert_eq!(issues.field("limit").len(), 1, "limit {limit}");
    }

    for limit in [1, 100] {
        call_ok(&ctx, "user.getAll", json!({ "limit": limit }));
    }
}

#[test]
fn published_posts_page_without_drafts() {
    // posts 3, 6, 9, 12 are drafts
    let ctx = context_with_posts(12);

    let mut slugs = Vec::new();
    let mut cursor = None;
    loop {
        let page = call_ok(&ctx, "post.getAll", page_input(3, cursor.as_deref()));
        slugs.extend(strings(&page, "posts", "slug"));
        cursor = next_cursor(&page);
        if cursor.is_none() {
            break;
        }
    }

    let expected: Vec<String> = (1..=12_u64)
        .rev()
        .filter(|i| i % 3 != 0)
        .map(|i| format!("post-{i}"))
        .collect();
    assert_eq!(slugs, expected);
}

#[test]
fn drafts_are_listable_with_published_false() {
    let ctx = context_with_posts(6);

    let page = call_ok(&ctx, "post.getAll", json!({ "published": false }));
    assert_eq!(strings(&page, "posts", "slug"), vec!["post-6", "post-3"]);
}

#[test]
fn cursor_is_bound_to_its_filter() {
    let ctx = context_with_posts(9);
    let page = call_ok(&ctx, "post.getAll", json!({ "limit": 1 }));
    let token = next_cursor(&page).expect("page has more");

    let err = call_err(
        &ctx,
        "post.getAll",
        json!({ "limit": 1, "cursor": token, "published": false }),
    );
    assert!(err.is_validation());

    let err = call_err(&ctx, "user.getAll", json!({ "cursor": token }));
    assert!(err.is_validation(), "post cursor must not work for users");
}

#[test]
fn garbage_cursor_is_a_cursor_field_issue() {
    let ctx = context_with_users(2);

    let err = call_err(&ctx, "user.getAll", json!({ "cursor": "not-a-cursor" }));
    let issues = err.issues().expect("validation error");
    assert_eq!(issues.field("cursor").len(), 1);
}

#[test]
fn deleted_anchor_is_not_found() {
    let ctx = context_with_users(5);
    let page = call_ok(&ctx, "user.getAll", page_input(2, None));
    let token = next_cursor(&page).expect("page has more");
    let anchor = strings(&page, "users", "id")
        .pop()
        .expect("page has rows");

    ctx.db().delete_user(&anchor).expect("delete should succeed");

    let err = call_err(&ctx, "user.getAll", page_input(2, Some(&token)));
    assert!(err.is_not_found());
}

#[test]
fn deleting_a_returned_row_keeps_later_pages_stable() {
    let ctx = context_with_users(6);
    let first = call_ok(&ctx, "user.getAll", page_input(3, None));
    let first_ids = strings(&first, "users", "id");
    let token = next_cursor(&first).expect("page has more");

    ctx.db()
        .delete_user(&first_ids[0])
        .expect("delete should succeed");

    let second = call_ok(&ctx, "user.getAll", page_input(3, Some(&token)));
    assert_eq!(
        strings(&second, "users", "email"),
        vec![
            "user-3@example.com",
            "user-2@example.com",
            "user-1@example.com"
        ]
    );
}

#[test]
fn newer_insert_mid_walk_is_not_seen_by_the_walk() {
    let ctx = context_with_users(6);
    let first = call_ok(&ctx, "user.getAll", page_input(3, None));
    let token = next_cursor(&first).expect("page has more");

    ctx.db()
        .create_user(NewUser::new("late@example.com").created_at(Timestamp::from_millis(1_000)))
        .expect("insert should succeed");

    let second = call_ok(&ctx, "user.getAll", page_input(3, Some(&token)));
    let mut emails = strings(&first, "users", "email");
    emails.extend(strings(&second, "users", "email"));

    assert!(!emails.contains(&"late@example.com".to_string()));
    assert_eq!(emails.len(), 6);

    let restart = call_ok(&ctx, "user.getAll", page_input(1, None));
    assert_eq!(strings(&restart, "users", "email"), vec!["late@example.com"]);
}

#[test]
fn unavailable_store_fails_every_list() {
    let ctx = context_with_users(2);
    ctx.db().users().set_available(false);

    let err = call_err(&ctx, "user.getAll", json!({}));
    assert_eq!(err.kind, ErrorKind::Storage(StorageErrorKind::Unavailable));
}

proptest::proptest! {
    #![proptest_config(proptest::prelude::ProptestConfig::with_cases(32))]

    #[test]
    fn walking_any_limit_visits_every_user_once(count in 0_u64..40, limit in 1_i64..=15) {
        let ctx = context_with_users(count);

        let mut emails = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = call_ok(&ctx, "user.getAll", page_input(limit, cursor.as_deref()));
            let batch = strings(&page, "users", "email");
            proptest::prop_assert!(batch.len() <= usize::try_from(limit).expect("small limit"));
            emails.extend(batch);
            cursor = next_cursor(&page);
            if cursor.is_none() {
                break;
            }
        }

        let expected: Vec<String> = (1..=count)
            .rev()
            .map(|i| format!("user-{i}@example.com"))
            .collect();
        proptest::prop_assert_eq!(emails, expected);
    }
}
