use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common;

#[tokio::test]
async fn my_profile_requires_a_session() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let (status, _) = common::get(&app, "/api/profiles/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn my_profile_is_404_until_provisioned() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };
    let token = common::token_for("user_fresh", "fresh@printshop.test");

    let (before, body) = common::get(&app, "/api/profiles/me", Some(&token)).await;
    assert_eq!(before, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFound");

    common::post(&app, "/sync-user", Some(&token)).await;

    let (after, body) = common::get(&app, "/api/profiles/me", Some(&token)).await;
    assert_eq!(after, StatusCode::OK);
    assert_eq!(body["id"], "user_fresh");
    assert_eq!(body["email"], "fresh@printshop.test");
    assert_eq!(body["role"], "cliente");
}

#[tokio::test]
async fn my_profile_only_returns_the_callers_row() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    common::seed_profile(&pool, "user_a", "a@printshop.test", shared_types::Role::Editor).await;
    common::seed_profile(&pool, "user_b", "b@printshop.test", shared_types::Role::Cliente).await;

    let token = common::token_for("user_b", "b@printshop.test");
    let (status, body) = common::get(&app, "/api/profiles/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "user_b");
    assert_eq!(body["role"], "cliente");
}
