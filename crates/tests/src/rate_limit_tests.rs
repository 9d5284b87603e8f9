use axum::http::StatusCode;

use crate::common;

#[tokio::test]
async fn sync_user_returns_429_when_exceeded() {
    let Some((app, _pool, _guard)) = common::test_app_rate_limited(2).await else { return };
    let token = common::token_for("user_busy", "busy@printshop.test");

    let (s1, _) = common::post(&app, "/sync-user", Some(&token)).await;
    assert_eq!(s1, StatusCode::OK, "First request should pass");

    let (s2, _) = common::post(&app, "/sync-user", Some(&token)).await;
    assert_eq!(s2, StatusCode::OK, "Second request should pass");

    let (s3, body) = common::post(&app, "/sync-user", Some(&token)).await;
    assert_eq!(s3, StatusCode::TOO_MANY_REQUESTS, "Third request should be rate limited");
    assert_eq!(body["kind"], "RateLimited");
}

#[tokio::test]
async fn sync_user_limits_each_identity_separately() {
    let Some((app, _pool, _guard)) = common::test_app_rate_limited(1).await else { return };
    let first = common::token_for("user_one", "one@printshop.test");
    let second = common::token_for("user_two", "two@printshop.test");

    let (s1, _) = common::post(&app, "/sync-user", Some(&first)).await;
    assert_eq!(s1, StatusCode::OK);

    let (s2, _) = common::post(&app, "/sync-user", Some(&second)).await;
    assert_eq!(s2, StatusCode::OK);

    let (s3, _) = common::post(&app, "/sync-user", Some(&first)).await;
    assert_eq!(s3, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn profile_reads_are_not_rate_limited() {
    let Some((app, _pool, _guard)) = common::test_app_rate_limited(1).await else { return };
    let token = common::token_for("user_reader", "reader@printshop.test");

    common::post(&app, "/sync-user", Some(&token)).await;
    for _ in 0..3 {
        let (status, _) = common::get(&app, "/api/profiles/me", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
