use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use shared_types::Role;

use crate::common;

#[tokio::test]
async fn sync_user_requires_a_session() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let (status, body) = common::post(&app, "/sync-user", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "Unauthorized");
}

#[tokio::test]
async fn sync_user_rejects_a_forged_token() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };

    let forged = server::auth::jwt::create_session_token(
        &shared_types::Identity::new("user_forged", "forged@printshop.test"),
        "not-the-provider-secret",
        None,
        chrono::Duration::minutes(5),
    )
    .unwrap();

    let (status, _) = common::post(&app, "/sync-user", Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(common::stored_role(&pool, "user_forged").await, None);
}

#[tokio::test]
async fn sync_user_creates_profile_with_default_role() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    let token = common::token_for("user_new", "new@printshop.test");

    let (status, body) = common::post(&app, "/sync-user", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "user_new");
    assert_eq!(body["created"], true);
    assert_eq!(
        common::stored_role(&pool, "user_new").await.as_deref(),
        Some("cliente")
    );
}

#[tokio::test]
async fn sync_user_is_idempotent() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };
    let token = common::token_for("user_twice", "twice@printshop.test");

    let (first, body) = common::post(&app, "/sync-user", Some(&token)).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(body["created"], true);

    let (second, body) = common::post(&app, "/sync-user", Some(&token)).await;
    assert_eq!(second, StatusCode::OK);
    assert_eq!(body["created"], false);
}

#[tokio::test]
async fn sync_user_never_overwrites_an_assigned_role() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    common::seed_profile(&pool, "user_editor", "editor@printshop.test", Role::Editor).await;
    let token = common::token_for("user_editor", "editor@printshop.test");

    let (status, body) = common::post(&app, "/sync-user", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], false);
    assert_eq!(
        common::stored_role(&pool, "user_editor").await.as_deref(),
        Some("editor")
    );
}

#[tokio::test]
async fn sync_user_reads_the_session_cookie() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };
    let token = common::token_for("user_cookie", "cookie@printshop.test");

    let (status, body) = common::post_with_cookie(&app, "/sync-user", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "user_cookie");
}

#[tokio::test]
async fn sync_user_rejects_a_session_without_email() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    let token = common::token_for("user_noemail", "");

    let (status, body) = common::post(&app, "/sync-user", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "BadRequest");
    assert_eq!(common::stored_role(&pool, "user_noemail").await, None);
}

#[tokio::test]
async fn owner_email_is_provisioned_as_admin() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    let token = common::token_for("user_owner", common::OWNER_EMAIL);

    let (status, _) = common::post(&app, "/sync-user", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        common::stored_role(&pool, "user_owner").await.as_deref(),
        Some("admin")
    );
}

#[tokio::test]
async fn owner_email_does_not_promote_an_existing_profile() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    common::seed_profile(&pool, "user_owner", common::OWNER_EMAIL, Role::Cliente).await;
    let token = common::token_for("user_owner", common::OWNER_EMAIL);

    let (status, body) = common::post(&app, "/sync-user", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], false);
    assert_eq!(
        common::stored_role(&pool, "user_owner").await.as_deref(),
        Some("cliente")
    );
}
