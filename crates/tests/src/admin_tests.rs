use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use shared_types::Role;

use crate::common;

#[tokio::test]
async fn listing_profiles_requires_admin() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    common::seed_profile(&pool, "user_c", "c@printshop.test", Role::Cliente).await;
    let cliente = common::token_for("user_c", "c@printshop.test");

    let (anonymous, _) = common::get(&app, "/api/admin/profiles", None).await;
    assert_eq!(anonymous, StatusCode::UNAUTHORIZED);

    let (status, body) = common::get(&app, "/api/admin/profiles", Some(&cliente)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "Forbidden");
}

#[tokio::test]
async fn identity_without_profile_is_forbidden() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };
    let token = common::token_for("user_ghost", "ghost@printshop.test");

    let (status, _) = common::get(&app, "/api/admin/profiles", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn editor_does_not_pass_an_admin_check() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    common::seed_profile(&pool, "user_e", "e@printshop.test", Role::Editor).await;
    let editor = common::token_for("user_e", "e@printshop.test");

    let (status, _) = common::get(&app, "/api/admin/profiles", Some(&editor)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_lists_all_profiles() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    let admin = common::seed_admin(&pool).await;
    common::seed_profile(&pool, "user_c", "c@printshop.test", Role::Cliente).await;

    let (status, body) = common::get(&app, "/api/admin/profiles", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"user_admin"));
    assert!(ids.contains(&"user_c"));
}

#[tokio::test]
async fn admin_assigns_a_role() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    let admin = common::seed_admin(&pool).await;
    common::seed_profile(&pool, "user_c", "c@printshop.test", Role::Cliente).await;

    let (status, body) = common::put_json(
        &app,
        "/api/admin/profiles/user_c/role",
        r#"{"role":"editor"}"#,
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "editor");
    assert_eq!(
        common::stored_role(&pool, "user_c").await.as_deref(),
        Some("editor")
    );
}

#[tokio::test]
async fn assigning_to_unknown_profile_is_404() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    let admin = common::seed_admin(&pool).await;

    let (status, body) = common::put_json(
        &app,
        "/api/admin/profiles/user_missing/role",
        r#"{"role":"editor"}"#,
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFound");
}

#[tokio::test]
async fn assigning_an_unknown_role_is_rejected() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    let admin = common::seed_admin(&pool).await;
    common::seed_profile(&pool, "user_c", "c@printshop.test", Role::Cliente).await;

    let (status, body) = common::put_json(
        &app,
        "/api/admin/profiles/user_c/role",
        r#"{"role":"owner"}"#,
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "ValidationError");
    assert!(body["field_errors"]["role"].is_string());

    let (empty, _) = common::put_json(
        &app,
        "/api/admin/profiles/user_c/role",
        r#"{"role":""}"#,
        Some(&admin),
    )
    .await;
    assert_eq!(empty, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        common::stored_role(&pool, "user_c").await.as_deref(),
        Some("cliente")
    );
}

#[tokio::test]
async fn demoted_admin_loses_access_immediately() {
    let Some((app, pool, _guard)) = common::test_app().await else { return };
    let admin = common::seed_admin(&pool).await;

    let (status, _) = common::put_json(
        &app,
        "/api/admin/profiles/user_admin/role",
        r#"{"role":"cliente"}"#,
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (after, _) = common::get(&app, "/api/admin/profiles", Some(&admin)).await;
    assert_eq!(after, StatusCode::FORBIDDEN);
}
