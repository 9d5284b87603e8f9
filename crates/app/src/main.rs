use dioxus::prelude::*;
use shared_types::{AuthLinks, FeatureFlags};

mod auth;
mod role;
mod routes;

use auth::SessionState;
use role::RoleContext;
use routes::Route;

fn main() {
    #[cfg(feature = "server")]
    dioxus::serve(|| async move {
        server::config::load_feature_flags();
        let flags = server::config::feature_flags();

        if flags.telemetry {
            server::telemetry::init_telemetry();
        }
        server::health::record_start_time();

        let pool = server::db::create_pool()?;
        server::db::run_migrations(&pool).await?;

        let mut router = dioxus::server::router(App).merge(server::openapi::api_router(pool));

        if flags.telemetry {
            router = router.layer(server::telemetry::OtelTraceLayer);
        }

        let router = router
            .layer(axum::middleware::from_fn(
                server::auth::middleware::session_middleware,
            ))
            .layer(tower_http::request_id::PropagateRequestIdLayer::x_request_id())
            .layer(tower_http::request_id::SetRequestIdLayer::x_request_id(
                tower_http::request_id::MakeRequestUuid,
            ));
        Ok(router)
    });

    #[cfg(not(feature = "server"))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Flags and provider links are not sensitive; both default to "off" on error.
    let flags_resource =
        use_server_future(move || async move { server::api::get_feature_flags().await })?;
    let links_resource =
        use_server_future(move || async move { server::api::get_auth_links().await })?;
    let identity_resource =
        use_server_future(move || async move { server::api::get_current_identity().await })?;

    let flags = flags_resource
        .read()
        .as_ref()
        .cloned()
        .unwrap_or(Ok(FeatureFlags::default()))
        .unwrap_or_default();
    let links = links_resource
        .read()
        .as_ref()
        .cloned()
        .unwrap_or(Ok(AuthLinks::default()))
        .unwrap_or_default();

    use_context_provider(|| flags);
    use_context_provider(|| links);

    let mut session = use_context_provider(SessionState::new);
    use_effect(move || {
        if let Some(result) = identity_resource.read().as_ref() {
            let identity = match result {
                Ok(identity) => identity.clone(),
                Err(e) => {
                    tracing::warn!(error = %e, "Could not read session, treating as signed out");
                    None
                }
            };
            session.settle(identity);
        }
    });

    let roles = use_context_provider(RoleContext::new);
    role::use_role_resolution(session, roles);

    rsx! {
        SuspenseBoundary {
            fallback: |_| rsx! {},
            Router::<Route> {}
        }
    }
}
