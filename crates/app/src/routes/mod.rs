pub mod account;
pub mod admin_profiles;
pub mod home;
pub mod not_found;
pub mod sign_in;

use access::{evaluate, GuardState};
use dioxus::prelude::*;
use shared_types::Role;

use crate::auth::use_identity;
use crate::role::use_role;

use account::Account;
use admin_profiles::AdminProfiles;
use home::Home;
use not_found::NotFound;
use sign_in::SignIn;

/// Application routes.
#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/sign-in")]
    SignIn {},
    #[layout(SignedInLayout)]
        #[route("/account")]
        Account {},
    #[end_layout]
    #[layout(AdminLayout)]
        #[route("/admin/profiles")]
        AdminProfiles {},
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

/// Route guard.
///
/// Renders `children` only once the session and the role are settled and
/// the caller is allowed in. While anything is still loading it renders
/// nothing and does not redirect. A settled visitor without an identity is
/// sent to `/sign-in`; one holding the wrong role is sent to `/`.
#[component]
pub fn ProtectedRoute(#[props(!optional)] required: Option<Role>, children: Element) -> Element {
    let identity = use_identity();
    let role = use_role();

    let session = identity.snapshot();
    let loading = session.loading || (session.identity.is_some() && role.loading);
    let state = evaluate(loading, session.identity.as_ref(), role.role, required);

    if let Some(to) = state.redirect() {
        identity.redirect(to);
    }

    match state {
        GuardState::Authorized => children,
        GuardState::Loading | GuardState::Unauthenticated | GuardState::Forbidden => rsx! {},
    }
}

/// Layout for pages any signed-in visitor may see.
#[component]
fn SignedInLayout() -> Element {
    rsx! {
        ProtectedRoute { required: None, Outlet::<Route> {} }
    }
}

/// Layout for the admin back-office.
#[component]
fn AdminLayout() -> Element {
    rsx! {
        ProtectedRoute { required: Some(Role::Admin), Outlet::<Route> {} }
    }
}
