use dioxus::prelude::*;
use shared_types::{AuthLinks, Role};

use crate::auth::use_identity;
use crate::role::use_role;
use crate::routes::Route;

/// Public landing page. Shows the session controls.
#[component]
pub fn Home() -> Element {
    let identity = use_identity();
    let links = use_context::<AuthLinks>();
    let session = identity.snapshot();
    let is_admin = use_role().role == Some(Role::Admin);

    let sign_in = identity.clone();
    let sign_up = identity.clone();
    let sign_out = identity.clone();

    rsx! {
        main { class: "home",
            h1 { "3D printing studio" }
            if let Some(user) = session.identity {
                p { "Signed in as {user.email}" }
                nav {
                    Link { to: Route::Account {}, "My account" }
                    if is_admin {
                        Link { to: Route::AdminProfiles {}, "Back-office" }
                    }
                }
                button {
                    onclick: move |_| {
                        let adapter = sign_out.clone();
                        async move { adapter.sign_out().await }
                    },
                    "Sign out"
                }
            } else if !session.loading {
                button { onclick: move |_| sign_in.prompt_sign_in(), "Sign in" }
                if links.sign_up_url.is_some() {
                    button { onclick: move |_| sign_up.prompt_sign_up(), "Create account" }
                }
            }
        }
    }
}
