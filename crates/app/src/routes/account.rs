use dioxus::prelude::*;

use crate::auth::use_identity;
use crate::role::use_role;

/// Signed-in visitor's own account: identity and resolved role.
#[component]
pub fn Account() -> Element {
    let identity = use_identity();
    let role = use_role();
    let email = identity.user().map(|u| u.email).unwrap_or_default();
    let role_label = role
        .role
        .map(|r| r.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let sign_out = identity.clone();

    rsx! {
        main { class: "account",
            h1 { "My account" }
            dl {
                dt { "Email" }
                dd { "{email}" }
                dt { "Role" }
                dd { "{role_label}" }
            }
            button {
                onclick: move |_| {
                    let adapter = sign_out.clone();
                    async move { adapter.sign_out().await }
                },
                "Sign out"
            }
        }
    }
}
