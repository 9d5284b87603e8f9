use dioxus::prelude::*;
use shared_types::AuthLinks;

use crate::auth::use_identity;
use crate::routes::Route;

/// Sign-in entry point. Hands off to the provider's hosted sign-in screen,
/// or goes home when already signed in.
#[component]
pub fn SignIn() -> Element {
    let identity = use_identity();
    let links = use_context::<AuthLinks>();
    let session = identity.snapshot();

    let handoff = identity.clone();
    use_effect(move || {
        let session = handoff.snapshot();
        if session.loading {
            return;
        }
        if session.identity.is_some() {
            navigator().push(Route::Home {});
        } else {
            handoff.prompt_sign_in();
        }
    });

    rsx! {
        main { class: "sign-in",
            if session.loading || links.sign_in_url.is_some() {
                p { "Redirecting to sign in..." }
            } else {
                p { "Sign-in is not available right now." }
                Link { to: Route::Home {}, "Back to home" }
            }
        }
    }
}
