use dioxus::prelude::*;
use shared_types::{AppError, Profile, Role};

use crate::auth::use_session;
use crate::role::RoleContext;

/// Admin screen: every profile with an out-of-band role picker.
#[component]
pub fn AdminProfiles() -> Element {
    let mut profiles = use_resource(|| async { server::api::list_profiles().await });
    let mut error_msg = use_signal(|| Option::<String>::None);
    let session = use_session();
    let roles = use_context::<RoleContext>();

    let assign = move |id: String, role: String| async move {
        error_msg.set(None);
        match server::api::set_profile_role(id, role).await {
            Ok(updated) => {
                tracing::info!(profile_id = %updated.id, role = %updated.role, "Role assigned");
                if session.identity.peek().as_ref().is_some_and(|i| i.id == updated.id) {
                    roles.refresh(session);
                }
                profiles.restart();
            }
            Err(e) => error_msg.set(Some(AppError::friendly_message(&e.to_string()))),
        }
    };

    let rows: Option<Result<Vec<Profile>, String>> = profiles.read().as_ref().map(|r| match r {
        Ok(list) => Ok(list.clone()),
        Err(e) => Err(AppError::friendly_message(&e.to_string())),
    });

    rsx! {
        main { class: "admin-profiles",
            h1 { "Profiles" }
            if let Some(msg) = error_msg() {
                p { class: "error", "{msg}" }
            }
            match rows {
                None => rsx! {},
                Some(Err(msg)) => rsx! { p { class: "error", "{msg}" } },
                Some(Ok(list)) => rsx! {
                    table {
                        thead {
                            tr { th { "Email" } th { "Role" } }
                        }
                        tbody {
                            for profile in list {
                                tr { key: "{profile.id}",
                                    td { "{profile.email}" }
                                    td {
                                        select {
                                            value: "{profile.role}",
                                            onchange: {
                                                let id = profile.id.clone();
                                                move |evt: FormEvent| assign(id.clone(), evt.value())
                                            },
                                            for role in [Role::Admin, Role::Editor, Role::Cliente] {
                                                option { value: "{role}", selected: role == profile.role, "{role}" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
