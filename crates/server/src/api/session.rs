use dioxus::prelude::*;
use shared_types::Identity;

#[cfg(feature = "server")]
use super::auth::*;

/// Identity of the caller, or `None` when signed out. Never fails for an
/// anonymous caller; an invalid or expired token reads as signed out.
#[server]
pub async fn get_current_identity() -> Result<Option<Identity>, ServerFnError> {
    Ok(current_claims().map(|claims| claims.identity()))
}

/// End the session: the session cookie is cleared on this response.
/// Succeeds for anonymous callers too.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn sign_out() -> Result<(), ServerFnError> {
    if let Some(claims) = current_claims() {
        tracing::info!(identity_id = %claims.sub, "Signing out");
    }
    crate::auth::cookies::schedule_clear_session();
    Ok(())
}
