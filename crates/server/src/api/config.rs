use dioxus::prelude::*;
use shared_types::{AuthLinks, FeatureFlags};

/// Current feature flags. No auth required; flags are not sensitive.
#[server]
pub async fn get_feature_flags() -> Result<FeatureFlags, ServerFnError> {
    Ok(crate::config::feature_flags().clone())
}

/// Hosted identity-provider screens for the sign-in and sign-up prompts.
/// The sign-up link is omitted while the `sign_up` flag is off.
#[server]
pub async fn get_auth_links() -> Result<AuthLinks, ServerFnError> {
    let config = crate::config::IdentityConfig::from_env();
    Ok(config.auth_links(crate::config::feature_flags()))
}
