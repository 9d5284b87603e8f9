use access::{resolve_role, ProfileStore, Provisioner, RoleState, RoleTracker};
use dioxus::prelude::*;
use shared_types::{AppError, Identity, Role};

use crate::auth::{to_app_error, use_session, SessionState};

/// Profile lookups through the `get_profile_role` server function.
pub struct ServerProfileStore;

impl ProfileStore for ServerProfileStore {
    async fn find_role(&self, identity_id: &str) -> Result<Option<Role>, AppError> {
        server::api::get_profile_role(identity_id.to_string())
            .await
            .map_err(to_app_error)
    }
}

/// Provisioning through the `sync_user` server function. The server takes
/// id and email from the verified session, not from the argument.
pub struct ServerProvisioner;

impl Provisioner for ServerProvisioner {
    async fn provision(&self, _identity: &Identity) -> Result<(), AppError> {
        server::api::sync_user()
            .await
            .map(|response| {
                tracing::debug!(id = %response.id, created = response.created, "sync-user");
            })
            .map_err(to_app_error)
    }
}

/// App-wide role tracker.
#[derive(Clone, Copy)]
pub struct RoleContext {
    pub tracker: Signal<RoleTracker>,
}

impl RoleContext {
    pub fn new() -> Self {
        Self {
            tracker: Signal::new(RoleTracker::new()),
        }
    }

    /// Resolve the signed-in identity's role again, e.g. after its profile
    /// was changed from the admin screen. Any run still in flight is
    /// superseded.
    pub fn refresh(self, session: SessionState) {
        let identity = session.identity.peek().clone();
        start_resolution(self.tracker, identity);
    }
}

fn start_resolution(mut tracker: Signal<RoleTracker>, identity: Option<Identity>) {
    let ticket = tracker.write().begin(identity.as_ref());
    let Some(identity) = identity else {
        return;
    };

    spawn(async move {
        let outcome = resolve_role(&ServerProfileStore, &ServerProvisioner, Some(&identity)).await;
        tracker.write().complete(&ticket, &outcome);
    });
}

/// Re-resolve the role whenever the session's identity changes.
///
/// Each run takes a ticket from the tracker; a run that finishes after the
/// identity changed again is discarded by [`RoleTracker::complete`].
pub fn use_role_resolution(session: SessionState, roles: RoleContext) {
    let tracker = roles.tracker;
    use_effect(move || {
        if !*session.loaded.read() {
            return;
        }
        let identity = session.identity.read().clone();
        if !tracker.peek().needs_resolution(identity.as_ref()) {
            return;
        }
        start_resolution(tracker, identity);
    });
}

/// Role of the current identity. Pending until resolution for that exact
/// identity has finished.
pub fn use_role() -> RoleState {
    let session = use_session();
    let roles = use_context::<RoleContext>();
    let identity = session.identity.read();
    let state = roles.tracker.read().state_for(identity.as_ref());
    state
}
