use access::{IdentityAdapter, IdentityProvider, Navigator, Redirect};
use dioxus::prelude::*;
use shared_types::{AppError, AuthLinks, Identity};

use crate::routes::Route;

/// Session as last reported by the server.
///
/// `loaded` stays false until the first `get_current_identity` call
/// returns, so guards can tell "signed out" from "not known yet".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionState {
    pub identity: Signal<Option<Identity>>,
    pub loaded: Signal<bool>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            identity: Signal::new(None),
            loaded: Signal::new(false),
        }
    }

    pub fn settle(&mut self, identity: Option<Identity>) {
        if *self.identity.peek() != identity {
            self.identity.set(identity);
        }
        if !*self.loaded.peek() {
            self.loaded.set(true);
        }
    }
}

pub fn use_session() -> SessionState {
    use_context::<SessionState>()
}

/// Map a server function error back to the structured error it carries.
pub(crate) fn to_app_error(err: ServerFnError) -> AppError {
    let text = err.to_string();
    AppError::from_server_error(&text).unwrap_or_else(|| AppError::internal(text))
}

/// [`IdentityProvider`] backed by the session signals and the provider's
/// hosted screens.
#[derive(Clone)]
pub struct ServerIdentityProvider {
    session: SessionState,
    links: AuthLinks,
}

impl IdentityProvider for ServerIdentityProvider {
    fn current_identity(&self) -> Option<Identity> {
        self.session.identity.read().clone()
    }

    fn is_session_loaded(&self) -> bool {
        *self.session.loaded.read()
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        server::api::sign_out().await.map_err(to_app_error)?;
        let mut session = self.session;
        session.settle(None);
        Ok(())
    }

    fn open_sign_in(&self) {
        match &self.links.sign_in_url {
            Some(url) => {
                navigator().push(NavigationTarget::<Route>::External(url.clone()));
            }
            None => tracing::warn!("No sign-in URL configured"),
        }
    }

    fn open_sign_up(&self) {
        match &self.links.sign_up_url {
            Some(url) => {
                navigator().push(NavigationTarget::<Route>::External(url.clone()));
            }
            None => tracing::warn!("Sign-up is disabled"),
        }
    }
}

/// [`Navigator`] over the app router.
#[derive(Clone, Copy, Debug, Default)]
pub struct RouterNavigator;

impl Navigator for RouterNavigator {
    fn navigate(&self, to: Redirect) {
        let target = match to {
            Redirect::SignIn => Route::SignIn {},
            Redirect::Home => Route::Home {},
        };
        navigator().push(target);
    }
}

pub type SessionAdapter = IdentityAdapter<ServerIdentityProvider, RouterNavigator>;

/// Hook returning the identity adapter for the current session.
pub fn use_identity() -> SessionAdapter {
    let session = use_session();
    let links = use_context::<AuthLinks>();
    IdentityAdapter::new(ServerIdentityProvider { session, links }, RouterNavigator)
}
