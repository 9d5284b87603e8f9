use shared_types::{AppError, Identity};

use crate::guard::Redirect;

/// The external identity provider's session, as the app sees it.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Signed-in identity, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// True once the provider has resolved the session at least once.
    fn is_session_loaded(&self) -> bool;

    /// End the provider session.
    async fn sign_out(&self) -> Result<(), AppError>;

    /// Open the provider's sign-in screen.
    fn open_sign_in(&self);

    /// Open the provider's sign-up screen.
    fn open_sign_up(&self);
}

/// Client-side navigation in the host router.
pub trait Navigator {
    fn navigate(&self, to: Redirect);
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub loading: bool,
}

/// Stable `{user, loading, sign_out, prompt_sign_in, prompt_sign_up}` surface
/// over an [`IdentityProvider`].
///
/// Holds no identity of its own: every read goes to the provider.
#[derive(Debug, Clone)]
pub struct IdentityAdapter<P, N> {
    provider: P,
    navigator: N,
}

impl<P: IdentityProvider, N: Navigator> IdentityAdapter<P, N> {
    pub fn new(provider: P, navigator: N) -> Self {
        Self {
            provider,
            navigator,
        }
    }

    pub fn user(&self) -> Option<Identity> {
        self.provider.current_identity()
    }

    pub fn loading(&self) -> bool {
        !self.provider.is_session_loaded()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let loading = self.loading();
        SessionSnapshot {
            identity: if loading { None } else { self.user() },
            loading,
        }
    }

    /// End the session, then go to the public home page.
    ///
    /// Provider failures are logged; the navigation happens regardless.
    pub async fn sign_out(&self) {
        if let Err(err) = self.provider.sign_out().await {
            tracing::error!(error = %err, "Identity provider sign-out failed");
        }
        self.navigator.navigate(Redirect::Home);
    }

    pub fn prompt_sign_in(&self) {
        self.provider.open_sign_in();
    }

    pub fn prompt_sign_up(&self) {
        self.provider.open_sign_up();
    }

    /// Follow a guard redirect.
    pub fn redirect(&self, to: Redirect) {
        self.navigator.navigate(to);
    }
}
