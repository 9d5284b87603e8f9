use shared_types::{Identity, Role};

/// Where a guard sends the visitor instead of rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// The sign-in entry point.
    SignIn,
    /// The public home page.
    Home,
}

impl Redirect {
    pub fn path(&self) -> &'static str {
        match self {
            Redirect::SignIn => "/sign-in",
            Redirect::Home => "/",
        }
    }
}

/// Decision for a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Session or role not settled yet. Render nothing, do not redirect.
    Loading,
    /// Settled without an identity.
    Unauthenticated,
    /// Signed in, but the required role does not match.
    Forbidden,
    /// Signed in and either no role is required or it matches.
    Authorized,
}

impl GuardState {
    pub fn redirect(&self) -> Option<Redirect> {
        match self {
            GuardState::Unauthenticated => Some(Redirect::SignIn),
            GuardState::Forbidden => Some(Redirect::Home),
            GuardState::Loading | GuardState::Authorized => None,
        }
    }

    pub fn renders_children(&self) -> bool {
        matches!(self, GuardState::Authorized)
    }
}

/// Derive the guard state from the upstream `(identity, role, loading)` triple.
///
/// `loading` must be true while either the session or the role resolution is
/// pending. A missing role only matters when a role is required, in which
/// case it never matches.
pub fn evaluate(
    loading: bool,
    identity: Option<&Identity>,
    role: Option<Role>,
    required: Option<Role>,
) -> GuardState {
    if loading {
        return GuardState::Loading;
    }
    if identity.is_none() {
        return GuardState::Unauthenticated;
    }
    match required {
        None => GuardState::Authorized,
        Some(required) if role == Some(required) => GuardState::Authorized,
        Some(_) => GuardState::Forbidden,
    }
}
