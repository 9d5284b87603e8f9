//! Identity, role resolution and route protection for the back-office.
//!
//! The flow is split in three pieces that the UI wires together:
//!
//! - [`identity`] wraps the external identity provider's session.
//! - [`resolver`] turns a signed-in identity into a role, provisioning the
//!   profile on first sign-in.
//! - [`guard`] decides whether a protected route renders, redirects or waits.
//!
//! Nothing here depends on a UI framework or a database driver; the
//! collaborators are traits so the Dioxus client and the tests can plug in
//! their own implementations.

pub mod guard;
pub mod identity;
pub mod resolver;

pub use guard::{evaluate, GuardState, Redirect};
pub use identity::{IdentityAdapter, IdentityProvider, Navigator, SessionSnapshot};
pub use resolver::{
    resolve_role, FallbackReason, ProfileStore, Provisioner, ResolutionOutcome, RoleState,
    RoleTracker, Ticket,
};
