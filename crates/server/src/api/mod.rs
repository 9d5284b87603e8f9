#[cfg(feature = "server")]
pub(crate) mod auth;

mod config;
pub use config::*;

mod profile;
pub use profile::*;

mod session;
pub use session::*;
