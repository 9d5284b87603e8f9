use shared_types::{AppError, Identity, Role};

/// Read side of the profile store.
#[allow(async_fn_in_trait)]
pub trait ProfileStore {
    /// Look up the role stored for `identity_id`.
    ///
    /// `Ok(None)` means the query succeeded and no profile exists yet; any
    /// other failure is an `Err`.
    async fn find_role(&self, identity_id: &str) -> Result<Option<Role>, AppError>;
}

/// Creates a profile for an identity that does not have one yet.
///
/// Implementations must insert only when absent and never overwrite an
/// existing role.
#[allow(async_fn_in_trait)]
pub trait Provisioner {
    async fn provision(&self, identity: &Identity) -> Result<(), AppError>;
}

/// Steps of the resolution protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Lookup,
    Provision,
    Relookup { provisioned: bool },
    Fallback(FallbackReason),
}

/// Why a resolution ended on the default role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Provisioning failed and the profile is still missing.
    ProvisioningFailed,
    /// Provisioning reported success but the re-query found no row.
    StillMissing,
    /// The re-query itself failed.
    RelookupFailed,
}

/// Terminal result of [`resolve_role`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    /// No identity; nothing to resolve.
    SignedOut,
    /// The profile existed on the first lookup.
    Found(Role),
    /// The profile was missing and appeared after provisioning.
    Provisioned(Role),
    /// Provisioning did not yield a profile; the default role applies.
    Fallback { role: Role, reason: FallbackReason },
    /// The first lookup failed for a reason other than a missing row.
    Unavailable(AppError),
}

impl ResolutionOutcome {
    /// Role to expose to the UI. `None` for signed-out and unavailable.
    pub fn role(&self) -> Option<Role> {
        match self {
            ResolutionOutcome::Found(role) | ResolutionOutcome::Provisioned(role) => Some(*role),
            ResolutionOutcome::Fallback { role, .. } => Some(*role),
            ResolutionOutcome::SignedOut | ResolutionOutcome::Unavailable(_) => None,
        }
    }
}

/// Resolve the role of `identity`.
///
/// Runs `lookup → provision-if-missing → re-lookup → fallback`. Provisioning
/// is attempted at most once and the profile is re-queried exactly once
/// after it, whatever provisioning returned. Every path terminates.
pub async fn resolve_role<S, P>(
    store: &S,
    provisioner: &P,
    identity: Option<&Identity>,
) -> ResolutionOutcome
where
    S: ProfileStore + ?Sized,
    P: Provisioner + ?Sized,
{
    let Some(identity) = identity else {
        return ResolutionOutcome::SignedOut;
    };

    let mut phase = Phase::Lookup;
    loop {
        phase = match phase {
            Phase::Lookup => match store.find_role(&identity.id).await {
                Ok(Some(role)) => return ResolutionOutcome::Found(role),
                Ok(None) => Phase::Provision,
                Err(err) => {
                    tracing::error!(identity_id = %identity.id, error = %err, "Profile lookup failed");
                    return ResolutionOutcome::Unavailable(err);
                }
            },
            Phase::Provision => match provisioner.provision(identity).await {
                Ok(()) => {
                    tracing::info!(identity_id = %identity.id, "Provisioned missing profile");
                    Phase::Relookup { provisioned: true }
                }
                Err(err) => {
                    tracing::error!(identity_id = %identity.id, error = %err, "Profile provisioning failed");
                    Phase::Relookup { provisioned: false }
                }
            },
            Phase::Relookup { provisioned } => match store.find_role(&identity.id).await {
                Ok(Some(role)) => return ResolutionOutcome::Provisioned(role),
                Ok(None) if provisioned => Phase::Fallback(FallbackReason::StillMissing),
                Ok(None) => Phase::Fallback(FallbackReason::ProvisioningFailed),
                Err(err) => {
                    tracing::error!(identity_id = %identity.id, error = %err, "Profile re-lookup failed");
                    Phase::Fallback(FallbackReason::RelookupFailed)
                }
            },
            Phase::Fallback(reason) => {
                tracing::warn!(
                    identity_id = %identity.id,
                    ?reason,
                    role = %Role::DEFAULT,
                    "Falling back to default role"
                );
                return ResolutionOutcome::Fallback {
                    role: Role::DEFAULT,
                    reason,
                };
            }
        };
    }
}

/// Role as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleState {
    pub role: Option<Role>,
    pub loading: bool,
}

impl RoleState {
    pub fn pending() -> Self {
        Self {
            role: None,
            loading: true,
        }
    }

    pub fn settled(role: Option<Role>) -> Self {
        Self {
            role,
            loading: false,
        }
    }
}

impl Default for RoleState {
    fn default() -> Self {
        Self::pending()
    }
}

/// Handle for one resolution run, returned by [`RoleTracker::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    identity_id: Option<String>,
}

impl Ticket {
    pub fn identity_id(&self) -> Option<&str> {
        self.identity_id.as_deref()
    }
}

/// Tracks the latest resolution so results for a superseded identity are
/// dropped.
///
/// Each identity change calls [`begin`](Self::begin), which bumps the
/// generation. [`complete`](Self::complete) only applies an outcome whose
/// ticket carries the current generation.
#[derive(Debug, Clone, Default)]
pub struct RoleTracker {
    generation: u64,
    started: bool,
    identity_id: Option<String>,
    state: RoleState,
}

impl RoleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start resolving for `identity`. A missing identity settles at once
    /// with no role.
    pub fn begin(&mut self, identity: Option<&Identity>) -> Ticket {
        self.generation += 1;
        self.started = true;
        self.identity_id = identity.map(|i| i.id.clone());
        self.state = match identity {
            Some(_) => RoleState::pending(),
            None => RoleState::settled(None),
        };
        Ticket {
            generation: self.generation,
            identity_id: self.identity_id.clone(),
        }
    }

    /// Apply `outcome` if `ticket` is still current. Returns whether it was applied.
    pub fn complete(&mut self, ticket: &Ticket, outcome: &ResolutionOutcome) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                identity_id = ticket.identity_id.as_deref().unwrap_or("-"),
                stale_generation = ticket.generation,
                current_generation = self.generation,
                "Discarding stale role resolution"
            );
            return false;
        }
        self.state = RoleState::settled(outcome.role());
        true
    }

    /// Whether `identity` differs from the one the tracker last began for.
    pub fn needs_resolution(&self, identity: Option<&Identity>) -> bool {
        !self.started || self.identity_id.as_deref() != identity.map(|i| i.id.as_str())
    }

    /// Latest state, whatever identity it belongs to.
    pub fn state(&self) -> RoleState {
        self.state
    }

    /// State for `identity`; pending while the tracker still holds another
    /// identity's result, so a previous user's role is never shown.
    pub fn state_for(&self, identity: Option<&Identity>) -> RoleState {
        if self.needs_resolution(identity) {
            RoleState::pending()
        } else {
            self.state
        }
    }
}
