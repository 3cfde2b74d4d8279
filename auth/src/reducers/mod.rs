//! Session reducers.
//!
//! [`transitions`] holds the pure state machine: `(state, action) → state'`.
//! [`SessionReducer`] wraps it with the breadcrumb contract and the effects
//! that drive the three resolution phases and the user commands.

pub mod session;
pub mod transitions;

use tenant_session_core::effect::EffectId;

// Re-export
pub use session::SessionReducer;
pub use transitions::apply;

/// Effect ids of the resolution phases and user commands.
///
/// Starting a phase again supersedes its in-flight instance; results of a
/// superseded instance are discarded before they reach the reducer.
pub mod phases {
    use super::EffectId;

    /// Tenant-id lookup.
    pub const TENANT_ID: EffectId = EffectId::new("tenant-id-resolution");

    /// Config resolution for the current tenant id.
    pub const CONFIG: EffectId = EffectId::new("config-resolution");

    /// Session check for the current adapter.
    pub const SESSION: EffectId = EffectId::new("session-check");

    /// Login or logout against the current adapter.
    pub const COMMAND: EffectId = EffectId::new("session-command");

    /// Every phase, in dependency order.
    pub const ALL: [EffectId; 4] = [TENANT_ID, CONFIG, SESSION, COMMAND];
}
