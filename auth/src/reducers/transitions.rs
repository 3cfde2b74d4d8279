//! Pure state transitions.
//!
//! No I/O and no diagnostics: only flag and field updates. Adapter
//! construction happens in [`SessionReducer`](super::SessionReducer) because
//! it needs the environment.

use crate::actions::AuthAction;
use crate::state::AuthState;

/// Apply `action` to `state`.
///
/// Every transition that raises `show_sign_in` clears `authenticated`, so
/// the two are never set together.
pub fn apply(state: &mut AuthState, action: &AuthAction) {
    match action {
        AuthAction::TenantIdFetching => {
            state.loading = true;
            state.show_sign_in = false;
        },

        AuthAction::TenantIdFetched { tenant_id } => {
            let tenant_id = normalize(tenant_id.as_deref());
            state.company_code.clone_from(&tenant_id);
            if tenant_id.is_none() {
                require_sign_in(state);
            } else {
                state.show_sign_in = false;
            }
            state.default_company_code = tenant_id;
            state.loading = false;
        },

        AuthAction::TenantIdFetchFailed => {
            state.company_code = None;
            require_sign_in(state);
            state.loading = false;
        },

        AuthAction::TenantIdChanged { tenant_id } => {
            state.company_code = normalize(tenant_id.as_deref());
            state.loading = false;
        },

        AuthAction::ConfigFetching { .. }
        | AuthAction::SessionCheckStarting
        | AuthAction::SigninStarted
        | AuthAction::SignoutStarted => {
            state.loading = true;
        },

        AuthAction::ConfigFetched { config, .. } => {
            state.api_host = Some(config.api_host.clone());
            state.company_code_is_valid = true;
            require_sign_in(state);
            state.loading = false;
        },

        AuthAction::ConfigFetchFailed { .. } => {
            state.company_code_is_valid = false;
            require_sign_in(state);
            state.loading = false;
        },

        AuthAction::SessionCheckFinished { authenticated } => {
            state.authenticated = *authenticated;
            state.show_sign_in = !*authenticated;
            state.loading = false;
        },

        AuthAction::SigninSucceeded => {
            state.authenticated = true;
            state.show_sign_in = false;
            state.loading = false;
        },

        AuthAction::SigninCancelled
        | AuthAction::SigninFailed
        | AuthAction::SignoutSucceeded
        | AuthAction::TokenRefreshFailed => {
            require_sign_in(state);
            state.loading = false;
        },

        AuthAction::Reset => {
            *state = AuthState::default();
        },
    }
}

/// Empty tenant ids mean "no tenant".
fn normalize(tenant_id: Option<&str>) -> Option<String> {
    tenant_id.filter(|id| !id.is_empty()).map(str::to_owned)
}

fn require_sign_in(state: &mut AuthState) {
    state.show_sign_in = true;
    state.authenticated = false;
}
