//! Session reducer.
//!
//! Records one breadcrumb per action, applies the pure transition, then
//! returns the effects that drive the next step:
//!
//! ```text
//! tenant-id-fetching ─► TenantIdStore ─► tenant-id-fetched ──┐
//!                                         tenant-id-changed ──┴► config-fetching
//! config-fetching ─► TenantConfigSource + confirm ─► config-fetched ─► session-check-starting
//! session-check-starting ─► SessionAdapter::is_authenticated ─► session-check-finished
//! ```
//!
//! Each phase runs as a cancellable effect. Rescheduling a phase (or
//! `reset`) makes the in-flight instance stale, and the Store drops whatever
//! it produces afterwards.

use super::phases;
use super::transitions::apply;
use crate::actions::AuthAction;
use crate::constants::tags;
use crate::environment::SessionEnvironment;
use crate::error::SessionError;
use crate::providers::{
    DiagnosticsSink, SessionAdapter, SessionAdapterFactory, TenantConfigSource, TenantIdStore,
};
use crate::state::AuthState;
use std::marker::PhantomData;
use std::sync::Arc;
use tenant_session_core::{
    SmallVec, cancellable_effect,
    effect::{Effect, EffectId},
    reducer::Reducer,
    smallvec,
};

/// Session reducer.
///
/// Stateless; the type parameters only tie it to its environment.
pub struct SessionReducer<T, C, F, D> {
    _providers: PhantomData<fn() -> (T, C, F, D)>,
}

impl<T, C, F, D> SessionReducer<T, C, F, D> {
    /// Create a new session reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _providers: PhantomData,
        }
    }
}

impl<T, C, F, D> Default for SessionReducer<T, C, F, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, F, D> Clone for SessionReducer<T, C, F, D> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T, C, F, D> std::fmt::Debug for SessionReducer<T, C, F, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionReducer")
    }
}

impl<T, C, F, D> SessionReducer<T, C, F, D>
where
    T: TenantIdStore + Clone + 'static,
    C: TenantConfigSource + Clone + 'static,
    F: SessionAdapterFactory + Clone + 'static,
    D: DiagnosticsSink + Clone + 'static,
{
    /// Tenant-id phase: read the stored tenant id.
    fn fetch_tenant_id(env: &SessionEnvironment<T, C, F, D>) -> Effect<AuthAction> {
        let tenant_ids = env.tenant_ids.clone();
        let diagnostics = env.diagnostics.clone();

        cancellable_effect! {
            id: phases::TENANT_ID,
            async {
                match tenant_ids.fetch_tenant_id().await {
                    Ok(tenant_id) => {
                        if let Some(id) = tenant_id.as_deref().filter(|id| !id.is_empty()) {
                            diagnostics.set_tag(tags::TENANT_ID, id);
                        }
                        Some(AuthAction::TenantIdFetched { tenant_id })
                    },
                    Err(error) => {
                        tracing::warn!(error = %error, "Tenant id lookup failed");
                        diagnostics.record_exception(&error);
                        Some(AuthAction::TenantIdFetchFailed)
                    },
                }
            }
        }
    }

    /// Config phase, first step: hand over to `config-fetching` under the phase id.
    fn schedule_config(tenant_id: String) -> Effect<AuthAction> {
        cancellable_effect! {
            id: phases::CONFIG,
            async {
                Some(AuthAction::ConfigFetching { tenant_id })
            }
        }
    }

    /// Config phase: resolve the config, confirm the tenant id, then apply.
    fn resolve_config(
        tenant_id: String,
        env: &SessionEnvironment<T, C, F, D>,
    ) -> Effect<AuthAction> {
        let configs = env.configs.clone();
        let tenant_ids = env.tenant_ids.clone();
        let diagnostics = env.diagnostics.clone();

        cancellable_effect! {
            id: phases::CONFIG,
            async {
                let config = match configs.fetch_tenant_config(&tenant_id).await {
                    Ok(Some(config)) => config,
                    Ok(None) => {
                        tracing::info!(tenant_id = %tenant_id, "Tenant id not recognized");
                        diagnostics.record_breadcrumb(&format!("Invalid company code: {tenant_id}"), None);
                        return None;
                    },
                    Err(error) => {
                        tracing::warn!(tenant_id = %tenant_id, error = %error, "Config resolution failed");
                        diagnostics.record_exception(&error);
                        return Some(AuthAction::ConfigFetchFailed { tenant_id });
                    },
                };

                diagnostics.set_tag(tags::TENANT_ID, &tenant_id);

                // The tenant is durably valid before the config is applied
                if let Err(error) = tenant_ids.confirm_tenant_id(&tenant_id).await {
                    tracing::warn!(tenant_id = %tenant_id, error = %error, "Could not persist tenant id");
                    diagnostics.record_exception(&error);
                    return Some(AuthAction::ConfigFetchFailed { tenant_id });
                }

                Some(AuthAction::ConfigFetched { tenant_id, config })
            }
        }
    }

    /// Revoke the live instances of `ids` in one step.
    fn revoke(ids: &[EffectId]) -> Effect<AuthAction> {
        Effect::merge(ids.iter().copied().map(Effect::Cancel).collect())
    }

    /// Session phase, first step: hand over to `session-check-starting`.
    fn schedule_session_check() -> Effect<AuthAction> {
        cancellable_effect! {
            id: phases::SESSION,
            async {
                Some(AuthAction::SessionCheckStarting)
            }
        }
    }

    /// Session phase: ask the adapter whether the session is valid.
    ///
    /// A failing check is reported and counts as "not authenticated".
    fn check_session(
        adapter: Option<Arc<dyn SessionAdapter>>,
        env: &SessionEnvironment<T, C, F, D>,
    ) -> Effect<AuthAction> {
        let diagnostics = env.diagnostics.clone();

        cancellable_effect! {
            id: phases::SESSION,
            async {
                let authenticated = match adapter {
                    Some(adapter) => adapter.is_authenticated().await.unwrap_or_else(|error| {
                        tracing::warn!(error = %error, "Session check failed");
                        diagnostics.record_exception(&error);
                        false
                    }),
                    None => false,
                };
                Some(AuthAction::SessionCheckFinished { authenticated })
            }
        }
    }

    /// Sign-in command: run login and classify the outcome.
    fn login(
        adapter: Option<Arc<dyn SessionAdapter>>,
        env: &SessionEnvironment<T, C, F, D>,
    ) -> Effect<AuthAction> {
        let diagnostics = env.diagnostics.clone();

        cancellable_effect! {
            id: phases::COMMAND,
            async {
                let Some(adapter) = adapter else {
                    tracing::warn!("Sign-in requested before a session adapter exists");
                    diagnostics.record_exception(&SessionError::NoSessionAdapter);
                    return Some(AuthAction::SigninFailed);
                };

                match adapter.login().await {
                    Ok(()) => Some(AuthAction::SigninSucceeded),
                    Err(error) if error.is_user_cancellation() => {
                        tracing::debug!("Login dismissed by user");
                        Some(AuthAction::SigninCancelled)
                    },
                    Err(error) => {
                        tracing::warn!(error = %error, "Login failed");
                        diagnostics.record_exception(&error);
                        Some(AuthAction::SigninFailed)
                    },
                }
            }
        }
    }

    /// Sign-out command: logout failures are reported and swallowed.
    fn logout(
        adapter: Option<Arc<dyn SessionAdapter>>,
        env: &SessionEnvironment<T, C, F, D>,
    ) -> Effect<AuthAction> {
        let diagnostics = env.diagnostics.clone();

        cancellable_effect! {
            id: phases::COMMAND,
            async {
                if let Some(adapter) = adapter {
                    if let Err(error) = adapter.logout().await {
                        tracing::warn!(error = %error, "Logout failed");
                        diagnostics.record_exception(&error);
                    }
                }
                Some(AuthAction::SignoutSucceeded)
            }
        }
    }
}

impl<T, C, F, D> Reducer for SessionReducer<T, C, F, D>
where
    T: TenantIdStore + Clone + 'static,
    C: TenantConfigSource + Clone + 'static,
    F: SessionAdapterFactory + Clone + 'static,
    D: DiagnosticsSink + Clone + 'static,
{
    type State = AuthState;
    type Action = AuthAction;
    type Environment = SessionEnvironment<T, C, F, D>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        // Breadcrumb first, before the state changes
        env.diagnostics.record_breadcrumb(action.name(), action.data());
        tracing::debug!(action = action.name(), "Applying session transition");

        let previous_company_code = state.company_code.clone();
        apply(state, &action);

        match action {
            // ═══════════════════════════════════════════════════════════════
            // Tenant-id phase
            // ═══════════════════════════════════════════════════════════════
            AuthAction::TenantIdFetching => smallvec![Self::fetch_tenant_id(env)],

            AuthAction::TenantIdFetched { .. } | AuthAction::TenantIdChanged { .. } => {
                if state.company_code == previous_company_code {
                    return smallvec![Effect::None];
                }

                // The check and commands in flight belong to the previous tenant's adapter
                let previous_adapter = Self::revoke(&[phases::SESSION, phases::COMMAND]);

                match state.company_code.clone() {
                    Some(tenant_id) => {
                        smallvec![previous_adapter, Self::schedule_config(tenant_id)]
                    },
                    None => smallvec![previous_adapter, Effect::Cancel(phases::CONFIG)],
                }
            },

            AuthAction::TenantIdFetchFailed => smallvec![Effect::None],

            // ═══════════════════════════════════════════════════════════════
            // Config phase
            // ═══════════════════════════════════════════════════════════════
            AuthAction::ConfigFetching { tenant_id } => {
                smallvec![Self::resolve_config(tenant_id, env)]
            },

            AuthAction::ConfigFetched { config, .. } => {
                state.session_adapter = Some(env.adapters.build(&config));

                // Commands against the previous adapter no longer apply
                smallvec![
                    Effect::Cancel(phases::COMMAND),
                    Self::schedule_session_check(),
                ]
            },

            AuthAction::ConfigFetchFailed { .. } => smallvec![Effect::None],

            // ═══════════════════════════════════════════════════════════════
            // Session phase
            // ═══════════════════════════════════════════════════════════════
            AuthAction::SessionCheckStarting => {
                smallvec![Self::check_session(state.session_adapter.clone(), env)]
            },

            AuthAction::SessionCheckFinished { .. } => smallvec![Effect::None],

            // ═══════════════════════════════════════════════════════════════
            // User commands
            // ═══════════════════════════════════════════════════════════════
            AuthAction::SigninStarted => {
                smallvec![Self::login(state.session_adapter.clone(), env)]
            },

            AuthAction::SignoutStarted => {
                smallvec![Self::logout(state.session_adapter.clone(), env)]
            },

            AuthAction::SigninSucceeded
            | AuthAction::SigninCancelled
            | AuthAction::SigninFailed
            | AuthAction::SignoutSucceeded
            | AuthAction::TokenRefreshFailed => smallvec![Effect::None],

            AuthAction::Reset => smallvec![Self::revoke(&phases::ALL)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{
        MockAdapterFactory, MockSessionAdapter, MockTenantConfigSource, MockTenantIdStore,
        RecordingDiagnostics,
    };
    use crate::state::TenantConfig;
    use tenant_session_testing::{ReducerTest, assertions};

    type TestReducer = SessionReducer<
        MockTenantIdStore,
        MockTenantConfigSource,
        MockAdapterFactory,
        RecordingDiagnostics,
    >;

    fn env(
        diagnostics: RecordingDiagnostics,
    ) -> SessionEnvironment<MockTenantIdStore, MockTenantConfigSource, MockAdapterFactory, RecordingDiagnostics>
    {
        SessionEnvironment::new(
            MockTenantIdStore::new(),
            MockTenantConfigSource::new(),
            MockAdapterFactory::new(MockSessionAdapter::new()),
            diagnostics,
        )
    }

    #[test]
    fn test_breadcrumb_recorded_for_every_action() {
        let diagnostics = RecordingDiagnostics::new();
        let recorded = diagnostics.clone();

        ReducerTest::new(TestReducer::new())
            .with_env(env(diagnostics))
            .given_state(AuthState::default())
            .when_action(AuthAction::TenantIdFetching)
            .when_action(AuthAction::SigninCancelled)
            .run();

        assert_eq!(
            recorded.breadcrumbs(),
            vec!["tenant-id-fetching".to_string(), "signin-cancelled".to_string()]
        );
        assert!(recorded.exceptions().is_empty());
    }

    #[test]
    fn test_tenant_id_fetching_starts_cancellable_lookup() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(RecordingDiagnostics::new()))
            .given_state(AuthState::default())
            .when_action(AuthAction::TenantIdFetching)
            .then_state(|state| {
                assert!(state.loading);
                assert!(!state.show_sign_in);
            })
            .then_effects(|effects| {
                assertions::assert_has_cancellable_effect(effects, phases::TENANT_ID);
            })
            .run();
    }

    #[test]
    fn test_new_tenant_id_schedules_config_resolution() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(RecordingDiagnostics::new()))
            .given_state(AuthState::default())
            .when_action(AuthAction::TenantIdFetched {
                tenant_id: Some("acme-company".to_string()),
            })
            .then_effects(|effects| {
                assertions::assert_has_cancellable_effect(effects, phases::CONFIG);
            })
            .run();
    }

    #[test]
    fn test_unchanged_tenant_id_does_not_refetch() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(RecordingDiagnostics::new()))
            .given_state(AuthState {
                company_code: Some("acme".to_string()),
                ..AuthState::default()
            })
            .when_action(AuthAction::TenantIdChanged {
                tenant_id: Some("acme".to_string()),
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_clearing_tenant_id_cancels_config_resolution() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(RecordingDiagnostics::new()))
            .given_state(AuthState {
                company_code: Some("acme".to_string()),
                ..AuthState::default()
            })
            .when_action(AuthAction::TenantIdChanged {
                tenant_id: Some(String::new()),
            })
            .then_state(|state| assert_eq!(state.company_code, None))
            .then_effects(|effects| assertions::assert_cancels(effects, phases::CONFIG))
            .run();
    }

    #[test]
    fn test_tenant_change_revokes_previous_adapter_work() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(RecordingDiagnostics::new()))
            .given_state(AuthState {
                loading: false,
                company_code: Some("old".to_string()),
                api_host: Some("https://old.x".to_string()),
                ..AuthState::default()
            })
            .when_action(AuthAction::TenantIdChanged {
                tenant_id: Some("new".to_string()),
            })
            .then_effects(|effects| {
                assertions::assert_cancels(effects, phases::SESSION);
                assertions::assert_cancels(effects, phases::COMMAND);
                assertions::assert_has_cancellable_effect(effects, phases::CONFIG);
            })
            .run();
    }

    #[test]
    fn test_clearing_tenant_id_revokes_previous_adapter_work() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(RecordingDiagnostics::new()))
            .given_state(AuthState {
                company_code: Some("old".to_string()),
                ..AuthState::default()
            })
            .when_action(AuthAction::TenantIdChanged { tenant_id: None })
            .then_effects(|effects| {
                assertions::assert_cancels(effects, phases::SESSION);
                assertions::assert_cancels(effects, phases::COMMAND);
            })
            .run();
    }

    #[test]
    fn test_config_fetched_builds_adapter_and_checks_session() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(RecordingDiagnostics::new()))
            .given_state(AuthState::default())
            .when_action(AuthAction::ConfigFetched {
                tenant_id: "acme".to_string(),
                config: TenantConfig::new("https://acme.example.com"),
            })
            .then_state(|state| {
                assert!(state.session_adapter.is_some());
                assert_eq!(state.api_host.as_deref(), Some("https://acme.example.com"));
            })
            .then_effects(|effects| {
                assertions::assert_cancels(effects, phases::COMMAND);
                assertions::assert_has_cancellable_effect(effects, phases::SESSION);
            })
            .run();
    }

    #[test]
    fn test_reset_cancels_every_phase() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(RecordingDiagnostics::new()))
            .given_state(AuthState {
                loading: false,
                authenticated: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::Reset)
            .then_state(|state| assert_eq!(*state, AuthState::default()))
            .then_effects(|effects| {
                for phase in phases::ALL {
                    assertions::assert_cancels(effects, phase);
                }
            })
            .run();
    }
}
