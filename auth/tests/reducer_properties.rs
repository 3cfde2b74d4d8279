//! Property tests for the session state machine.
//!
//! Arbitrary action sequences, including ones the orchestration never
//! produces, must keep the state consistent.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use proptest::prelude::*;
use tenant_session_auth::{
    AuthAction, AuthState, SessionEnvironment, SessionReducer, TenantConfig,
    mocks::{
        MockAdapterFactory, MockSessionAdapter, MockTenantConfigSource, MockTenantIdStore,
        RecordingDiagnostics,
    },
    reducers::apply,
};
use tenant_session_core::reducer::Reducer;

type TestReducer =
    SessionReducer<MockTenantIdStore, MockTenantConfigSource, MockAdapterFactory, RecordingDiagnostics>;
type TestEnvironment = SessionEnvironment<
    MockTenantIdStore,
    MockTenantConfigSource,
    MockAdapterFactory,
    RecordingDiagnostics,
>;

fn environment() -> TestEnvironment {
    SessionEnvironment::new(
        MockTenantIdStore::new(),
        MockTenantConfigSource::new(),
        MockAdapterFactory::new(MockSessionAdapter::new()),
        RecordingDiagnostics::new(),
    )
}

fn tenant_id() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("acme".to_string())),
        Just(Some("beta".to_string())),
    ]
}

fn action() -> impl Strategy<Value = AuthAction> {
    prop_oneof![
        Just(AuthAction::TenantIdFetching),
        tenant_id().prop_map(|tenant_id| AuthAction::TenantIdFetched { tenant_id }),
        Just(AuthAction::TenantIdFetchFailed),
        tenant_id().prop_map(|tenant_id| AuthAction::TenantIdChanged { tenant_id }),
        Just(AuthAction::ConfigFetching {
            tenant_id: "acme".into()
        }),
        Just(AuthAction::ConfigFetched {
            tenant_id: "acme".into(),
            config: TenantConfig::new("https://acme.x"),
        }),
        Just(AuthAction::ConfigFetchFailed {
            tenant_id: "acme".into()
        }),
        Just(AuthAction::SessionCheckStarting),
        any::<bool>().prop_map(|authenticated| AuthAction::SessionCheckFinished { authenticated }),
        Just(AuthAction::SigninStarted),
        Just(AuthAction::SigninSucceeded),
        Just(AuthAction::SigninCancelled),
        Just(AuthAction::SigninFailed),
        Just(AuthAction::SignoutStarted),
        Just(AuthAction::SignoutSucceeded),
        Just(AuthAction::TokenRefreshFailed),
        Just(AuthAction::Reset),
    ]
}

fn actions() -> impl Strategy<Value = Vec<AuthAction>> {
    prop::collection::vec(action(), 0..40)
}

proptest! {
    #[test]
    fn authenticated_and_sign_in_are_exclusive(actions in actions()) {
        let mut state = AuthState::default();
        for action in &actions {
            apply(&mut state, action);
            prop_assert!(
                !(state.authenticated && state.show_sign_in),
                "both flags set after {action}"
            );
        }
    }

    #[test]
    fn reset_restores_initial_state(actions in actions()) {
        let reducer = TestReducer::new();
        let env = environment();
        let mut state = AuthState::default();

        for action in actions {
            let _effects = reducer.reduce(&mut state, action, &env);
        }
        let _effects = reducer.reduce(&mut state, AuthAction::Reset, &env);

        prop_assert_eq!(state, AuthState::default());
    }

    #[test]
    fn repeated_signed_out_check_is_idempotent(actions in actions()) {
        let mut once = AuthState::default();
        for action in &actions {
            apply(&mut once, action);
        }
        let mut twice = once.clone();

        let finished = AuthAction::SessionCheckFinished { authenticated: false };
        apply(&mut once, &finished);
        apply(&mut twice, &finished);
        apply(&mut twice, &finished);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn every_action_leaves_one_breadcrumb(actions in actions()) {
        let reducer = TestReducer::new();
        let env = environment();
        let mut state = AuthState::default();

        for action in actions.iter().cloned() {
            let _effects = reducer.reduce(&mut state, action, &env);
        }

        let names: Vec<&str> = actions.iter().map(AuthAction::name).collect();
        prop_assert_eq!(env.diagnostics.breadcrumbs(), names);
    }
}
