//! Integration tests for cancellable effects
//!
//! Superseded and cancelled effect instances keep running, but the actions
//! they produce must never reach the reducer or the action broadcast.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tenant_session_core::effect::{Effect, EffectId};
use tenant_session_core::{SmallVec, cancellable_effect, smallvec};
use tenant_session_runtime::Store;
use tokio::sync::Notify;

const RESOLVE: EffectId = EffectId::new("resolve");
const SETTLE: Duration = Duration::from_secs(2);

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone)]
enum ResolveAction {
    /// Start resolving, waiting on the gate before reporting back
    Resolve { attempt: usize, gate: Arc<Notify> },
    /// Resolution finished
    Resolved { attempt: usize },
    /// Abandon the in-flight resolution
    Abandon,
    /// Chain: schedule a resolve through a cancellable kick
    Kick { attempt: usize, gate: Arc<Notify> },
}

#[derive(Debug, Clone, Default)]
struct ResolveState {
    resolved: Vec<usize>,
}

#[derive(Clone)]
struct ResolveEnvironment;

#[derive(Clone)]
struct ResolveReducer;

impl tenant_session_core::reducer::Reducer for ResolveReducer {
    type State = ResolveState;
    type Action = ResolveAction;
    type Environment = ResolveEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ResolveAction::Resolve { attempt, gate } => smallvec![cancellable_effect! {
                id: RESOLVE,
                async {
                    gate.notified().await;
                    Some(ResolveAction::Resolved { attempt })
                }
            }],
            ResolveAction::Kick { attempt, gate } => smallvec![cancellable_effect! {
                id: RESOLVE,
                async {
                    Some(ResolveAction::Resolve { attempt, gate })
                }
            }],
            ResolveAction::Resolved { attempt } => {
                state.resolved.push(attempt);
                smallvec![Effect::None]
            },
            ResolveAction::Abandon => smallvec![Effect::Cancel(RESOLVE)],
        }
    }
}

type ResolveStore = Store<ResolveState, ResolveAction, ResolveEnvironment, ResolveReducer>;

fn store() -> ResolveStore {
    Store::new(ResolveState::default(), ResolveReducer, ResolveEnvironment)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn only_latest_instance_is_reduced() {
    let store = store();
    let gates: Vec<_> = (0..3).map(|_| Arc::new(Notify::new())).collect();

    for (attempt, gate) in gates.iter().enumerate() {
        store
            .send(ResolveAction::Resolve { attempt, gate: Arc::clone(gate) })
            .await
            .unwrap();
    }

    // Release in reverse so stale results arrive last
    for gate in gates.iter().rev() {
        gate.notify_one();
    }
    store.settled(SETTLE).await.unwrap();

    assert_eq!(store.state(|s| s.resolved.clone()).await, vec![2]);
}

#[tokio::test]
async fn abandon_drops_result_and_broadcast() {
    let store = store();
    let mut observed = store.subscribe_actions();
    let gate = Arc::new(Notify::new());

    store
        .send(ResolveAction::Resolve { attempt: 0, gate: Arc::clone(&gate) })
        .await
        .unwrap();
    store.send(ResolveAction::Abandon).await.unwrap();
    gate.notify_one();
    store.settled(SETTLE).await.unwrap();

    assert!(store.state(|s| s.resolved.is_empty()).await);
    assert!(observed.try_recv().is_err());
}

#[tokio::test]
async fn kicked_instance_inherits_staleness() {
    let store = store();
    let first = Arc::new(Notify::new());
    let second = Arc::new(Notify::new());

    store
        .send(ResolveAction::Kick { attempt: 1, gate: Arc::clone(&first) })
        .await
        .unwrap();
    // Wait until the kick has been reduced into a running resolve
    tokio::time::sleep(Duration::from_millis(20)).await;

    store
        .send(ResolveAction::Resolve { attempt: 2, gate: Arc::clone(&second) })
        .await
        .unwrap();
    first.notify_one();
    second.notify_one();
    store.settled(SETTLE).await.unwrap();

    assert_eq!(store.state(|s| s.resolved.clone()).await, vec![2]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn release_order_never_leaks_stale_results(order in Just((0..5usize).collect::<Vec<_>>()).prop_shuffle()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let resolved = runtime.block_on(async {
            let store = store();
            let gates: Vec<_> = (0..5).map(|_| Arc::new(Notify::new())).collect();

            for (attempt, gate) in gates.iter().enumerate() {
                store
                    .send(ResolveAction::Resolve { attempt, gate: Arc::clone(gate) })
                    .await
                    .unwrap();
            }
            for index in &order {
                gates[*index].notify_one();
            }
            store.settled(SETTLE).await.unwrap();

            store.state(|s| s.resolved.clone()).await
        });

        prop_assert_eq!(resolved, vec![4]);
    }
}
