//! # Tenant Session Core
//!
//! Core traits and types for the tenant session architecture.
//!
//! This crate provides the fundamental abstractions for building the
//! session orchestration layer as a Reducer over explicit state and actions.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (user intents and I/O results)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use tenant_session_core::*;
//!
//! impl Reducer for GateReducer {
//!     type State = GateState;
//!     type Action = GateAction;
//!     type Environment = GateEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut GateState,
//!         action: GateAction,
//!         env: &GateEnvironment,
//!     ) -> SmallVec<[Effect<GateAction>; 4]> {
//!         match action {
//!             GateAction::Open => {
//!                 state.open = true;
//!                 smallvec![Effect::None]
//!             }
//!         }
//!     }
//! }
//! ```

pub use smallvec::{SmallVec, smallvec};

/// Declarative macros for effect construction
pub mod effect_macros;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Identifier grouping the instances of a cancellable effect
    ///
    /// Starting a new [`Effect::Cancellable`] with an id marks every earlier
    /// instance with the same id as stale: actions they produce afterwards
    /// are dropped by the runtime instead of being reduced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EffectId(&'static str);

    impl EffectId {
        /// Create an effect id from a static name
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(name)
        }

        /// The name this id was created with
        #[must_use]
        pub const fn name(&self) -> &'static str {
            self.0
        }
    }

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run `effect` as the current live instance of `id`
        Cancellable {
            /// Which effect family this instance belongs to
            id: EffectId,
            /// The wrapped effect
            effect: Box<Effect<Action>>,
        },

        /// Mark the live instance of `id` (if any) as stale
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Wrap this effect as the live instance of `id`
        #[must_use]
        pub fn cancellable(self, id: EffectId) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(self),
            }
        }

        /// Whether this effect (or any nested effect) is a live instance of `id`
        #[must_use]
        pub fn is_cancellable_with(&self, id: EffectId) -> bool {
            match self {
                Effect::Cancellable { id: own, effect } => {
                    *own == id || effect.is_cancellable_with(id)
                },
                Effect::Parallel(effects) => effects.iter().any(|e| e.is_cancellable_with(id)),
                Effect::None | Effect::Future(_) | Effect::Cancel(_) => false,
            }
        }

        /// Whether this effect (or any nested effect) cancels `id`
        #[must_use]
        pub fn cancels(&self, id: EffectId) -> bool {
            match self {
                Effect::Cancel(own) => *own == id,
                Effect::Cancellable { effect, .. } => effect.cancels(id),
                Effect::Parallel(effects) => effects.iter().any(|e| e.cancels(id)),
                Effect::None | Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::{Effect, EffectId};

    const PHASE: EffectId = EffectId::new("phase");
    const OTHER: EffectId = EffectId::new("other");

    #[test]
    fn cancellable_is_detected_through_parallel() {
        let effect: Effect<()> = Effect::merge(vec![
            Effect::None,
            Effect::Future(Box::pin(async { None })).cancellable(PHASE),
        ]);

        assert!(effect.is_cancellable_with(PHASE));
        assert!(!effect.is_cancellable_with(OTHER));
    }

    #[test]
    fn cancel_is_detected() {
        let effect: Effect<()> = Effect::merge(vec![Effect::Cancel(OTHER)]);

        assert!(effect.cancels(OTHER));
        assert!(!effect.cancels(PHASE));
    }

    #[test]
    fn effect_id_displays_its_name() {
        assert_eq!(PHASE.to_string(), "phase");
        assert_eq!(PHASE.name(), "phase");
    }
}
