//! Liveness flags for cancellable effects
//!
//! Every running instance of an [`Effect::Cancellable`] owns a flag captured
//! when the instance starts. Starting a newer instance with the same
//! [`EffectId`] (or executing [`Effect::Cancel`]) clears the older flag, and
//! the Store checks the flag before reducing any action the instance produces.
//!
//! There is no preemption: a stale instance keeps running until its future
//! resolves, its result is simply never reduced.
//!
//! [`Effect::Cancellable`]: tenant_session_core::effect::Effect::Cancellable
//! [`Effect::Cancel`]: tenant_session_core::effect::Effect::Cancel

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tenant_session_core::effect::EffectId;

/// Flag shared between a cancellable effect instance and the registry
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Whether the owning effect instance is still the current one
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Registry of the current instance of each cancellable effect
#[derive(Debug, Clone, Default)]
pub(crate) struct LivenessRegistry {
    current: Arc<Mutex<HashMap<EffectId, Liveness>>>,
}

impl LivenessRegistry {
    /// Install a fresh flag for `id`, revoking the previous instance
    pub(crate) fn start(&self, id: EffectId) -> Liveness {
        let flag = Liveness::new();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, flag.clone());

        if let Some(previous) = previous {
            tracing::debug!(effect_id = %id, "Superseding live effect instance");
            previous.revoke();
        }

        flag
    }

    /// Revoke the current instance of `id`, if any
    pub(crate) fn cancel(&self, id: EffectId) {
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        if let Some(previous) = previous {
            tracing::debug!(effect_id = %id, "Cancelled live effect instance");
            previous.revoke();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHASE: EffectId = EffectId::new("phase");
    const OTHER: EffectId = EffectId::new("other");

    #[test]
    fn starting_again_revokes_previous_instance() {
        let registry = LivenessRegistry::default();

        let first = registry.start(PHASE);
        assert!(first.is_live());

        let second = registry.start(PHASE);
        assert!(!first.is_live());
        assert!(second.is_live());
    }

    #[test]
    fn cancel_revokes_only_matching_id() {
        let registry = LivenessRegistry::default();

        let phase = registry.start(PHASE);
        let other = registry.start(OTHER);
        registry.cancel(PHASE);

        assert!(!phase.is_live());
        assert!(other.is_live());
    }

    #[test]
    fn cancel_without_instance_is_noop() {
        let registry = LivenessRegistry::default();
        registry.cancel(PHASE);

        let flag = registry.start(PHASE);
        assert!(flag.is_live());
    }
}
