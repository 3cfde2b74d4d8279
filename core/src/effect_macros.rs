//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants from
//! async blocks, the common case for I/O performed on behalf of a reducer.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use tenant_session_core::async_effect;
///
/// async_effect! {
///     let tenant = store.fetch_tenant_id().await.ok().flatten();
///     Some(AuthAction::TenantIdFetched { tenant_id: tenant })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Cancellable` wrapping an async block
///
/// The block runs as the live instance of `id`; starting another instance
/// with the same id makes this one stale.
///
/// # Example
///
/// ```rust,ignore
/// use tenant_session_core::cancellable_effect;
///
/// cancellable_effect! {
///     id: CONFIG_RESOLUTION,
///     async {
///         Some(AuthAction::ConfigFetching { tenant_id })
///     }
/// }
/// ```
#[macro_export]
macro_rules! cancellable_effect {
    (
        id: $id:expr,
        async { $($body:tt)* }
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $id,
            effect: ::std::boxed::Box::new($crate::async_effect! { $($body)* }),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::{Effect, EffectId};

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        AsyncResult { value: i32 },
    }

    const LOOKUP: EffectId = EffectId::new("lookup");

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[tokio::test]
    async fn test_async_effect_macro_yields_action() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 7 })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! always builds Effect::Future");
        };
        assert_eq!(fut.await, Some(TestAction::AsyncResult { value: 7 }));
    }

    #[test]
    fn test_cancellable_effect_macro() {
        let effect = cancellable_effect! {
            id: LOOKUP,
            async {
                Some(TestAction::AsyncResult { value: 1 })
            }
        };

        assert!(effect.is_cancellable_with(LOOKUP));
        let Effect::Cancellable { effect: inner, .. } = effect else {
            unreachable!("cancellable_effect! always builds Effect::Cancellable");
        };
        assert!(matches!(*inner, Effect::Future(_)));
    }
}
