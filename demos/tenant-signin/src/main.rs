//! Tenant sign-in walkthrough.
//!
//! Resolves a tenant, signs in against a scripted identity provider, fetches
//! a token, signs out and resets. Tenant configs come from a built-in
//! directory instead of the network, cached in the key-value store.
//!
//! Set `TENANT_SESSION_STORAGE_PATH` to persist the store to a file (a
//! second run then skips the download), and `RUST_LOG=debug` to see every
//! transition.

use std::future::Future;
use std::sync::Arc;
use tenant_session_auth::{
    AuthSession, AuthView, IdentityConfig, IdentityProviderOptions, SessionConfig,
    SessionEnvironment, SessionError, TenantConfig, TracingDiagnostics,
    config::ENV_STORAGE_PATH,
    mocks::MockSessionAdapter,
    providers::{KeyValueStore, SessionAdapter, SessionAdapterFactory, TenantConfigRemote},
    state::{CognitoConfig, UserPool},
    stores::{
        CachedTenantConfigSource, FileKeyValueStore, MemoryKeyValueStore, PersistedStateReset,
        StoredTenantId,
    },
};
use tenant_session_core::environment::SystemClock;

const TENANT: &str = "acme";

/// Config directory standing in for the remote endpoint.
#[derive(Debug, Clone)]
struct DemoDirectory;

impl TenantConfigRemote for DemoDirectory {
    fn download(&self, tenant_id: &str) -> impl Future<Output = Result<TenantConfig, SessionError>> + Send {
        let config = (tenant_id == TENANT).then(|| {
            TenantConfig::new("https://api.acme.example.com").with_cognito(CognitoConfig {
                user_pools: vec![UserPool::new("us-east-1_Demo01", "workgridclient", "demo-client")],
            })
        });

        async move { config.ok_or(SessionError::ConfigRequestFailed { status: 404 }) }
    }
}

/// Builds a scripted adapter after deriving the client options it would use.
#[derive(Debug, Clone)]
struct DemoAdapterFactory {
    identity: IdentityConfig,
}

impl SessionAdapterFactory for DemoAdapterFactory {
    fn build(&self, config: &TenantConfig) -> Arc<dyn SessionAdapter> {
        match IdentityProviderOptions::for_tenant(config, &self.identity) {
            Ok(options) => println!(
                "  adapter for {} (client {}, {})",
                config.api_host, options.client_id, options.discovery_url
            ),
            Err(error) => tracing::warn!(error = %error, "Tenant config has no usable identity provider"),
        }

        Arc::new(MockSessionAdapter::new().with_token(Some("demo-access-token".to_string())))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = SessionConfig::from_env()?;

    if std::env::var_os(ENV_STORAGE_PATH).is_some() {
        println!("Storage: {}", config.storage_path.display());
        run(FileKeyValueStore::new(&config.storage_path), config).await
    } else {
        println!("Storage: in memory");
        run(MemoryKeyValueStore::new(), config).await
    }
}

async fn run<K>(store: K, config: SessionConfig) -> anyhow::Result<()>
where
    K: KeyValueStore + Clone + 'static,
{
    println!("=== Tenant Sign-in ===\n");

    let diagnostics = TracingDiagnostics::new(SystemClock, config.breadcrumb_capacity);
    let environment = SessionEnvironment::new(
        StoredTenantId::new(store.clone()),
        CachedTenantConfigSource::new(store.clone(), DemoDirectory, diagnostics.clone()),
        DemoAdapterFactory {
            identity: config.identity.clone(),
        },
        diagnostics.clone(),
    );
    let session = AuthSession::new(environment, PersistedStateReset::new(store), config);

    println!("Resolving stored tenant...");
    session.start().await?;
    session.settled().await?;
    println!("  view: {:?}", session.view().await);

    if session.snapshot().await.company_code.is_none() {
        println!("\nNo stored tenant, entering {TENANT:?}...");
        session.change_tenant_id(TENANT).await?;
        session.settled().await?;
        println!("  view: {:?}", session.view().await);
    }

    if matches!(session.view().await, AuthView::SignIn { .. }) {
        println!("\nSigning in...");
        let outcome = session.sign_in().await?;
        println!("  outcome: {outcome}");
    }

    let context = session.authenticated_context().await?;
    println!("\nAuthenticated against {}", context.api_host().unwrap_or("<unknown>"));
    println!("  token: {:?}", context.get_access_token().await);

    println!("\nSigning out...");
    context.sign_out().await?;
    println!("  view: {:?}", session.view().await);

    println!("\nResetting...");
    session.reset().await?;
    session.settled().await?;
    println!("  view: {:?}", session.view().await);

    session.shutdown().await?;

    println!("\nBreadcrumbs recorded: {}", diagnostics.breadcrumbs().len());
    for (key, value) in diagnostics.tags() {
        println!("  tag {key} = {value}");
    }

    Ok(())
}
