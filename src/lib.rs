use std::sync::Arc;

// --- Module Structure ---

// Core gate components, leaf-first: transport, prober, guard.
pub mod config;
pub mod models;
pub mod transport;
pub mod auth;
pub mod guard;

// Static route table (public / authenticated) and the routing layer that drives the guard.
pub mod routes;
pub mod router;

// --- Public Re-exports ---

pub use auth::{AuthorizationProber, Prober, ProberState};
pub use config::AppConfig;
pub use guard::{DiagnosticSink, NavigationGuard, TracingDiagnostics};
pub use models::{ExemptionSet, Location, NavigationAttempt, NavigationDecision};
pub use router::{NavigationError, NavigationResult, Router};
pub use transport::{HttpTransport, MockTransport, Transport, TransportError};

/// create_router
///
/// Assembles the application route table, derives the exemption set from its
/// public routes and wires the guard (with tracing diagnostics) in front of it.
/// The prober is injected so callers choose the transport.
pub fn create_router(config: &AppConfig, prober: ProberState) -> Router {
    let table = routes::app_routes();
    let exemptions = Arc::new(table.exempt_paths());

    let login = Location::new(config.login_path.clone());
    if !exemptions.contains(&login) {
        // Every denial would be denied again on the way to login.
        tracing::warn!(%login, "login location is not public, denied navigations will loop");
    }

    let guard = NavigationGuard::new(exemptions, prober, login, Arc::new(TracingDiagnostics));
    Router::new(Arc::new(table), guard)
}

/// create_http_router
///
/// `create_router` backed by the real HTTP transport pointed at the configured authority.
pub fn create_http_router(config: &AppConfig) -> Result<Router, TransportError> {
    let transport = HttpTransport::new(config)?;
    let prober = Arc::new(AuthorizationProber::new(
        transport,
        config.auth_check_path.clone(),
    )) as ProberState;
    Ok(create_router(config, prober))
}
