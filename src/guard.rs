use std::sync::Arc;

use crate::{
    auth::ProberState,
    models::{
        AuthorizationOutcome, DenialReason, ExemptionSet, Location, NavigationAttempt,
        NavigationDecision,
    },
};

/// DiagnosticSink
///
/// Receives one signal per denied navigation. Denials are expected traffic
/// (expired sessions), so this is a diagnostic, never an error.
pub trait DiagnosticSink: Send + Sync {
    fn record_denial(&self, attempt: &NavigationAttempt, reason: &DenialReason);
}

/// TracingDiagnostics
///
/// Default sink: a single `warn` event carrying the attempt id for correlation.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn record_denial(&self, attempt: &NavigationAttempt, reason: &DenialReason) {
        tracing::warn!(
            attempt_id = %attempt.id,
            to = %attempt.to,
            from = %attempt.from,
            %reason,
            "access denied, redirecting to login"
        );
    }
}

/// NavigationGuard
///
/// Runs before every navigation. Destinations in the exemption set pass
/// immediately without touching the network. Every other destination costs
/// exactly one probe: `Authorized` lets the navigation through, anything else
/// redirects to the login location.
///
/// Holds nothing mutable, so any number of evaluations may run concurrently.
#[derive(Clone)]
pub struct NavigationGuard {
    exemptions: Arc<ExemptionSet>,
    prober: ProberState,
    login: Location,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl NavigationGuard {
    pub fn new(
        exemptions: Arc<ExemptionSet>,
        prober: ProberState,
        login: impl Into<Location>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            exemptions,
            prober,
            login: login.into(),
            diagnostics,
        }
    }

    pub fn requires_auth(&self, location: &Location) -> bool {
        !self.exemptions.contains(location)
    }

    /// evaluate
    ///
    /// Produces the single decision for `attempt`. Never fails: a probe that
    /// could not complete is a denial like any other.
    pub async fn evaluate(&self, attempt: &NavigationAttempt) -> NavigationDecision {
        if !self.requires_auth(&attempt.to) {
            tracing::debug!(attempt_id = %attempt.id, to = %attempt.to, "public destination");
            return NavigationDecision::Proceed;
        }

        match self.prober.probe().await {
            AuthorizationOutcome::Authorized => {
                tracing::debug!(attempt_id = %attempt.id, to = %attempt.to, "session authorized");
                NavigationDecision::Proceed
            }
            AuthorizationOutcome::Denied(reason) => {
                self.diagnostics.record_denial(attempt, &reason);
                NavigationDecision::RedirectTo(self.login.clone())
            }
        }
    }
}
