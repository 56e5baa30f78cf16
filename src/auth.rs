use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    models::{AuthorizationOutcome, DenialReason},
    transport::{Transport, TransportError},
};

/// Prober
///
/// Contract for the remote authorization check. No inputs: credentials are
/// session-scoped and attached by the transport.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self) -> AuthorizationOutcome;
}

/// ProberState
///
/// The shared handle the guard holds on to.
pub type ProberState = Arc<dyn Prober>;

/// AuthorizationProber
///
/// Asks the authority whether the current session may see protected pages by
/// requesting a fixed protected path.
///
/// Fail-closed: only a successful response means `Authorized`. A non-success
/// status, a timeout or any network failure is `Denied`. One request per
/// `probe` call, never retried.
pub struct AuthorizationProber<T> {
    transport: T,
    check_path: String,
}

impl<T: Transport> AuthorizationProber<T> {
    pub fn new(transport: T, check_path: impl Into<String>) -> Self {
        Self {
            transport,
            check_path: check_path.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<T: Transport> Prober for AuthorizationProber<T> {
    async fn probe(&self) -> AuthorizationOutcome {
        match self.transport.perform_get(&self.check_path).await {
            Ok(_) => AuthorizationOutcome::Authorized,
            Err(TransportError::Status(status)) => {
                AuthorizationOutcome::Denied(DenialReason::Rejected { status })
            }
            Err(other) => AuthorizationOutcome::Denied(DenialReason::Unreachable(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    #[tokio::test]
    async fn success_is_authorized() {
        let prober = AuthorizationProber::new(MockTransport::new(), "/auth/check");
        assert_eq!(prober.probe().await, AuthorizationOutcome::Authorized);
        assert_eq!(prober.transport().requested_paths(), vec!["/auth/check"]);
    }

    #[tokio::test]
    async fn unauthorized_status_is_rejected() {
        let prober = AuthorizationProber::new(
            MockTransport::new_failing(TransportError::Status(401)),
            "/auth/check",
        );
        assert_eq!(
            prober.probe().await,
            AuthorizationOutcome::Denied(DenialReason::Rejected { status: 401 })
        );
    }

    #[tokio::test]
    async fn transport_failures_are_denied_without_retry() {
        for error in [
            TransportError::Timeout,
            TransportError::Network("connection refused".to_string()),
        ] {
            let prober =
                AuthorizationProber::new(MockTransport::new_failing(error), "/auth/check");
            let outcome = prober.probe().await;
            assert!(matches!(
                outcome,
                AuthorizationOutcome::Denied(DenialReason::Unreachable(_))
            ));
            assert_eq!(prober.transport().calls(), 1);
        }
    }
}
