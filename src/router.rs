use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::{
    guard::NavigationGuard,
    models::{Location, NavigationAttempt, NavigationDecision},
    routes::{RouteKind, RouteTable},
};

/// Upper bound on redirect hops (table redirects plus guard redirects) for one navigation.
pub const MAX_REDIRECTS: usize = 8;

/// NavigationError
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no route matches {0}")]
    NoMatchingRoute(Location),
    #[error("gave up after {hops} redirects, last target {last}")]
    RedirectLoop { hops: usize, last: Location },
}

/// Resolved
///
/// Where a completed navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub location: Location,
    pub view: String,
    pub params: BTreeMap<String, String>,
    /// The originally requested location, when the navigation was redirected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<Location>,
}

/// NavigationResult
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NavigationResult {
    Completed(Resolved),
    /// A newer navigation started while this one was waiting on its probe.
    /// The current location was left untouched.
    Superseded,
}

/// Router
///
/// The routing layer: turns a requested path into a rendered view, asking the
/// guard before every hop and acting on its decision. Each navigation takes a
/// generation ticket when it starts; a result whose ticket is stale by the time
/// it settles is dropped instead of committed.
pub struct Router {
    table: Arc<RouteTable>,
    guard: NavigationGuard,
    current: Mutex<Location>,
    generation: AtomicU64,
}

impl Router {
    pub fn new(table: Arc<RouteTable>, guard: NavigationGuard) -> Self {
        Self {
            table,
            guard,
            current: Mutex::new(Location::from("/")),
            generation: AtomicU64::new(0),
        }
    }

    /// The last committed location.
    pub fn current(&self) -> Location {
        match self.current.lock() {
            Ok(current) => current.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// navigate
    ///
    /// Runs one navigation to `target`. Query and fragment are dropped and the
    /// path is normalized (`login`, `//login/` become `/login`) before the
    /// guard sees it. Table redirects are followed before the guard runs; a guard
    /// redirect starts a fresh attempt toward the login location.
    pub async fn navigate(&self, target: &str) -> Result<NavigationResult, NavigationError> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let from = self.current();
        let requested = Location::from(normalize(target));
        let mut to = requested.clone();

        for _ in 0..=MAX_REDIRECTS {
            let matched = self
                .table
                .resolve(&to)
                .ok_or_else(|| NavigationError::NoMatchingRoute(to.clone()))?;

            let view = match &matched.route.kind {
                RouteKind::Redirect { to: next } => {
                    tracing::debug!(from = %to, to = %next, "route redirect");
                    to = next.clone();
                    continue;
                }
                RouteKind::View { view } | RouteKind::CatchAll { view } => view.clone(),
            };
            let params = matched.params;

            let attempt = NavigationAttempt::new(to.clone(), from.clone());
            let decision = self.guard.evaluate(&attempt).await;

            if self.is_stale(ticket) {
                tracing::debug!(attempt_id = %attempt.id, to = %attempt.to, "navigation superseded");
                return Ok(NavigationResult::Superseded);
            }

            match decision {
                NavigationDecision::RedirectTo(next) => {
                    to = next;
                }
                NavigationDecision::Proceed => {
                    return Ok(self.commit(ticket, to, view, params, &requested));
                }
            }
        }

        Err(NavigationError::RedirectLoop {
            hops: MAX_REDIRECTS,
            last: to,
        })
    }

    fn is_stale(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != ticket
    }

    fn commit(
        &self,
        ticket: u64,
        location: Location,
        view: String,
        params: BTreeMap<String, String>,
        requested: &Location,
    ) -> NavigationResult {
        let mut current = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Re-checked under the lock so a newer navigation cannot be overwritten.
        if self.is_stale(ticket) {
            return NavigationResult::Superseded;
        }
        *current = location.clone();

        tracing::info!(location = %location, %view, "navigation committed");
        NavigationResult::Completed(Resolved {
            redirected_from: (&location != requested).then(|| requested.clone()),
            location,
            view,
            params,
        })
    }
}

fn normalize(target: &str) -> String {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    let segments: Vec<&str> = target[..end].split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::Prober,
        guard::TracingDiagnostics,
        models::{AuthorizationOutcome, DenialReason},
        routes::{Route, app_routes},
    };
    use async_trait::async_trait;

    struct Always(AuthorizationOutcome);

    #[async_trait]
    impl Prober for Always {
        async fn probe(&self) -> AuthorizationOutcome {
            self.0.clone()
        }
    }

    fn router(table: RouteTable, outcome: AuthorizationOutcome) -> Router {
        let exemptions = Arc::new(table.exempt_paths());
        let guard = NavigationGuard::new(
            exemptions,
            Arc::new(Always(outcome)),
            "/login",
            Arc::new(TracingDiagnostics),
        );
        Router::new(Arc::new(table), guard)
    }

    fn denied() -> AuthorizationOutcome {
        AuthorizationOutcome::Denied(DenialReason::Rejected { status: 401 })
    }

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(normalize("/login?next=/account"), "/login");
        assert_eq!(normalize("/diets#today"), "/diets");
        assert_eq!(normalize(""), "/");
    }

    #[test]
    fn collapses_empty_segments() {
        for raw in ["login", "//login", "/login/", "//login//?x=1"] {
            assert_eq!(normalize(raw), "/login", "{raw:?}");
        }
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("WorkoutSet//legs/"), "/WorkoutSet/legs");
    }

    #[tokio::test]
    async fn denied_navigation_lands_on_login() {
        let router = router(app_routes(), denied());
        let result = router.navigate("/account").await.unwrap();

        let NavigationResult::Completed(resolved) = result else {
            panic!("expected completion");
        };
        assert_eq!(resolved.location, Location::from("/login"));
        assert_eq!(resolved.view, "LoginPage");
        assert_eq!(resolved.redirected_from, Some(Location::from("/account")));
        assert_eq!(router.current(), Location::from("/login"));
    }

    #[tokio::test]
    async fn follows_table_redirects() {
        let table = RouteTable::new(vec![
            Route::redirect("/home", "/index"),
            Route::view("/index", "IndexPage"),
        ]);
        let router = router(table, AuthorizationOutcome::Authorized);

        let NavigationResult::Completed(resolved) = router.navigate("/home").await.unwrap() else {
            panic!("expected completion");
        };
        assert_eq!(resolved.location, Location::from("/index"));
        assert_eq!(resolved.redirected_from, Some(Location::from("/home")));
    }

    #[tokio::test]
    async fn protected_login_page_is_a_redirect_loop() {
        let router = router(
            RouteTable::new(vec![Route::view("/login", "LoginPage")]),
            denied(),
        );
        let err = router.navigate("/login").await.unwrap_err();
        assert!(matches!(err, NavigationError::RedirectLoop { .. }));
        assert_eq!(router.current(), Location::from("/"));
    }

    #[tokio::test]
    async fn missing_route_is_an_error() {
        let table = RouteTable::new(vec![Route::view("/login", "LoginPage").public()]);
        let router = router(table, AuthorizationOutcome::Authorized);
        assert_eq!(
            router.navigate("/nowhere").await,
            Err(NavigationError::NoMatchingRoute(Location::from("/nowhere")))
        );
    }
}
