//! Route Table Module
//!
//! The static, declarative path-to-view bindings of the application, split by
//! access level the same way the page tree is: public pages any visitor may
//! open, and pages that sit behind a validated session. The exemption set the
//! guard consults is derived from this table, so the two cannot drift apart.

use std::collections::BTreeMap;

use crate::models::{ExemptionSet, Location};

/// Pages reachable without a session (login, registration).
pub mod public;

/// Pages rendered inside the main layout; every one requires a session.
pub mod authenticated;

/// RouteKind
///
/// What a matched route does. Each kind carries exactly the fields it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    /// Render `view`.
    View { view: String },
    /// Send the navigation on to `to` without rendering anything.
    Redirect { to: Location },
    /// Matches any path not claimed by an earlier route.
    CatchAll { view: String },
}

/// Route
///
/// A single table entry. `path` is a pattern of `/`-separated segments where
/// `:name` binds one non-empty segment. Ignored for `CatchAll`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub kind: RouteKind,
    pub public: bool,
}

impl Route {
    pub fn view(path: &str, view: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: RouteKind::View {
                view: view.to_string(),
            },
            public: false,
        }
    }

    pub fn redirect(path: &str, to: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: RouteKind::Redirect { to: to.into() },
            public: false,
        }
    }

    pub fn catch_all(view: &str) -> Self {
        Self {
            path: "*".to_string(),
            kind: RouteKind::CatchAll {
                view: view.to_string(),
            },
            public: false,
        }
    }

    /// Marks the route reachable without authorization.
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    fn match_path(&self, path: &str) -> Option<BTreeMap<String, String>> {
        if matches!(self.kind, RouteKind::CatchAll { .. }) {
            return Some(BTreeMap::new());
        }

        let pattern: Vec<&str> = segments(&self.path).collect();
        let actual: Vec<&str> = segments(path).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (expected, got) in pattern.iter().zip(actual.iter()) {
            match expected.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), got.to_string());
                }
                None if expected == got => {}
                None => return None,
            }
        }
        Some(params)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// RouteMatch
///
/// The route a location resolved to plus any bound `:param` segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: BTreeMap<String, String>,
}

/// RouteTable
///
/// Ordered list of routes; the first match wins, so a catch-all belongs last.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn resolve(&self, location: &Location) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| {
            route
                .match_path(location.as_str())
                .map(|params| RouteMatch { route, params })
        })
    }

    /// exempt_paths
    ///
    /// The exact paths of every public, non-catch-all route, in table order.
    pub fn exempt_paths(&self) -> ExemptionSet {
        ExemptionSet::new(
            self.routes
                .iter()
                .filter(|r| r.public && !matches!(r.kind, RouteKind::CatchAll { .. }))
                .map(|r| r.path.as_str()),
        )
    }
}

/// app_routes
///
/// The full application table: public pages, then the session-protected main
/// layout, then the not-found page. Keep the catch-all last.
pub fn app_routes() -> RouteTable {
    let mut routes = public::public_routes();
    routes.extend(authenticated::authenticated_routes());
    routes.push(Route::catch_all("ErrorNotFound"));
    RouteTable::new(routes)
}
