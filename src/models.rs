use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// --- Navigation Targets ---

/// Location
///
/// An opaque path string identifying a navigation target. The gate never looks
/// inside it beyond exact comparison; the route table splits it into segments
/// only when resolving a view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for Location {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// ExemptionSet
///
/// The ordered list of Locations reachable without authorization. Built once at
/// startup and shared read-only (behind an `Arc`) by every evaluation.
#[derive(Debug, Clone, Default)]
pub struct ExemptionSet {
    paths: Vec<Location>,
}

impl ExemptionSet {
    pub fn new<I, L>(paths: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Location>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact string match only. `/login/extra` is not covered by `/login`.
    pub fn contains(&self, location: &Location) -> bool {
        self.paths.iter().any(|p| p == location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.paths.iter()
    }
}

// --- Navigation Attempt & Decision ---

/// NavigationAttempt
///
/// One request to move the application from `from` to `to`. Consumed by a
/// single guard evaluation and never stored. The `id` exists only to
/// correlate log lines belonging to the same attempt.
#[derive(Debug, Clone)]
pub struct NavigationAttempt {
    pub id: Uuid,
    pub to: Location,
    pub from: Location,
}

impl NavigationAttempt {
    pub fn new(to: impl Into<Location>, from: impl Into<Location>) -> Self {
        Self {
            id: Uuid::new_v4(),
            to: to.into(),
            from: from.into(),
        }
    }
}

/// NavigationDecision
///
/// The guard's only output. Exactly one is produced per attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "location", rename_all = "snake_case")]
pub enum NavigationDecision {
    /// Continue to the requested location unchanged.
    Proceed,
    /// Abandon the requested location and go here instead.
    RedirectTo(Location),
}

// --- Authorization ---

/// AuthorizationOutcome
///
/// Binary result of a single probe. Every failure mode is `Denied`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Authorized,
    Denied(DenialReason),
}

/// DenialReason
///
/// Why a probe was denied. Only used for diagnostics: the navigation decision
/// is the same for every variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// The authority answered with a non-success status.
    Rejected { status: u16 },
    /// The authority could not be reached (timeout, network error, bad URL).
    Unreachable(String),
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { status } => write!(f, "rejected with status {status}"),
            Self::Unreachable(cause) => write!(f, "authority unreachable: {cause}"),
        }
    }
}
