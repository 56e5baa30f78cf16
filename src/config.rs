use std::{env, time::Duration};

use thiserror::Error;

/// AppConfig
///
/// Holds the client's entire configuration state. Built once at startup and
/// handed by value to the transport, so nothing downstream reads shared global
/// settings after construction.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and which variables are mandatory.
    pub env: Env,
    // Base endpoint of the authorization authority (the backend API).
    pub api_base_url: String,
    // Protected path probed before entering any non-public location.
    pub auth_check_path: String,
    // Location substituted for a denied navigation.
    pub login_path: String,
    // Upper bound for a single probe request, enforced by the transport.
    pub request_timeout: Duration,
    // Optional `name=value` cookie seeded into the session jar at startup.
    pub session_cookie: Option<String>,
}

/// Env
///
/// Defines the runtime context: local development or a production deployment.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// ConfigError
///
/// Raised by `AppConfig::load` when the environment cannot produce a usable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

const LOCAL_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_AUTH_CHECK_PATH: &str = "/auth/check";
const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl Default for AppConfig {
    /// default
    ///
    /// Local values pointing at the development backend. Used by tests to build
    /// state without touching environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_base_url: LOCAL_API_BASE_URL.to_string(),
            auth_check_path: DEFAULT_AUTH_CHECK_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_cookie: None,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables (call `dotenv` first).
    ///
    /// # Errors
    /// Fails fast when `API_BASE_URL` is missing in production or when
    /// `REQUEST_TIMEOUT_SECS` is not a positive integer.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        // The production authority must be named explicitly.
        let api_base_url = match (env::var("API_BASE_URL"), &env) {
            (Ok(url), _) => url,
            (Err(_), Env::Production) => return Err(ConfigError::Missing("API_BASE_URL")),
            (Err(_), Env::Local) => LOCAL_API_BASE_URL.to_string(),
        };

        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "REQUEST_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            env,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            auth_check_path: env::var("AUTH_CHECK_PATH")
                .unwrap_or_else(|_| DEFAULT_AUTH_CHECK_PATH.to_string()),
            login_path: env::var("LOGIN_PATH").unwrap_or_else(|_| DEFAULT_LOGIN_PATH.to_string()),
            request_timeout,
            session_cookie: env::var("SESSION_COOKIE").ok().filter(|c| !c.is_empty()),
        })
    }
}
