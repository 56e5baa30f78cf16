use nav_gate::{
    AppConfig,
    config::{ConfigError, Env},
};
use serial_test::serial;
use std::{env, panic, time::Duration};

// --- Setup/Teardown Utilities ---

const VARS: [&str; 6] = [
    "APP_ENV",
    "API_BASE_URL",
    "AUTH_CHECK_PATH",
    "LOGIN_PATH",
    "REQUEST_TIMEOUT_SECS",
    "SESSION_COOKIE",
];

/// Runs `test` with every gate variable cleared, then restores the originals.
fn run_with_env<T, R>(test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> =
        VARS.iter().map(|&var| (var, env::var(var).ok())).collect();

    unsafe {
        for var in VARS {
            env::remove_var(var);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_local_defaults() {
    let config = run_with_env(|| AppConfig::load().unwrap());

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, "http://localhost:8080");
    assert_eq!(config.auth_check_path, "/auth/check");
    assert_eq!(config.login_path, "/login");
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert!(config.session_cookie.is_none());
}

#[test]
#[serial]
fn test_production_requires_base_url() {
    let result = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
        }
        AppConfig::load()
    });

    assert!(matches!(result, Err(ConfigError::Missing("API_BASE_URL"))));
}

#[test]
#[serial]
fn test_production_overrides() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("API_BASE_URL", "https://api.example.com/");
            env::set_var("AUTH_CHECK_PATH", "/session/verify");
            env::set_var("REQUEST_TIMEOUT_SECS", "3");
            env::set_var("SESSION_COOKIE", "jwt=abc");
        }
        AppConfig::load().unwrap()
    });

    assert_eq!(config.env, Env::Production);
    // Trailing slash is trimmed so paths join cleanly.
    assert_eq!(config.api_base_url, "https://api.example.com");
    assert_eq!(config.auth_check_path, "/session/verify");
    assert_eq!(config.request_timeout, Duration::from_secs(3));
    assert_eq!(config.session_cookie.as_deref(), Some("jwt=abc"));
}

#[test]
#[serial]
fn test_invalid_timeout_fails_fast() {
    for raw in ["zero", "0", "-5"] {
        let result = run_with_env(|| {
            unsafe {
                env::set_var("REQUEST_TIMEOUT_SECS", raw);
            }
            AppConfig::load()
        });

        assert!(
            matches!(result, Err(ConfigError::Invalid { name: "REQUEST_TIMEOUT_SECS", .. })),
            "timeout {raw:?} should be rejected"
        );
    }
}
