use clap::Parser;
use nav_gate::{
    config::{AppConfig, Env},
    create_http_router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Drive the navigation gate against the configured authority.
#[derive(Parser)]
#[command(name = "nav-gate", version)]
struct Cli {
    /// Locations to navigate to, in order. Each result is printed as one JSON line.
    #[arg(required = true)]
    paths: Vec<String>,
}

/// main
///
/// Loads configuration, initialises logging for the environment, builds the
/// HTTP-backed router and navigates each requested path in turn.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {e}");
            std::process::exit(2);
        }
    };

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise debug for the gate and quiet for the HTTP stack.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nav_gate=debug,reqwest=info".into());

    // 3. Logging Format: pretty locally, JSON in production. Logs go to stderr
    // so stdout carries only navigation results.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
    }

    tracing::info!(
        env = ?config.env,
        authority = %config.api_base_url,
        check_path = %config.auth_check_path,
        "navigation gate starting"
    );

    // 4. Router Assembly
    let router = match create_http_router(&config) {
        Ok(router) => router,
        Err(e) => {
            tracing::error!(error = %e, "FATAL: could not build the HTTP transport");
            std::process::exit(2);
        }
    };

    // 5. Navigation
    let mut failed = false;
    for path in &cli.paths {
        match router.navigate(path).await {
            Ok(result) => match serde_json::to_string(&result) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    tracing::error!(error = %e, "could not encode navigation result");
                    failed = true;
                }
            },
            Err(e) => {
                tracing::error!(%path, error = %e, "navigation failed");
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
