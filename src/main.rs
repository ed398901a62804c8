use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};

use registrar::{ensure_superadmin, AppState, BootstrapOutcome, Config, Database, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    // Load configuration
    let mut config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = registrar::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        registrar::logging::init_console_only(&config.logging.level);
    }

    info!("Registrar - student registration service");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server stopped with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> registrar::Result<()> {
    config.validate()?;

    let db = Database::open(&config.database).await?;
    info!(path = %config.database.path, "Database ready");

    let state = Arc::new(AppState::new(db, &config.auth)?);

    match ensure_superadmin(
        state.auth.store().as_ref(),
        state.auth.hasher(),
        &config.bootstrap,
    )
    .await?
    {
        BootstrapOutcome::Created(account) => {
            info!(username = %account.username, "Created bootstrap superadmin");
        }
        BootstrapOutcome::AlreadyPresent => {}
        BootstrapOutcome::Skipped => {
            warn!("Running without an active superadmin");
        }
    }

    let server = WebServer::new(&config.server, state)?;
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );
    server.run().await?;
    Ok(())
}
