use id_server::{logger, rpc, service::IdentityService};

use id_auth::{PasswordHasher, TokenSigner};
use id_db::{UserRepository, UserStore};

use std::error::Error;
use std::sync::Arc;

use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = id_config::Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let config_dir = id_config::Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        // Ensure log directory exists
        std::fs::create_dir_all(&log_dir)?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting id-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Initialize database pool
    let database_path = config.database_path()?;
    info!("Connecting to database: {}", database_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(database_path)
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .busy_timeout(std::time::Duration::from_secs(5)),
        )
        .await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../crates/id-db/migrations").run(&pool).await?;
    info!("Migrations complete");

    // Fail fast if the store is unreachable
    let repository = Arc::new(UserRepository::new(pool));
    if let Err(e) = repository.ping().await {
        error!("Persistence engine unreachable: {}", e);
        return Err(e.into());
    }
    info!("Database connection established");

    // Wire the identity service: explicit construction, no container
    let Some(ref secret) = config.auth.jwt_secret else {
        unreachable!("validate() ensures auth.jwt_secret is set")
    };
    let hasher = PasswordHasher::new(config.auth.bcrypt_cost);
    let signer = TokenSigner::with_hs256(secret.as_bytes(), config.auth.token_ttl_secs as i64);
    let service = Arc::new(IdentityService::new(repository, hasher, signer));

    // Bind RPC listener (port 0 = auto-assign)
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("RPC listener on {}", listener.local_addr()?);

    tokio::select! {
        result = rpc::listener::serve(listener, service) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT (Ctrl+C), shutting down");
        }
    }

    Ok(())
}
