use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;

use football_league_backend::run;
use football_league_backend::config::settings::{get_config, get_jwt_settings, StorageBackend};
use football_league_backend::db::{InMemoryStore, Repositories};
use football_league_backend::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "football-league-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    let jwt_settings = get_jwt_settings(&config);

    let repositories = match config.application.storage {
        StorageBackend::Postgres => {
            // Only try to establish connection when actually used
            let connection_pool = PgPoolOptions::new()
                .max_connections(config.application.max_db_connections)
                .acquire_timeout(Duration::from_secs(config.application.acquire_timeout_seconds))
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(1800))
                .connect_lazy(
                    config.database.connection_string().expose_secret()
                )
                .expect("Failed to create Postgres connection pool");

            if let Err(e) = sqlx::migrate!("./migrations").run(&connection_pool).await {
                tracing::error!("❌ Failed to run database migrations: {}", e);
                std::process::exit(1);
            }
            tracing::info!("✅ Database migrations applied");
            if !config.registry.teams.is_empty() {
                tracing::warn!("Ignoring configured registry, Postgres reads the registry tables");
            }
            Repositories::postgres(connection_pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on shutdown");
            tracing::info!("Seeding registry with {} teams", config.registry.teams.len());
            Repositories::in_memory(Arc::new(InMemoryStore::with_registry(&config.registry)))
        }
    };

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Listening on {}", address);

    run(
        listener,
        repositories,
        jwt_settings,
        config.application.allowed_origins.clone(),
    )?.await
}
