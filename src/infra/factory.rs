use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::Mailer;
use crate::domain::services::auth_service::AuthService;
use crate::infra::email::log_mailer::LogMailer;
use crate::infra::repositories::{
    postgres_event_repo::PostgresEventRepo, postgres_image_repo::PostgresImageRepo,
    postgres_lookup_repo::PostgresLookupRepo, postgres_organizer_repo::PostgresOrganizerRepo,
    postgres_space_repo::PostgresSpaceRepo, postgres_user_repo::PostgresUserRepo,
    postgres_venue_repo::PostgresVenueRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_image_repo::SqliteImageRepo,
    sqlite_lookup_repo::SqliteLookupRepo, sqlite_organizer_repo::SqliteOrganizerRepo,
    sqlite_space_repo::SqliteSpaceRepo, sqlite_user_repo::SqliteUserRepo,
    sqlite_venue_repo::SqliteVenueRepo,
};
use crate::state::AppState;

pub fn is_postgres_url(database_url: &str) -> bool {
    database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")
}

pub async fn bootstrap_state(config: &Config) -> anyhow::Result<AppState> {
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);

    if is_postgres_url(&config.database_url) {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = config.database_url.parse().context("Invalid Postgres URL")?;
        let opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .context("Failed to connect to Postgres")?;

        run_postgres_migrations(&pool).await?;
        Ok(postgres_state(config, pool, mailer))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(&config.database_url)
            .context("Invalid SQLite connection string")?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .context("Failed to connect to SQLite")?;

        run_sqlite_migrations(&pool).await?;
        Ok(sqlite_state(config, pool, mailer))
    }
}

pub fn postgres_state(config: &Config, pool: PgPool, mailer: Arc<dyn Mailer>) -> AppState {
    AppState {
        config: config.clone(),
        lookup_repo: Arc::new(PostgresLookupRepo::new(pool.clone())),
        organizer_repo: Arc::new(PostgresOrganizerRepo::new(pool.clone())),
        venue_repo: Arc::new(PostgresVenueRepo::new(pool.clone())),
        space_repo: Arc::new(PostgresSpaceRepo::new(pool.clone())),
        event_repo: Arc::new(PostgresEventRepo::new(pool.clone())),
        image_repo: Arc::new(PostgresImageRepo::new(pool.clone())),
        user_repo: Arc::new(PostgresUserRepo::new(pool)),
        auth_service: Arc::new(AuthService::new(config)),
        mailer,
    }
}

pub fn sqlite_state(config: &Config, pool: SqlitePool, mailer: Arc<dyn Mailer>) -> AppState {
    AppState {
        config: config.clone(),
        lookup_repo: Arc::new(SqliteLookupRepo::new(pool.clone())),
        organizer_repo: Arc::new(SqliteOrganizerRepo::new(pool.clone())),
        venue_repo: Arc::new(SqliteVenueRepo::new(pool.clone())),
        space_repo: Arc::new(SqliteSpaceRepo::new(pool.clone())),
        event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
        image_repo: Arc::new(SqliteImageRepo::new(pool.clone())),
        user_repo: Arc::new(SqliteUserRepo::new(pool)),
        auth_service: Arc::new(AuthService::new(config)),
        mailer,
    }
}

pub async fn run_postgres_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .context("Failed to run Postgres migrations")
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .context("Failed to run SQLite migrations")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_follows_url_scheme() {
        assert!(is_postgres_url("postgres://uranus@localhost/uranus"));
        assert!(is_postgres_url("postgresql://uranus@localhost/uranus"));
        assert!(!is_postgres_url("sqlite://uranus.db?mode=rwc"));
    }
}
