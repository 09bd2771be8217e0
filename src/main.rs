use std::net::TcpListener;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use bloodbowl_league::run;
use bloodbowl_league::config::settings::get_config;
use bloodbowl_league::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = get_config().map_err(|e| {
        eprintln!("Failed to read the config: {}", e);
        std::io::Error::other(e)
    })?;

    let subscriber = get_subscriber(
        "bloodbowl-league".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    // Only try to establish connection when actually used
    let connection_pool = PgPoolOptions::new()
        .max_connections(32)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy(
            config.database.connection_string().expose_secret()
        )
        .map_err(|e| {
            tracing::error!("❌ Failed to create Postgres connection pool: {}", e);
            std::io::Error::other(e)
        })?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&connection_pool).await {
        tracing::error!("❌ Failed to run database migrations: {}", e);
        return Err(std::io::Error::other(e));
    }
    tracing::info!("✅ Database migrations applied");

    let address = config.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Listening on {}", address);

    tracing::info!(
        "League rules: stakes {}-{}g, odds {}/{}/{}",
        config.league.min_bet_amount,
        config.league.max_bet_amount,
        config.league.odds.win,
        config.league.odds.td_exact,
        config.league.odds.cas_exact
    );

    run(
        listener,
        connection_pool,
        config.jwt,
        config.league
    )?.await
}
