use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::{PgPool, PgConnection, Connection, Executor};
use std::net::TcpListener;
use uuid::Uuid;
use once_cell::sync::Lazy;
use reqwest::Client;

use bloodbowl_league::run;
use bloodbowl_league::config::jwt::JwtSettings;
use bloodbowl_league::config::league::LeagueSettings;
use bloodbowl_league::config::settings::{get_config, DatabaseSettings};
use bloodbowl_league::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub jwt_settings: JwtSettings,
    pub league_settings: LeagueSettings,
    pub client: Client,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn the app after adjusting its league settings
pub async fn spawn_app_with(customize: impl FnOnce(&mut LeagueSettings)) -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    let mut configuration = get_config().expect("Failed to read configuration.");
    // Every test gets its own database
    configuration.database.db_name = Uuid::new_v4().to_string();
    configuration.database.db_url = None;
    let connection_pool = configure_db(&configuration.database)
        .await;
    customize(&mut configuration.league);
    let jwt_settings = configuration.jwt.clone();
    let league_settings = configuration.league;
    let server = run(
        listener,
        connection_pool.clone(),
        jwt_settings.clone(),
        league_settings,
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);
    TestApp {
        address,
        db_pool: connection_pool,
        jwt_settings,
        league_settings,
        client: Client::new(),
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(
            &config.connection_string_without_db()
        )
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

/// Send a request with a bearer token and return the status with the parsed body
pub async fn send_json(
    request: reqwest::RequestBuilder,
    token: &str,
) -> (reqwest::StatusCode, Value) {
    let response = request
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request.");
    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

impl TestApp {
    pub async fn get(&self, path: &str, token: &str) -> (reqwest::StatusCode, Value) {
        send_json(self.client.get(format!("{}{}", self.address, path)), token).await
    }

    pub async fn post(&self, path: &str, token: &str, body: &Value) -> (reqwest::StatusCode, Value) {
        send_json(self.client.post(format!("{}{}", self.address, path)).json(body), token).await
    }

    pub async fn put(&self, path: &str, token: &str, body: &Value) -> (reqwest::StatusCode, Value) {
        send_json(self.client.put(format!("{}{}", self.address, path)).json(body), token).await
    }

    pub async fn team_treasury(&self, team_id: Uuid) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT treasury FROM teams WHERE id = $1")
            .bind(team_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to read team treasury")
    }

    pub async fn treasury(&self, user_id: Uuid) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT treasury FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to read treasury")
    }
}
