use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use config::{Config, ConfigError, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::jwt::JwtSettings;
use crate::config::league::LeagueSettings;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    #[serde(default)]
    pub league: LeagueSettings,
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings {
    pub user: String,
    pub password: SecretString,
    pub port: u16,
    pub host: String,
    pub db_name: String,
    /// Full connection URL, preferred over the individual fields when set
    #[serde(default)]
    pub db_url: Option<SecretString>,
}

impl DatabaseSettings {
    fn server_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.user,
            self.password.expose_secret(),
            self.host,
            self.port
        )
    }

    pub fn connection_string(&self) -> SecretString {
        let url = match &self.db_url {
            Some(db_url) => db_url.expose_secret().to_string(),
            None => format!("{}/{}", self.server_url(), self.db_name),
        };
        SecretString::new(url.into_boxed_str())
    }

    /// URL of the server itself, used to create databases
    pub fn connection_string_without_db(&self) -> String {
        self.server_url()
    }
}

#[derive(Deserialize, Debug)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
    pub log_level: String,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Deployment environment, selected with `APP_ENVIRONMENT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!("Unsupported environment `{}`, expected `local` or `production`", other)),
        }
    }
}

fn env_source(prefix: &str) -> config::Environment {
    config::Environment::default()
        .prefix(prefix)
        .prefix_separator("__")
        .separator("__")
}

/// Read `configuration/base.yml`, the environment's layer, then `POSTGRES__*` and
/// `APP__*` variables, and finally `DATABASE_URL` and `JWT_SECRET`.
pub fn get_config() -> Result<Settings, ConfigError> {
    dotenv::dotenv().ok();

    let directory: PathBuf = env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?
        .join("configuration");

    let environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| Environment::Local.as_str().to_string())
        .parse::<Environment>()
        .map_err(ConfigError::Message)?;

    let mut settings = Config::builder()
        .add_source(File::from(directory.join("base.yml")))
        .add_source(File::from(directory.join(format!("{}.yml", environment.as_str()))))
        .add_source(env_source("POSTGRES"))
        .add_source(env_source("APP"))
        .build()?
        .try_deserialize::<Settings>()?;

    if let Ok(db_url) = env::var("DATABASE_URL") {
        settings.database.db_url = Some(SecretString::new(db_url.into_boxed_str()));
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        settings.jwt.secret = SecretString::new(secret.into_boxed_str());
    }

    settings.league_rules_consistent()?;
    Ok(settings)
}

impl Settings {
    /// Reject league settings no bet or match sheet could satisfy
    fn league_rules_consistent(&self) -> Result<(), ConfigError> {
        let league = &self.league;
        if league.min_bet_amount < 1 || league.max_bet_amount < league.min_bet_amount {
            return Err(ConfigError::Message(format!(
                "league bet limits must satisfy 1 <= min ({}) <= max ({})",
                league.min_bet_amount, league.max_bet_amount
            )));
        }
        if league.max_reasonable_score < 1 {
            return Err(ConfigError::Message("league.max_reasonable_score must be positive".to_string()));
        }
        let odds = league.odds;
        if odds.win < 1 || odds.td_exact < 1 || odds.cas_exact < 1 {
            return Err(ConfigError::Message("league odds must be at least 1".to_string()));
        }
        Ok(())
    }
}
