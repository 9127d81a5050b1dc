use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub log: LogSettings,
}

#[derive(Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize)]
pub struct DatabaseSettings {
    /// sqlx connection string, e.g. `sqlite:trivia.db`
    pub url: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

#[derive(Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directives, e.g. `info,sqlx=warn`
    pub filter: String,
    pub format: LogFormat,
    /// Log span creation and close, with timings.
    pub span_events: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseSettings {
    /// A private in-memory database. Every pooled connection would get its own
    /// database, so the pool is limited to a single connection.
    pub fn in_memory() -> Self {
        Self {
            url: SecretString::from("sqlite::memory:".to_owned()),
            max_connections: 1,
        }
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 8080)?
        .set_default("database.url", "sqlite:trivia.db")?
        .set_default("database.max_connections", 5)?
        .set_default("log.filter", "info")?
        .set_default("log.format", "pretty")?
        .set_default("log.span_events", false)
}

/// Loads settings from defaults, an optional `trivia.toml` (or the file named
/// by `TRIVIA_CONFIG`) and `TRIVIA__`-prefixed environment variables, in
/// increasing priority.
pub fn get_settings() -> Result<Settings, ConfigError> {
    dotenv::dotenv().ok();
    let file = dotenv::var("TRIVIA_CONFIG").unwrap_or_else(|_| "trivia".to_owned());

    defaults()?
        .add_source(File::with_name(&file).required(false))
        .add_source(
            Environment::with_prefix("TRIVIA")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
