use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Schema".to_string()
}
fn default_max_connections() -> u32 {
    10
}
fn default_connect_retries() -> u32 {
    5
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Fall back to the conventional variable shared with sqlx tooling
        config.database_url = fill_or_env(config.database_url, "DATABASE_URL")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        } else if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            errors.push("DATABASE_URL must be a postgres:// URL");
        }
        if self.max_connections == 0 {
            errors.push("MAX_CONNECTIONS must be at least 1");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> String;
}

impl Redact for str {
    /// Keeps scheme and host, hides credentials.
    fn redact(&self) -> String {
        if self.is_empty() {
            return "[MISSING]".to_string();
        }
        match (self.find("://"), self.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://[REDACTED]@{}", &self[..scheme_end], &self[at + 1..])
            }
            _ => self.to_string(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("database_url", &self.database_url.redact())
            .field("max_connections", &self.max_connections)
            .field("connect_retries", &self.connect_retries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(database_url: &str) -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Portfolio Schema Test".to_string(),
            database_url: database_url.to_string(),
            max_connections: 2,
            connect_retries: 0,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(test_config("postgres://app:pw@localhost:5432/portfolio").validate().is_ok());
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut config = test_config("");
        config.max_connections = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("DATABASE_URL cannot be empty"));
        assert!(err.contains("MAX_CONNECTIONS must be at least 1"));
    }

    #[test]
    fn rejects_non_postgres_urls() {
        assert!(test_config("mysql://localhost/db").validate().is_err());
    }

    #[test]
    fn debug_redacts_credentials() {
        let rendered = format!("{:?}", test_config("postgres://app:hunter2@db:5432/portfolio"));
        assert!(rendered.contains("postgres://[REDACTED]@db:5432/portfolio"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn environment_names_round_trip() {
        for name in ["development", "production", "testing"] {
            let env = AppEnvironment::from_str(name).unwrap();
            assert_eq!(env.to_string(), name);
        }
        assert!(AppEnvironment::from_str("staging").is_err());
    }
}
