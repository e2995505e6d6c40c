use anyhow::{bail, Context, Result};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Credentials and endpoint for the Keynua contracts API.
#[derive(Clone)]
pub struct KeynuaConfig {
    pub api_key: String,
    pub api_token: String,
    pub base_url: String,
    pub timeout: Duration,
}

// Keeps credentials out of logs.
impl std::fmt::Debug for KeynuaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeynuaConfig")
            .field("api_key", &"<redacted>")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub keynua: KeynuaConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let environment = Self::parse_environment()?;

        let cors_origin = match std::env::var("CORS_ORIGIN") {
            Ok(origin) if !origin.trim().is_empty() => Some(origin),
            _ if environment == Environment::Development => {
                Some("http://localhost:3000".to_string())
            }
            _ => None,
        };

        let config = Self {
            environment,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,
            cors_origin,
            keynua: KeynuaConfig {
                api_key: Self::required("API_KEY_KEYNUA")?,
                api_token: Self::required("API_TOKEN_KEYNUA")?,
                base_url: Self::required("BASE_URL_KEYNUA")?,
                timeout: Duration::from_secs(
                    std::env::var("KEYNUA_TIMEOUT_SECS")
                        .unwrap_or_else(|_| "30".to_string())
                        .parse()
                        .context("Invalid KEYNUA_TIMEOUT_SECS")?,
                ),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn parse_environment() -> Result<Environment> {
        let env = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        parse_environment_name(&env)
    }

    fn required(var: &str) -> Result<String> {
        let value = std::env::var(var).with_context(|| format!("{} required", var))?;
        if value.trim().is_empty() {
            bail!("{} must not be empty", var);
        }
        Ok(value)
    }

    fn validate(&self) -> Result<()> {
        if !self.keynua.base_url.starts_with("http") {
            bail!("BASE_URL_KEYNUA must be HTTP(S) URL");
        }
        if self.keynua.timeout.is_zero() {
            bail!("KEYNUA_TIMEOUT_SECS must be at least 1");
        }
        // Credentialed CORS cannot be combined with a wildcard origin.
        if let Some(origin) = &self.cors_origin {
            if origin.trim() == "*" {
                bail!("CORS_ORIGIN must name an explicit origin, not '*'");
            }
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self.environment {
            Environment::Development => "debug",
            Environment::Production => "info",
        }
    }
}

fn parse_environment_name(env: &str) -> Result<Environment> {
    match env.to_lowercase().as_str() {
        "development" | "dev" => Ok(Environment::Development),
        "production" | "prod" => Ok(Environment::Production),
        _ => bail!("Unknown environment: {}", env),
    }
}
