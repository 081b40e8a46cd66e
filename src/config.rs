use std::env;

use thiserror::Error;

/// Errors raised while reading the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {name}")]
    InvalidValue { name: &'static str, value: String },
}

/// Runtime settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Secret used to sign session and flash cookies; `None` generates a
    /// throwaway key, which logs every guest out on restart.
    pub secret: Option<String>,
    pub domain: String,
    /// ISO 4217 code used when a hotel does not define its own.
    pub currency: String,
    /// Mark cookies as `Secure`.
    pub secure_cookies: bool,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "PORT",
                    value,
                })?,
            None => 8080,
        };

        let secure_cookies = match lookup("SECURE_COOKIES") {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "SECURE_COOKIES",
                        value,
                    });
                }
            },
            None => false,
        };

        let currency = lookup("CURRENCY")
            .map(|value| value.trim().to_uppercase())
            .unwrap_or_else(|| "USD".to_string());
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidValue {
                name: "CURRENCY",
                value: currency,
            });
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "app.db".to_string()),
            address: lookup("ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            secret: lookup("SECRET_KEY").filter(|value| !value.is_empty()),
            domain: lookup("DOMAIN").unwrap_or_else(|| "localhost".to_string()),
            currency,
            secure_cookies,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_variables_missing() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, "app.db");
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.currency, "USD");
        assert!(config.secret.is_none());
        assert!(!config.secure_cookies);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "PORT", .. }));
    }

    #[test]
    fn currency_is_normalized_and_validated() {
        let config = config_from(&[("CURRENCY", " eur ")]).unwrap();
        assert_eq!(config.currency, "EUR");
        assert!(config_from(&[("CURRENCY", "EURO")]).is_err());
    }
}
