//! Environment-driven server settings. A `.env` file is loaded first when present.

use anyhow::{Context, bail};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://content.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub category_overrides: bool,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {port:?}"))?,
            None => DEFAULT_PORT,
        };
        let category_overrides = match lookup("CONTENT_CATEGORY_OVERRIDES") {
            Some(value) => parse_flag(&value)
                .with_context(|| "CONTENT_CATEGORY_OVERRIDES must be true or false")?,
            None => true,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            category_overrides,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("unrecognized flag value {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_address(), "127.0.0.1:3001");
        assert!(config.category_overrides);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "8080"),
            ("HOST", "0.0.0.0"),
            ("CONTENT_CATEGORY_OVERRIDES", "false"),
        ])
        .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(!config.category_overrides);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config(&[("PORT", "http")]).is_err());
        assert!(config(&[("CONTENT_CATEGORY_OVERRIDES", "maybe")]).is_err());
    }
}
