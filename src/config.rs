/// Runtime configuration, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    /// Cookie-session signing key; must be at least 64 bytes to be used.
    pub session_key: Option<String>,
}

#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 8;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; real deployments set variables directly.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError("DATABASE_URL must be set".to_string()))?;

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError(format!("DB_MAX_CONNECTIONS must be a positive integer, got '{raw}'")))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(AppConfig {
            database_url,
            bind_addr,
            db_max_connections,
            session_key: lookup("SESSION_KEY"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/works")])).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.db_max_connections, 8);
        assert!(config.session_key.is_none());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(AppConfig::from_lookup(lookup_from(&[])).is_err());
    }

    #[test]
    fn invalid_pool_size_is_an_error() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/works"),
            ("DB_MAX_CONNECTIONS", "zero"),
        ]));
        assert!(result.is_err());
    }
}
