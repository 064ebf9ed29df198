//! Process settings from the environment (optionally a `.env` file via dotenvy).

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/biztime";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    /// Insert the sample companies/invoices/industries at startup.
    pub seed: bool,
    pub body_limit: usize,
}

impl ServerConfig {
    /// Read `DATABASE_URL`, `BIND_ADDR`, `DATABASE_MAX_CONNECTIONS`, `BIZTIME_SEED` and `BIZTIME_BODY_LIMIT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        if database_url.trim().is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => match v.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DATABASE_MAX_CONNECTIONS",
                        value: v,
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let seed = match lookup("BIZTIME_SEED") {
            Some(v) => parse_flag(&v).ok_or(ConfigError::Invalid {
                key: "BIZTIME_SEED",
                value: v,
            })?,
            None => false,
        };

        let body_limit = match lookup("BIZTIME_BODY_LIMIT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                key: "BIZTIME_BODY_LIMIT",
                value: v,
            })?,
            None => DEFAULT_BODY_LIMIT,
        };

        Ok(ServerConfig {
            database_url,
            bind_addr,
            max_connections,
            seed,
            body_limit,
        })
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(!cfg.seed);
        assert_eq!(cfg.body_limit, DEFAULT_BODY_LIMIT);
    }

    #[test]
    fn reads_overrides() {
        let cfg = ServerConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/biztime_test"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("BIZTIME_SEED", "TRUE"),
            ("BIZTIME_BODY_LIMIT", "1024"),
        ]))
        .unwrap();
        assert_eq!(cfg.database_url, "postgres://db/biztime_test");
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.max_connections, 12);
        assert!(cfg.seed);
        assert_eq!(cfg.body_limit, 1024);
    }

    #[test]
    fn rejects_bad_values() {
        let err = ServerConfig::from_lookup(lookup_from(&[("BIND_ADDR", "nowhere")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BIND_ADDR", .. }));

        let err = ServerConfig::from_lookup(lookup_from(&[("DATABASE_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DATABASE_MAX_CONNECTIONS", .. }));

        let err = ServerConfig::from_lookup(lookup_from(&[("BIZTIME_SEED", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BIZTIME_SEED", .. }));

        let err = ServerConfig::from_lookup(lookup_from(&[("DATABASE_URL", " ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }
}
