//! Configuration module for environment variable parsing.

use std::env;
use thiserror::Error;

/// Port used when `PORT` is unset or empty.
pub const DEFAULT_PORT: u16 = 3000;

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a TCP port number, got {value:?}")]
    InvalidPort { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config { port: DEFAULT_PORT }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// An unset or empty `PORT` selects the default; anything else that is
    /// not a valid port is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            port: parse_port("PORT", DEFAULT_PORT)?,
        })
    }
}

/// Parse a TCP port from the named variable.
fn parse_port(name: &str, default: u16) -> Result<u16, ConfigError> {
    let raw = match env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => return Ok(default),
    };

    raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort {
        name: name.to_string(),
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_valid() {
        env::set_var("TEST_PORT_VALID", "8081");
        assert_eq!(parse_port("TEST_PORT_VALID", DEFAULT_PORT), Ok(8081));
        env::remove_var("TEST_PORT_VALID");
    }

    #[test]
    fn test_parse_port_default() {
        assert_eq!(parse_port("NONEXISTENT_PORT_VAR", DEFAULT_PORT), Ok(3000));
    }

    #[test]
    fn test_parse_port_empty() {
        env::set_var("TEST_PORT_EMPTY", "");
        assert_eq!(parse_port("TEST_PORT_EMPTY", DEFAULT_PORT), Ok(3000));
        env::remove_var("TEST_PORT_EMPTY");
    }

    #[test]
    fn test_parse_port_invalid() {
        env::set_var("TEST_PORT_INVALID", "not-a-port");
        assert_eq!(
            parse_port("TEST_PORT_INVALID", DEFAULT_PORT),
            Err(ConfigError::InvalidPort {
                name: "TEST_PORT_INVALID".to_string(),
                value: "not-a-port".to_string(),
            })
        );

        env::set_var("TEST_PORT_INVALID", "70000");
        let err = parse_port("TEST_PORT_INVALID", DEFAULT_PORT).unwrap_err();
        assert!(err.to_string().contains("70000"));
        env::remove_var("TEST_PORT_INVALID");
    }

    #[test]
    fn test_default_config() {
        assert_eq!(Config::default().port, DEFAULT_PORT);
    }
}
