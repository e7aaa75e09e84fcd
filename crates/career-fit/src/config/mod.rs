use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use chrono::Duration;

use crate::assessment::{
    SessionLimits, DEFAULT_RESULT_RETENTION_MINUTES, DEFAULT_SESSION_CAPACITY,
    DEFAULT_SESSION_IDLE_MINUTES,
};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub assessment: AssessmentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let session_capacity = match env::var("ASSESSMENT_SESSION_CAPACITY") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or(ConfigError::InvalidSessionCapacity)?,
            Err(_) => DEFAULT_SESSION_CAPACITY,
        };

        let session_idle_minutes =
            minutes_from_env("ASSESSMENT_SESSION_IDLE_MINUTES", DEFAULT_SESSION_IDLE_MINUTES)?;
        let result_retention_minutes = minutes_from_env(
            "ASSESSMENT_RESULT_RETENTION_MINUTES",
            DEFAULT_RESULT_RETENTION_MINUTES,
        )?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            assessment: AssessmentConfig {
                session_capacity,
                session_idle_minutes,
                result_retention_minutes,
            },
        })
    }
}

fn minutes_from_env(name: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or(ConfigError::InvalidMinutes { name }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Limits for the session collector.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    pub session_capacity: usize,
    pub session_idle_minutes: u32,
    pub result_retention_minutes: u32,
}

impl AssessmentConfig {
    pub fn limits(&self) -> SessionLimits {
        SessionLimits {
            capacity: self.session_capacity,
            idle_timeout: Duration::minutes(i64::from(self.session_idle_minutes)),
            result_retention: Duration::minutes(i64::from(self.result_retention_minutes)),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSessionCapacity,
    InvalidMinutes { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSessionCapacity => {
                write!(f, "ASSESSMENT_SESSION_CAPACITY must be a positive integer")
            }
            ConfigError::InvalidMinutes { name } => {
                write!(f, "{name} must be a positive number of minutes")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidSessionCapacity
            | ConfigError::InvalidMinutes { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("ASSESSMENT_SESSION_CAPACITY");
        env::remove_var("ASSESSMENT_SESSION_IDLE_MINUTES");
        env::remove_var("ASSESSMENT_RESULT_RETENTION_MINUTES");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.assessment.session_capacity, DEFAULT_SESSION_CAPACITY);
        assert_eq!(config.assessment.limits(), SessionLimits::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rejects_zero_session_capacity() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ASSESSMENT_SESSION_CAPACITY", "0");
        let err = AppConfig::load().expect_err("zero capacity rejected");
        assert!(matches!(err, ConfigError::InvalidSessionCapacity));
        env::set_var("ASSESSMENT_SESSION_CAPACITY", "25");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.assessment.session_capacity, 25);
        reset_env();
    }

    #[test]
    fn expiry_windows_come_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ASSESSMENT_SESSION_IDLE_MINUTES", "15");
        env::set_var("ASSESSMENT_RESULT_RETENTION_MINUTES", "90");
        let limits = AppConfig::load().expect("config loads").assessment.limits();
        assert_eq!(limits.idle_timeout, Duration::minutes(15));
        assert_eq!(limits.result_retention, Duration::minutes(90));

        env::set_var("ASSESSMENT_SESSION_IDLE_MINUTES", "soon");
        let err = AppConfig::load().expect_err("non-numeric idle window rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidMinutes {
                name: "ASSESSMENT_SESSION_IDLE_MINUTES"
            }
        ));
        reset_env();
    }
}
