use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::workflows::billing::tariffs;

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

/// Top-level configuration for the assistant service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub tariff: TariffConfig,
    pub session: SessionConfig,
    pub assistant: Option<AssistantConfig>,
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

        let require_year = parse_bool("APP_REQUIRE_TARIFF_YEAR", true)?;
        let default_year = match env::var("APP_DEFAULT_TARIFF_YEAR") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: "APP_DEFAULT_TARIFF_YEAR",
                })?,
            Err(_) => tariffs::latest_year(),
        };
        if !tariffs::is_supported_year(default_year) {
            return Err(ConfigError::UnpublishedTariffYear { year: default_year });
        }

        let session = SessionConfig {
            ttl: Duration::from_secs(parse_number("APP_SESSION_TTL_SECS", 1_800)?),
            capacity: parse_number("APP_SESSION_CAPACITY", 4_096)? as usize,
        };

        let assistant = match env::var("ASSISTANT_BASE_URL") {
            Ok(base_url) if !base_url.trim().is_empty() => Some(AssistantConfig {
                base_url: base_url.trim().trim_end_matches('/').to_string(),
                poll_interval: Duration::from_millis(parse_number(
                    "ASSISTANT_POLL_INTERVAL_MS",
                    500,
                )?),
                poll_attempts: parse_number("ASSISTANT_POLL_ATTEMPTS", 20)? as u32,
                request_timeout: Duration::from_millis(parse_number(
                    "ASSISTANT_TIMEOUT_MS",
                    10_000,
                )?),
            }),
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            tariff: TariffConfig {
                require_year,
                default_year,
            },
            session,
            assistant,
        })
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

/// Policy for tariff-year resolution. The explicit-year requirement is a
/// toggle: with it off, messages that omit the year are billed against
/// `default_year`.
#[derive(Debug, Clone, Copy)]
pub struct TariffConfig {
    pub require_year: bool,
    pub default_year: u16,
}

/// Bounds for the in-memory session store.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub ttl: Duration,
    pub capacity: usize,
}

/// Endpoint and poll budget for the external conversational assistant.
/// Absent entirely when `ASSISTANT_BASE_URL` is unset.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    pub poll_attempts: u32,
    pub request_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost {
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("{name} must be a non-negative integer")]
    InvalidNumber { name: &'static str },
    #[error("{name} must be a boolean (true/false/1/0)")]
    InvalidBool { name: &'static str },
    #[error("no tariff schedule is published for year {year}")]
    UnpublishedTariffYear { year: u16 },
}

fn parse_number(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { name }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidBool { name }),
        },
        Err(_) => Ok(default),
    }
}
