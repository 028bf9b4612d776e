use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Largest rota the service will build unless `ROTA_MAX_WEEKS` says otherwise.
pub const DEFAULT_MAX_WEEKS: u32 = 260;

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
    pub rota: RotaSettings,
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
        let ansi = parse_flag("APP_LOG_ANSI", false)?;

        let max_weeks = match env::var("ROTA_MAX_WEEKS") {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => return Err(ConfigError::InvalidMaxWeeks(raw)),
            },
            Err(_) => DEFAULT_MAX_WEEKS,
        };
        let smooth_spacing = parse_flag("ROTA_SMOOTH_SPACING", false)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            rota: RotaSettings {
                max_weeks,
                smooth_spacing,
            },
        })
    }
}

fn parse_flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value: raw }),
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
    pub ansi: bool,
}

/// Limits and defaults applied around rota generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotaSettings {
    pub max_weeks: u32,
    /// Try every starting rotation and keep the steadiest spacing.
    pub smooth_spacing: bool,
}

impl Default for RotaSettings {
    fn default() -> Self {
        Self {
            max_weeks: DEFAULT_MAX_WEEKS,
            smooth_spacing: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMaxWeeks(String),
    InvalidFlag { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMaxWeeks(value) => {
                write!(f, "ROTA_MAX_WEEKS must be a positive integer (got '{value}')")
            }
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{key} must be true or false (got '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidMaxWeeks(_)
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
