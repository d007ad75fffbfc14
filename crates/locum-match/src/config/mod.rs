use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_SEARCH_RADIUS_KM: f64 = 20.0;
const DEFAULT_MAX_SEARCH_RADIUS_KM: f64 = 200.0;

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

/// Top-level configuration for the marketplace service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub admin: AdminConfig,
    pub search: SearchConfig,
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
        let admin_token = env::var("APP_ADMIN_TOKEN").ok();

        let search = SearchConfig {
            default_radius_km: radius_var("SEARCH_DEFAULT_RADIUS_KM", DEFAULT_SEARCH_RADIUS_KM)?,
            max_radius_km: radius_var("SEARCH_MAX_RADIUS_KM", DEFAULT_MAX_SEARCH_RADIUS_KM)?,
        };
        if search.default_radius_km > search.max_radius_km {
            return Err(ConfigError::RadiusOrder {
                default: search.default_radius_km,
                max: search.max_radius_km,
            });
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            admin: AdminConfig { token: admin_token },
            search,
        })
    }
}

fn radius_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or(ConfigError::InvalidRadius { var: name }),
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Shared secret accepted on admin review routes. `None` disables them.
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    pub token: Option<String>,
}

/// Radius bounds applied to user searches, in kilometers.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub default_radius_km: f64,
    pub max_radius_km: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            max_radius_km: DEFAULT_MAX_SEARCH_RADIUS_KM,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRadius { var: &'static str },
    RadiusOrder { default: f64, max: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRadius { var } => {
                write!(f, "{var} must be a non-negative number of kilometers")
            }
            ConfigError::RadiusOrder { default, max } => write!(
                f,
                "default search radius {default} km exceeds maximum {max} km"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidRadius { .. }
            | ConfigError::RadiusOrder { .. } => None,
        }
    }
}
