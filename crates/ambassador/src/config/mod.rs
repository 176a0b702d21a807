use crate::workflows::waitlist::WaitlistConfig;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub waitlist: WaitlistConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            waitlist: load_waitlist()?,
        })
    }
}

fn load_waitlist() -> Result<WaitlistConfig, ConfigError> {
    let mut waitlist = WaitlistConfig::default();

    if let Some(raw) = non_empty_var("APP_WAITLIST_SEED") {
        let seed = raw
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidSeed(raw.clone()))?;
        waitlist.jitter_seed = Some(seed);
    }

    if let Some(raw) = non_empty_var("APP_REFERRAL_BONUS") {
        let bonus = raw
            .parse::<f64>()
            .ok()
            .filter(|bonus| bonus.is_finite() && *bonus >= 0.0)
            .ok_or_else(|| ConfigError::InvalidReferralBonus(raw.clone()))?;
        waitlist.referral_bonus = bonus;
    }

    Ok(waitlist)
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSeed(String),
    InvalidReferralBonus(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSeed(raw) => {
                write!(f, "APP_WAITLIST_SEED must be a u64, got '{raw}'")
            }
            ConfigError::InvalidReferralBonus(raw) => write!(
                f,
                "APP_REFERRAL_BONUS must be a non-negative number, got '{raw}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSeed(_)
            | ConfigError::InvalidReferralBonus(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::waitlist::DEFAULT_REFERRAL_BONUS;
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
        env::remove_var("APP_WAITLIST_SEED");
        env::remove_var("APP_REFERRAL_BONUS");
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
        assert_eq!(config.waitlist.jitter_seed, None);
        assert_eq!(config.waitlist.referral_bonus, DEFAULT_REFERRAL_BONUS);
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
    fn reads_waitlist_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("APP_WAITLIST_SEED", "42");
        env::set_var("APP_REFERRAL_BONUS", "12.5");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.waitlist.jitter_seed, Some(42));
        assert_eq!(config.waitlist.referral_bonus, 12.5);
        reset_env();
    }

    #[test]
    fn rejects_negative_referral_bonus() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_REFERRAL_BONUS", "-3");
        match AppConfig::load() {
            Err(ConfigError::InvalidReferralBonus(raw)) => assert_eq!(raw, "-3"),
            other => panic!("expected referral bonus error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_unparseable_seed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_WAITLIST_SEED", "lucky");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidSeed(_))));
        reset_env();
    }
}
