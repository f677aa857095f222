use crate::scoring::{ScoringConfig, ScoringError};
use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FILE: &str = "automation_log.json";
pub const DEFAULT_DIGEST_RECIPIENT: &str = "stakeholders@yourcompany.com";

/// Deployment stage, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Everything the service and the command line read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
    pub automation: AutomationConfig,
}

impl AppConfig {
    /// Loads `.env` (when present) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: lookup("APP_ENV")
                .map(|value| AppEnvironment::parse(&value))
                .unwrap_or_default(),
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig {
                log_level: lookup("APP_LOG_LEVEL")
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
            scoring: scoring_from_env()?,
            automation: AutomationConfig::from_env()?,
        })
    }
}

/// Trimmed value of `key`; unset and blank variables read as `None`.
fn lookup(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn scoring_from_env() -> Result<ScoringConfig, ConfigError> {
    match lookup("DOCINTEL_SCORING_TABLES") {
        Some(path) => ScoringConfig::from_path(&path)
            .map_err(|source| ConfigError::ScoringTables { source }),
        None => Ok(ScoringConfig::standard()),
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = match lookup("APP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    /// `localhost` maps to the IPv4 loopback; anything else must be an IP literal.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Targets for the notification channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationConfig {
    pub log_file: PathBuf,
    pub digest_recipients: Vec<String>,
}

impl AutomationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            log_file: lookup("DOCINTEL_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            digest_recipients: match lookup("DOCINTEL_DIGEST_RECIPIENTS") {
                Some(raw) => parse_recipients(&raw)?,
                None => defaults.digest_recipients,
            },
        })
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            digest_recipients: vec![DEFAULT_DIGEST_RECIPIENT.to_string()],
        }
    }
}

fn parse_recipients(raw: &str) -> Result<Vec<String>, ConfigError> {
    let recipients: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();

    if recipients.is_empty() || recipients.iter().any(|value| !value.contains('@')) {
        return Err(ConfigError::InvalidRecipients {
            value: raw.to_string(),
        });
    }

    Ok(recipients)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRecipients { value: String },
    ScoringTables { source: ScoringError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a port number (0-65535)"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must be 'localhost' or an IP address")
            }
            ConfigError::InvalidRecipients { value } => write!(
                f,
                "DOCINTEL_DIGEST_RECIPIENTS must be comma separated e-mail addresses (got '{}')",
                value
            ),
            ConfigError::ScoringTables { source } => {
                write!(f, "DOCINTEL_SCORING_TABLES is unusable: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidRecipients { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::ScoringTables { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    const VARS: [&str; 7] = [
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "DOCINTEL_SCORING_TABLES",
        "DOCINTEL_LOG_FILE",
        "DOCINTEL_DIGEST_RECIPIENTS",
    ];

    /// Serializes env mutation across tests and starts from a clean slate.
    fn clean_env() -> MutexGuard<'static, ()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        let guard = GUARD
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for var in VARS {
            env::remove_var(var);
        }
        guard
    }

    #[test]
    fn defaults_apply_without_environment() {
        let _guard = clean_env();
        let config = AppConfig::load().expect("config loads with defaults");

        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.telemetry.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.scoring, ScoringConfig::standard());
        assert_eq!(config.automation, AutomationConfig::default());
    }

    #[test]
    fn environment_overrides_are_trimmed() {
        let _guard = clean_env();
        env::set_var("APP_ENV", " Production ");
        env::set_var("APP_HOST", "localhost");
        env::set_var("APP_PORT", "8081");
        env::set_var("DOCINTEL_DIGEST_RECIPIENTS", "ops@city.test, clerk@city.test,");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(
            config.server.socket_addr().expect("localhost resolves"),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8081)
        );
        assert_eq!(
            config.automation.digest_recipients,
            vec!["ops@city.test".to_string(), "clerk@city.test".to_string()]
        );
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn hostnames_other_than_localhost_are_rejected() {
        let server = ServerConfig {
            host: "docs.city.test".to_string(),
            port: DEFAULT_PORT,
        };
        assert!(matches!(
            server.socket_addr(),
            Err(ConfigError::InvalidHost { .. })
        ));
    }

    #[test]
    fn invalid_port_is_reported() {
        let _guard = clean_env();
        env::set_var("APP_PORT", "70000");
        let err = AppConfig::load().expect_err("port out of range");
        assert!(matches!(err, ConfigError::InvalidPort));
        env::remove_var("APP_PORT");
    }

    #[test]
    fn scoring_tables_load_from_file() {
        let _guard = clean_env();

        let mut tables = ScoringConfig::standard();
        tables.thresholds.high = 50;
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(
            serde_json::to_string(&tables)
                .expect("tables serialize")
                .as_bytes(),
        )
        .expect("write tables");

        env::set_var("DOCINTEL_SCORING_TABLES", file.path());
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.scoring.thresholds.high, 50);
        env::remove_var("DOCINTEL_SCORING_TABLES");
    }

    #[test]
    fn malformed_recipients_are_rejected() {
        let _guard = clean_env();
        env::set_var("DOCINTEL_DIGEST_RECIPIENTS", "ops@city.test, not-an-address");
        let err = AppConfig::load().expect_err("invalid recipients");
        assert!(matches!(err, ConfigError::InvalidRecipients { .. }));
        env::remove_var("DOCINTEL_DIGEST_RECIPIENTS");
    }
}
