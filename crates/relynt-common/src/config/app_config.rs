//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub store: StoreConfig,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub audit: AuditConfig,
    pub risk: RiskConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Read `APP_ENV`, defaulting to development
    #[must_use]
    pub fn from_env() -> Self {
        env::var("APP_ENV")
            .ok()
            .and_then(|s| Self::parse(&s))
            .unwrap_or_default()
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which store backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

/// Store selection and in-memory seed data
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// `organization_id:user_id[:role]` entries loaded into the memory store
    #[serde(default)]
    pub seed_memberships: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply the SQL files in `migrations_dir` at startup
    #[serde(default)]
    pub run_migrations: bool,
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
}

/// JWT configuration for validating identity provider access tokens
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Expected `aud` claim; audience is not checked when unset
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Audit log writer settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_action")]
    pub default_action: String,
    /// Upper bound (in characters) for input/output summaries
    #[serde(default = "default_max_summary_length")]
    pub max_summary_length: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            default_action: default_action(),
            max_summary_length: default_max_summary_length(),
        }
    }
}

/// Extra risk patterns appended to the canonical rule table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RiskConfig {
    #[serde(default)]
    pub extra_high_patterns: Vec<String>,
    #[serde(default)]
    pub extra_medium_patterns: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "relynt".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_migrations_dir() -> String {
    "./migrations".to_string()
}

fn default_leeway() -> u64 {
    30
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_action() -> String {
    relynt_core::DEFAULT_ACTION.to_string()
}

fn default_max_summary_length() -> usize {
    100_000
}

/// Parse a comma-separated list, dropping empty items
fn parse_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend = match env::var("STORE_BACKEND") {
            Ok(s) => match s.to_lowercase().as_str() {
                "postgres" => StoreBackend::Postgres,
                "memory" => StoreBackend::Memory,
                _ => return Err(ConfigError::InvalidValue("STORE_BACKEND", s)),
            },
            Err(_) => StoreBackend::default(),
        };

        let database = match env::var("DATABASE_URL") {
            Ok(url) => Some(DatabaseConfig {
                url,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
                run_migrations: env::var("DATABASE_RUN_MIGRATIONS")
                    .map(|s| parse_bool(&s))
                    .unwrap_or(false),
                migrations_dir: env::var("DATABASE_MIGRATIONS_DIR")
                    .unwrap_or_else(|_| default_migrations_dir()),
            }),
            Err(_) if backend == StoreBackend::Postgres => {
                return Err(ConfigError::MissingVar("DATABASE_URL"));
            }
            Err(_) => None,
        };

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: Environment::from_env(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: env::var("API_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            store: StoreConfig {
                backend,
                seed_memberships: env::var("STORE_SEED_MEMBERSHIPS")
                    .map(|s| parse_list(&s, ','))
                    .unwrap_or_default(),
            },
            database,
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?,
                audience: env::var("JWT_AUDIENCE").ok().filter(|s| !s.is_empty()),
                leeway_secs: env::var("JWT_LEEWAY_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_leeway),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: env::var("RATE_LIMIT_REQUESTS_PER_SECOND")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_requests_per_second),
                burst: env::var("RATE_LIMIT_BURST")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|s| parse_list(&s, ','))
                    .unwrap_or_default(),
            },
            audit: AuditConfig {
                default_action: env::var("AUDIT_DEFAULT_ACTION")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(default_action),
                max_summary_length: env::var("AUDIT_MAX_SUMMARY_LENGTH")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_summary_length),
            },
            // Patterns may contain commas, so they are separated by newlines or ';;'
            risk: RiskConfig {
                extra_high_patterns: env::var("RISK_EXTRA_HIGH_PATTERNS")
                    .map(|s| parse_patterns(&s))
                    .unwrap_or_default(),
                extra_medium_patterns: env::var("RISK_EXTRA_MEDIUM_PATTERNS")
                    .map(|s| parse_patterns(&s))
                    .unwrap_or_default(),
            },
        })
    }

    /// Settings for running against the in-memory store (tests, local demos)
    #[must_use]
    pub fn in_memory(jwt_secret: &str) -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
            },
            api: ServerConfig {
                host: default_host(),
                port: 0,
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                seed_memberships: Vec::new(),
            },
            database: None,
            jwt: JwtConfig {
                secret: jwt_secret.to_string(),
                audience: None,
                leeway_secs: default_leeway(),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: 1000,
                burst: 1000,
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
            },
            audit: AuditConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}

/// Split a pattern list on newlines or `;;`
fn parse_patterns(raw: &str) -> Vec<String> {
    raw.split(['\n', '\r'])
        .flat_map(|line| line.split(";;"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
