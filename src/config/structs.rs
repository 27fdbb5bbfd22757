use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Static configuration, loaded once at startup.
///
/// Priority: ENV > config.toml > defaults.
/// ENV prefix: CG, separator: __
/// Example: CG__SERVER__PORT=9999
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub fraud: FraudConfig,
}

impl StaticConfig {
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        let path = "config.toml";

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("CG")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlite://, mysql:// or postgres:// URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://clickguard.db".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace/debug/info/warn/error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Anti-fraud policy knobs.
///
/// Window lengths and cap values are policy, not mechanism, so they live
/// here rather than as constants in the evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudConfig {
    /// Session dedup window in seconds (rule: duplicate session / fingerprint replay)
    #[serde(default = "default_session_window_secs")]
    pub session_window_secs: i64,
    /// Max valid clicks per ip_hash in a rolling 24h window
    #[serde(default = "default_ip_daily_cap")]
    pub ip_daily_cap: u64,
    /// Stricter rolling-24h cap for clicks carrying neither session nor fingerprint
    #[serde(default = "default_ip_daily_cap_anonymous")]
    pub ip_daily_cap_anonymous: u64,
    /// Minimum gap in seconds between any two clicks from the same ip_hash
    #[serde(default = "default_min_click_gap_secs")]
    pub min_click_gap_secs: i64,
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            session_window_secs: default_session_window_secs(),
            ip_daily_cap: default_ip_daily_cap(),
            ip_daily_cap_anonymous: default_ip_daily_cap_anonymous(),
            min_click_gap_secs: default_min_click_gap_secs(),
        }
    }
}

impl FraudConfig {
    pub fn session_window(&self) -> Duration {
        Duration::seconds(self.session_window_secs)
    }

    pub fn min_click_gap(&self) -> Duration {
        Duration::seconds(self.min_click_gap_secs)
    }

    /// The IP cap counting window. Rolling 24h rather than calendar-day,
    /// so a midnight rollover cannot be abused to double the allowance.
    pub fn ip_cap_window(&self) -> Duration {
        Duration::hours(24)
    }
}

fn default_session_window_secs() -> i64 {
    3600
}

fn default_ip_daily_cap() -> u64 {
    10
}

fn default_ip_daily_cap_anonymous() -> u64 {
    3
}

fn default_min_click_gap_secs() -> i64 {
    30
}
