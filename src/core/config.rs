//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Log level used when `MCP_LOG_LEVEL` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Public drand beacon served by Cloudflare.
pub const DEFAULT_RANDOMNESS_URL: &str = "https://drand.cloudflare.com/public/latest";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Key-value store backend.
    pub store: StoreConfig,

    /// Randomness source used by `randomNumber`.
    pub randomness: RandomnessConfig,

    /// Tool execution limits.
    pub tools: ToolsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Key-value store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Snapshot file for the file-backed store.
    /// If None, an in-memory store is used.
    pub path: Option<PathBuf>,
}

/// Randomness source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomnessConfig {
    /// Beacon endpoint returning `{ "round", "randomness", ... }`.
    pub url: String,

    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

/// Tool execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Upper bound for a single tool call, in seconds.
    pub call_timeout_secs: u64,
}

impl Default for RandomnessConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RANDOMNESS_URL.to_string(),
            timeout_secs: 5,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "world-tools-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
            },
            transport: TransportConfig::default(),
            store: StoreConfig::default(),
            randomness: RandomnessConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read only the log level (`.env` included).
    ///
    /// Used to install the subscriber before [`Config::from_env`] runs, so
    /// its warnings are not lost.
    pub fn log_level_from_env() -> String {
        dotenvy::dotenv().ok();
        std::env::var("MCP_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_STORE_PATH`.
    /// Invalid values are reported with `warn!` and replaced by defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.logging.level = Self::log_level_from_env();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(path) = std::env::var("MCP_STORE_PATH") {
            config.store.path = Some(PathBuf::from(path));
            info!("File store enabled at {:?}", config.store.path);
        } else {
            warn!("MCP_STORE_PATH not set - using in-memory store, data is lost on restart");
        }

        if let Ok(url) = std::env::var("MCP_RANDOMNESS_URL") {
            config.randomness.url = url;
        }

        if let Some(secs) = parse_secs("MCP_RANDOMNESS_TIMEOUT_SECS") {
            config.randomness.timeout_secs = secs;
        }

        if let Some(secs) = parse_secs("MCP_TOOL_TIMEOUT_SECS") {
            config.tools.call_timeout_secs = secs;
        }

        config
    }
}

/// Read a positive number of seconds, warning on garbage.
fn parse_secs(var: &str) -> Option<u64> {
    let raw = std::env::var(var).ok()?;
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Some(secs),
        _ => {
            warn!("Ignoring invalid {}={:?}, using default", var, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    /// Collects formatted log lines in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn from_env_with_logs() -> (Config, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let config = tracing::subscriber::with_default(subscriber, Config::from_env);
        (config, logs.contents())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.name, "world-tools-mcp");
        assert_eq!(config.randomness.url, DEFAULT_RANDOMNESS_URL);
        assert_eq!(config.randomness.timeout_secs, 5);
        assert_eq!(config.tools.call_timeout_secs, 30);
        assert!(config.store.path.is_none());
    }

    #[test]
    fn test_store_path_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_STORE_PATH", "/tmp/todos.json");
        }
        let config = Config::from_env();
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/todos.json")));
        unsafe {
            std::env::remove_var("MCP_STORE_PATH");
        }
    }

    #[test]
    fn test_timeouts_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_RANDOMNESS_TIMEOUT_SECS", "2");
            std::env::set_var("MCP_TOOL_TIMEOUT_SECS", "abc");
        }
        let config = Config::from_env();
        assert_eq!(config.randomness.timeout_secs, 2);
        assert_eq!(config.tools.call_timeout_secs, 30);
        unsafe {
            std::env::remove_var("MCP_RANDOMNESS_TIMEOUT_SECS");
            std::env::remove_var("MCP_TOOL_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_invalid_timeout_is_logged() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TOOL_TIMEOUT_SECS", "abc");
        }
        let (config, logs) = from_env_with_logs();
        unsafe {
            std::env::remove_var("MCP_TOOL_TIMEOUT_SECS");
        }

        assert_eq!(config.tools.call_timeout_secs, 30);
        assert!(logs.contains("WARN"), "logs: {}", logs);
        assert!(
            logs.contains("Ignoring invalid MCP_TOOL_TIMEOUT_SECS"),
            "logs: {}",
            logs
        );
    }

    #[test]
    fn test_log_level_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_LOG_LEVEL", "debug");
        }
        let level = Config::log_level_from_env();
        let config = Config::from_env();
        unsafe {
            std::env::remove_var("MCP_LOG_LEVEL");
        }

        assert_eq!(level, "debug");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TOOL_TIMEOUT_SECS", "0");
        }
        let config = Config::from_env();
        assert_eq!(config.tools.call_timeout_secs, 30);
        unsafe {
            std::env::remove_var("MCP_TOOL_TIMEOUT_SECS");
        }
    }
}
