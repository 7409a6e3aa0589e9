//! 应用运行配置加载。

mod registry;

pub use registry::{
    ApcOids, AtenOids, BawornOids, BawornScale, CyberPowerOids, OidRegistry,
    ReconciliationConfig, SessionDefaults, VendorBrand, VendorVocabulary,
};

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
    #[error("registry error: {0}")]
    Registry(String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: Option<String>,
    pub devices_path: Option<String>,
    pub oid_registry_path: Option<String>,
    pub poll_interval_ms: u64,
    pub poll_log_table: bool,
    pub poll_debug: bool,
    pub usage_current_threshold: f64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr = env::var("PDU_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
        let database_url = read_optional("PDU_DATABASE_URL");
        let devices_path = read_optional("PDU_DEVICES_PATH");
        let oid_registry_path = read_optional("PDU_OID_REGISTRY_PATH");
        let poll_interval_ms = read_u64_with_default("PDU_POLL_INTERVAL_MS", 30_000)?;
        if poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "PDU_POLL_INTERVAL_MS".to_string(),
                "0".to_string(),
            ));
        }
        let poll_log_table = read_bool_with_default("PDU_POLL_LOG_TABLE", true);
        let poll_debug = read_bool_with_default("PDU_POLL_DEBUG", false);
        let usage_current_threshold =
            read_f64_with_default("PDU_USAGE_CURRENT_THRESHOLD", 0.05)?;

        if database_url.is_none() && devices_path.is_none() {
            return Err(ConfigError::Missing(
                "PDU_DATABASE_URL or PDU_DEVICES_PATH".to_string(),
            ));
        }

        Ok(Self {
            http_addr,
            database_url,
            devices_path,
            oid_registry_path,
            poll_interval_ms,
            poll_log_table,
            poll_debug,
            usage_current_threshold,
        })
    }

    /// 加载 OID 注册表：未配置覆盖文件时使用内置默认值。
    pub fn load_registry(&self) -> Result<OidRegistry, ConfigError> {
        match self.oid_registry_path.as_deref() {
            Some(path) => OidRegistry::from_json_file(path),
            None => Ok(OidRegistry::default()),
        }
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_f64_with_default(key: &str, default: f64) -> Result<f64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    match value.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}
