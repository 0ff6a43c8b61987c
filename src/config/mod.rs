/// 统一配置系统
///
/// 提供TOML/JSON配置文件、环境变量覆盖和验证
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod auth;

pub use auth::{AuthConfig, Language, OrientationMode, UiMode};

use crate::impl_default;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// SDK 凭据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// 桥接层主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// 维护检查 IP（可选）
    #[serde(default)]
    pub ip_maintenance_check: Option<String>,

    /// SDK 凭据
    #[serde(default)]
    pub credentials: Credentials,

    /// 初始化后下发给 SDK 的认证配置
    #[serde(default)]
    pub auth: AuthConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    ///
    /// 无法解析的值会被忽略并保留原值。
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// 使用任意查找函数覆盖配置（便于测试时注入）
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("TECH3C_CLIENT_ID") {
            self.credentials.client_id = val;
        }
        if let Some(val) = lookup("TECH3C_CLIENT_SECRET") {
            self.credentials.client_secret = val;
        }
        if let Some(val) = lookup("TECH3C_DEBUG") {
            self.auth.debug_mode = val.parse().unwrap_or(self.auth.debug_mode);
        }
        if let Some(val) = lookup("TECH3C_LANGUAGE") {
            if let Some(language) = Language::parse(&val) {
                self.auth.language = language;
            }
        }
        if let Some(val) = lookup("TECH3C_ORIENTATION") {
            if let Some(orientation) = OrientationMode::parse(&val) {
                self.auth.orientation = orientation;
            }
        }
        if let Some(val) = lookup("TECH3C_LOG_LEVEL") {
            if let Some(level) = LogLevel::parse(&val) {
                self.logging.level = level;
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.credentials.client_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Client ID is empty".to_string(),
            ));
        }
        if self.credentials.client_secret.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Client Secret is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./tech3c.toml
    /// 2. ./tech3c.json
    /// 3. ~/.config/tech3c_bridge/tech3c.toml
    /// 4. 使用默认配置
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::from_toml_file("tech3c.toml") {
            tracing::info!(target: "tech3c", "Loaded config from tech3c.toml");
            return config;
        }

        if let Ok(config) = Self::from_json_file("tech3c.json") {
            tracing::info!(target: "tech3c", "Loaded config from tech3c.json");
            return config;
        }

        if let Some(home) = env::var_os("HOME") {
            let config_path = PathBuf::from(home)
                .join(".config")
                .join("tech3c_bridge")
                .join("tech3c.toml");

            if let Ok(config) = Self::from_toml_file(&config_path) {
                tracing::info!(target: "tech3c", "Loaded config from {:?}", config_path);
                return config;
            }
        }

        tracing::info!(target: "tech3c", "Using default configuration");
        Self::default()
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,

    /// 是否输出 ANSI 颜色
    pub ansi: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    ansi: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
ip_maintenance_check = "103.51.120.202"

[credentials]
client_id = "3cgame"
client_secret = "secret"

[auth]
debug_mode = true
language = "Vietnamese"
orientation = "Landscape"
require_otp = true

[logging]
level = "Debug"
"#;

    #[test]
    fn test_default_config_fails_validation() {
        let config = BridgeConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_toml_parsing() {
        let config = BridgeConfig::from_toml_str(SAMPLE).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.credentials.client_id, "3cgame");
        assert_eq!(config.auth.language, Language::Vietnamese);
        assert_eq!(config.auth.orientation, OrientationMode::Landscape);
        assert!(config.auth.require_otp);
        // 未指定的字段保持默认值
        assert!(config.auth.enable_guest_login);
        assert_eq!(config.auth.ui_mode, UiMode::Dialog);
        assert_eq!(config.ip_maintenance_check.as_deref(), Some("103.51.120.202"));
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_json_parsing() {
        let json = r#"{"credentials":{"client_id":"a","client_secret":"b"},"auth":{"ui_mode":"Fullscreen"}}"#;
        let config = BridgeConfig::from_json_str(json).unwrap();
        assert_eq!(config.auth.ui_mode, UiMode::Fullscreen);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            BridgeConfig::from_toml_str("credentials = 5"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TECH3C_CLIENT_ID", "env-id"),
            ("TECH3C_DEBUG", "true"),
            ("TECH3C_LANGUAGE", "khmer"),
            ("TECH3C_ORIENTATION", "not-an-orientation"),
            ("TECH3C_LOG_LEVEL", "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = BridgeConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.credentials.client_id, "env-id");
        assert!(config.auth.debug_mode);
        assert_eq!(config.auth.language, Language::Khmer);
        assert_eq!(config.auth.orientation, OrientationMode::Auto);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_toml_roundtrip_via_file() {
        let dir = std::env::temp_dir().join(format!("tech3c_cfg_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tech3c.toml");

        let config = BridgeConfig::from_toml_str(SAMPLE).unwrap();
        config.save_toml(&path).unwrap();
        let loaded = BridgeConfig::from_toml_file(&path).unwrap();
        assert_eq!(loaded.auth, config.auth);
        assert_eq!(loaded.credentials, config.credentials);

        fs::remove_dir_all(&dir).ok();
    }
}
