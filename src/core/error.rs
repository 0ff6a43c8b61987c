//! 统一错误处理模块
//!
//! 提供桥接层范围内的错误类型定义
//!
//! ## 错误类型分层
//!
//! - **适配器层错误** (`core::error::AdapterError`): 外部调用（JNI / C ABI）解析或执行失败
//! - **领域层错误** (`domain::errors`): 通过错误回调槽投递的 `ErrorEvent`，从不作为 `Err` 返回
//!
//! `BridgeError` 用于组装阶段（配置加载、入站路由注册、动态库加载）的错误。

use crate::config::ConfigError;
use thiserror::Error;

/// 桥接层核心错误类型
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Inbound sink already attached")]
    SinkAlreadyAttached,

    #[error("Failed to load native library: {0}")]
    LibraryLoad(String),

    #[error("General error: {0}")]
    General(String),
}

/// 外部调用错误
///
/// 每个变体都携带外部方法名，便于日志定位。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// 外部入口无法解析（方法或符号缺失）
    #[error("Failed to find {method} method")]
    Unresolved { method: &'static str },

    /// 外部调用抛出了可捕获的异常或返回失败
    #[error("Foreign call {method} failed: {reason}")]
    Failed { method: &'static str, reason: String },

    /// 当前平台不支持该调用
    #[error("{method} not supported on this platform")]
    Unsupported { method: &'static str },
}

impl AdapterError {
    /// 出错的外部方法名
    pub fn method(&self) -> &'static str {
        match self {
            AdapterError::Unresolved { method }
            | AdapterError::Failed { method, .. }
            | AdapterError::Unsupported { method } => method,
        }
    }
}

/// 桥接层结果类型别名
pub type BridgeResult<T> = Result<T, BridgeError>;
pub type AdapterResult<T> = Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let adapter_err = AdapterError::Unresolved { method: "showAuth" };
        let bridge_err: BridgeError = adapter_err.into();
        assert!(matches!(bridge_err, BridgeError::Adapter(_)));
    }

    #[test]
    fn test_error_display() {
        let err = AdapterError::Unresolved {
            method: "setDebugMode",
        };
        assert_eq!(err.to_string(), "Failed to find setDebugMode method");
        assert_eq!(err.method(), "setDebugMode");
    }
}
