//! 领域错误事件
//!
//! `ErrorEvent` 是值而不是异常：它总是通过错误回调槽投递，从不作为 `Err` 返回。
//! `ErrorCode` 是封闭枚举，只有在对外边界上才映射为历史整数值。

use crate::core::error::AdapterError;
use crate::platform::call::Operation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 错误码
///
/// 判别值就是对外兼容的历史整数码，不得修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    NotInitialized = 1001,
    ShowAuthFailed = 1002,
    ShowAuthNotFound = 1003,
    OrientationFailed = 1004,
    OrientationNotFound = 1005,
    LanguageFailed = 1006,
    LanguageNotFound = 1007,
    UiModeFailed = 1008,
    UiModeNotFound = 1009,
    DebugModeFailed = 1010,
    DebugModeNotFound = 1011,
    GuestLoginFailed = 1012,
    GuestLoginNotFound = 1013,
    ExitLoginFailed = 1014,
    ExitLoginNotFound = 1015,
    RequireOtpFailed = 1016,
    RequireOtpNotFound = 1017,
    MaintenanceCheckFailed = 1018,
    MaintenanceCheckNotFound = 1019,
    LogoutFailed = 1020,
    LogoutNotFound = 1021,
    IpMaintenanceCheckFailed = 1022,
    IpMaintenanceCheckNotFound = 1023,
    IpMaintenanceCheckUnsupported = 1024,
    AuthError = 2000,
}

impl ErrorCode {
    const ALL: [ErrorCode; 25] = [
        ErrorCode::NotInitialized,
        ErrorCode::ShowAuthFailed,
        ErrorCode::ShowAuthNotFound,
        ErrorCode::OrientationFailed,
        ErrorCode::OrientationNotFound,
        ErrorCode::LanguageFailed,
        ErrorCode::LanguageNotFound,
        ErrorCode::UiModeFailed,
        ErrorCode::UiModeNotFound,
        ErrorCode::DebugModeFailed,
        ErrorCode::DebugModeNotFound,
        ErrorCode::GuestLoginFailed,
        ErrorCode::GuestLoginNotFound,
        ErrorCode::ExitLoginFailed,
        ErrorCode::ExitLoginNotFound,
        ErrorCode::RequireOtpFailed,
        ErrorCode::RequireOtpNotFound,
        ErrorCode::MaintenanceCheckFailed,
        ErrorCode::MaintenanceCheckNotFound,
        ErrorCode::LogoutFailed,
        ErrorCode::LogoutNotFound,
        ErrorCode::IpMaintenanceCheckFailed,
        ErrorCode::IpMaintenanceCheckNotFound,
        ErrorCode::IpMaintenanceCheckUnsupported,
        ErrorCode::AuthError,
    ];

    /// 对外兼容的整数码
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// 错误事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ErrorEvent {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// SDK 尚未初始化 (1001)
    pub fn not_initialized() -> Self {
        Self::new(ErrorCode::NotInitialized, "SDK not initialized")
    }

    /// SDK 报告的认证错误 (2000)
    pub fn auth_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthError, message)
    }

    /// 将外部调用失败转换为带编号的错误事件
    ///
    /// 不经错误槽报告的调用（初始化、清理、查询）返回 `None`。
    pub fn from_adapter(operation: Operation, error: &AdapterError) -> Option<Self> {
        let (failed, not_found) = operation.failure_codes()?;
        let event = match error {
            AdapterError::Unresolved { method } => {
                Self::new(not_found, format!("Failed to find {} method", method))
            }
            AdapterError::Unsupported { .. } if operation == Operation::SetIpMaintenanceCheck => {
                Self::new(
                    ErrorCode::IpMaintenanceCheckUnsupported,
                    "Platform not supported for IP maintenance check",
                )
            }
            AdapterError::Failed { .. } | AdapterError::Unsupported { .. } => {
                Self::new(failed, operation.failure_message())
            }
        };
        Some(event.with_details(error.to_string()))
    }

    /// 对外兼容的整数码
    pub fn legacy_code(&self) -> i32 {
        self.code.code()
    }
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {}: {}", self.code, self.message)
    }
}
