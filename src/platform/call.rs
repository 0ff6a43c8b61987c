//! 外部调用描述
//!
//! 每个出站入口由稳定的 (方法名, 签名) 标识。JNI 适配器使用 Java 方法名和
//! JNI 签名，C ABI 适配器使用 `tech3c_ios_*` 符号名。

use crate::domain::errors::ErrorCode;
use std::fmt;

/// 出站外部入口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Initialize,
    Cleanup,
    SetDebugMode,
    SetUiMode,
    SetLanguage,
    SetOrientation,
    SetEnableGuestLogin,
    SetDisableExitLogin,
    SetRequireOtp,
    SetEnableMaintenanceCheck,
    SetIpMaintenanceCheck,
    SetEnableRequireBod,
    ShowAuth,
    Logout,
    GetAccessToken,
    GetRefreshToken,
    GetUserId,
    GetDeviceId,
}

impl Operation {
    /// Java 侧静态方法名
    pub fn method_name(self) -> &'static str {
        match self {
            Operation::Initialize => "initialize",
            Operation::Cleanup => "cleanup",
            Operation::SetDebugMode => "setDebugMode",
            Operation::SetUiMode => "setUiMode",
            Operation::SetLanguage => "setLanguage",
            Operation::SetOrientation => "setOrientation",
            Operation::SetEnableGuestLogin => "setEnableGuestLogin",
            Operation::SetDisableExitLogin => "setDisableExitLogin",
            Operation::SetRequireOtp => "setRequireOtp",
            Operation::SetEnableMaintenanceCheck => "setEnableMaintenanceCheck",
            Operation::SetIpMaintenanceCheck => "setIpMaintenanceCheck",
            Operation::SetEnableRequireBod => "setEnableRequireBOD",
            Operation::ShowAuth => "showAuth",
            Operation::Logout => "logout",
            Operation::GetAccessToken => "getAccessToken",
            Operation::GetRefreshToken => "getRefreshToken",
            Operation::GetUserId => "getUserId",
            Operation::GetDeviceId => "getDeviceId",
        }
    }

    /// JNI 方法签名
    pub fn jni_signature(self) -> &'static str {
        match self {
            Operation::Initialize => "(Ljava/lang/String;Ljava/lang/String;)V",
            Operation::Cleanup | Operation::ShowAuth | Operation::Logout => "()V",
            Operation::SetUiMode | Operation::SetLanguage | Operation::SetOrientation => "(I)V",
            Operation::SetIpMaintenanceCheck => "(Ljava/lang/String;)V",
            Operation::SetDebugMode
            | Operation::SetEnableGuestLogin
            | Operation::SetDisableExitLogin
            | Operation::SetRequireOtp
            | Operation::SetEnableMaintenanceCheck
            | Operation::SetEnableRequireBod => "(Z)V",
            Operation::GetAccessToken
            | Operation::GetRefreshToken
            | Operation::GetUserId
            | Operation::GetDeviceId => "()Ljava/lang/String;",
        }
    }

    /// C ABI 符号名
    pub fn native_symbol(self) -> &'static str {
        match self {
            Operation::Initialize => "tech3c_ios_initialize",
            Operation::Cleanup => "tech3c_ios_cleanup",
            Operation::SetDebugMode => "tech3c_ios_setDebugMode",
            Operation::SetUiMode => "tech3c_ios_setUiMode",
            Operation::SetLanguage => "tech3c_ios_setLanguage",
            Operation::SetOrientation => "tech3c_ios_setOrientation",
            Operation::SetEnableGuestLogin => "tech3c_ios_setEnableGuestLogin",
            Operation::SetDisableExitLogin => "tech3c_ios_setDisableExitLogin",
            Operation::SetRequireOtp => "tech3c_ios_setRequireOtp",
            Operation::SetEnableMaintenanceCheck => "tech3c_ios_setEnableMaintenanceCheck",
            Operation::SetIpMaintenanceCheck => "tech3c_ios_setIpMaintenanceCheck",
            Operation::SetEnableRequireBod => "tech3c_ios_setEnableRequireBOD",
            Operation::ShowAuth => "tech3c_ios_showAuth",
            Operation::Logout => "tech3c_ios_logout",
            Operation::GetAccessToken => "tech3c_ios_getAccessToken",
            Operation::GetRefreshToken => "tech3c_ios_getRefreshToken",
            Operation::GetUserId => "tech3c_ios_getUserId",
            Operation::GetDeviceId => "tech3c_ios_getDeviceId",
        }
    }

    /// Java 辅助类是否提供该方法
    ///
    /// `Tech3CHelper` 尚未实现 BOD 开关。
    pub fn has_java_binding(self) -> bool {
        !matches!(self, Operation::SetEnableRequireBod)
    }

    /// 转发失败时的错误码：(调用失败, 入口缺失)
    ///
    /// 初始化、清理和查询类调用不经错误槽报告，返回 `None`。
    pub fn failure_codes(self) -> Option<(ErrorCode, ErrorCode)> {
        let codes = match self {
            Operation::ShowAuth => (ErrorCode::ShowAuthFailed, ErrorCode::ShowAuthNotFound),
            Operation::SetOrientation => {
                (ErrorCode::OrientationFailed, ErrorCode::OrientationNotFound)
            }
            Operation::SetLanguage => (ErrorCode::LanguageFailed, ErrorCode::LanguageNotFound),
            Operation::SetUiMode => (ErrorCode::UiModeFailed, ErrorCode::UiModeNotFound),
            Operation::SetDebugMode => (ErrorCode::DebugModeFailed, ErrorCode::DebugModeNotFound),
            Operation::SetEnableGuestLogin => {
                (ErrorCode::GuestLoginFailed, ErrorCode::GuestLoginNotFound)
            }
            Operation::SetDisableExitLogin => {
                (ErrorCode::ExitLoginFailed, ErrorCode::ExitLoginNotFound)
            }
            Operation::SetRequireOtp => (ErrorCode::RequireOtpFailed, ErrorCode::RequireOtpNotFound),
            // BOD 开关与维护检查共用同一组错误码
            Operation::SetEnableMaintenanceCheck | Operation::SetEnableRequireBod => (
                ErrorCode::MaintenanceCheckFailed,
                ErrorCode::MaintenanceCheckNotFound,
            ),
            Operation::Logout => (ErrorCode::LogoutFailed, ErrorCode::LogoutNotFound),
            Operation::SetIpMaintenanceCheck => (
                ErrorCode::IpMaintenanceCheckFailed,
                ErrorCode::IpMaintenanceCheckNotFound,
            ),
            Operation::Initialize
            | Operation::Cleanup
            | Operation::GetAccessToken
            | Operation::GetRefreshToken
            | Operation::GetUserId
            | Operation::GetDeviceId => return None,
        };
        Some(codes)
    }

    /// 调用失败时面向用户的消息
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Initialize => "Failed to initialize Tech3C SDK",
            Operation::Cleanup => "Failed to clean up Tech3C SDK",
            Operation::SetDebugMode => "Failed to set debug mode",
            Operation::SetUiMode => "Failed to set UI mode",
            Operation::SetLanguage => "Failed to set language",
            Operation::SetOrientation => "Failed to set orientation",
            Operation::SetEnableGuestLogin => "Failed to set guest login",
            Operation::SetDisableExitLogin => "Failed to set disable exit login",
            Operation::SetRequireOtp => "Failed to set require OTP",
            Operation::SetEnableMaintenanceCheck => "Failed to set maintenance check",
            Operation::SetIpMaintenanceCheck => "Failed to set IP maintenance check",
            Operation::SetEnableRequireBod => "Failed to set enable Require BOD",
            Operation::ShowAuth => "Failed to show authentication screen",
            Operation::Logout => "Failed to logout",
            Operation::GetAccessToken
            | Operation::GetRefreshToken
            | Operation::GetUserId
            | Operation::GetDeviceId => "Failed to query SDK",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// 外部调用参数（已转换为外部调用约定）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignArg {
    Bool(bool),
    Int(i32),
    Str(String),
}

/// 一次出站外部调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignCall {
    pub operation: Operation,
    pub args: Vec<ForeignArg>,
}

impl ForeignCall {
    /// 无参数调用
    pub fn unit(operation: Operation) -> Self {
        Self {
            operation,
            args: Vec::new(),
        }
    }

    pub fn bool(operation: Operation, value: bool) -> Self {
        Self {
            operation,
            args: vec![ForeignArg::Bool(value)],
        }
    }

    pub fn int(operation: Operation, value: i32) -> Self {
        Self {
            operation,
            args: vec![ForeignArg::Int(value)],
        }
    }

    pub fn string(operation: Operation, value: impl Into<String>) -> Self {
        Self {
            operation,
            args: vec![ForeignArg::Str(value.into())],
        }
    }

    pub fn initialize(client_id: &str, client_secret: &str) -> Self {
        Self {
            operation: Operation::Initialize,
            args: vec![
                ForeignArg::Str(client_id.to_string()),
                ForeignArg::Str(client_secret.to_string()),
            ],
        }
    }

    pub fn bool_arg(&self, index: usize) -> Option<bool> {
        match self.args.get(index) {
            Some(ForeignArg::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn int_arg(&self, index: usize) -> Option<i32> {
        match self.args.get(index) {
            Some(ForeignArg::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn str_arg(&self, index: usize) -> Option<&str> {
        match self.args.get(index) {
            Some(ForeignArg::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// SDK 字符串查询
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignQuery {
    AccessToken,
    RefreshToken,
    UserId,
    DeviceId,
}

impl ForeignQuery {
    pub fn operation(self) -> Operation {
        match self {
            ForeignQuery::AccessToken => Operation::GetAccessToken,
            ForeignQuery::RefreshToken => Operation::GetRefreshToken,
            ForeignQuery::UserId => Operation::GetUserId,
            ForeignQuery::DeviceId => Operation::GetDeviceId,
        }
    }
}
