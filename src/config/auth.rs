/// 认证 SDK 配置
///
/// 网关独占持有一份 `AuthConfig`，每个 setter 独立修改一个字段。
use crate::{impl_default, impl_ordinal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 认证界面显示模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UiMode {
    /// 对话框
    Dialog,
    /// 全屏
    Fullscreen,
}

impl_ordinal!(UiMode {
    Dialog = 0,
    Fullscreen = 1,
});

/// 界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Vietnamese,
    Chinese,
    Khmer,
    Lao,
    Thai,
}

impl_ordinal!(Language {
    English = 0,
    Vietnamese = 1,
    Chinese = 2,
    Khmer = 3,
    Lao = 4,
    Thai = 5,
});

/// 屏幕方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrientationMode {
    Auto,
    Portrait,
    Landscape,
}

impl_ordinal!(OrientationMode {
    Auto = 0,
    Portrait = 1,
    Landscape = 2,
});

impl UiMode {
    pub fn name(self) -> &'static str {
        match self {
            UiMode::Dialog => "Dialog",
            UiMode::Fullscreen => "Fullscreen",
        }
    }
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Vietnamese,
        Language::Chinese,
        Language::Khmer,
        Language::Lao,
        Language::Thai,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Vietnamese => "Vietnamese",
            Language::Chinese => "Chinese",
            Language::Khmer => "Khmer",
            Language::Lao => "Lao",
            Language::Thai => "Thai",
        }
    }

    /// 按名称（忽略大小写）或序号解析
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(ordinal) = value.parse::<i32>() {
            return Self::from_ordinal(ordinal);
        }
        Self::ALL
            .into_iter()
            .find(|lang| lang.name().eq_ignore_ascii_case(value))
    }
}

impl OrientationMode {
    pub const ALL: [OrientationMode; 3] = [
        OrientationMode::Auto,
        OrientationMode::Portrait,
        OrientationMode::Landscape,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OrientationMode::Auto => "Auto",
            OrientationMode::Portrait => "Portrait",
            OrientationMode::Landscape => "Landscape",
        }
    }

    /// 按名称（忽略大小写）或序号解析
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(ordinal) = value.parse::<i32>() {
            return Self::from_ordinal(ordinal);
        }
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for UiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for OrientationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// SDK 配置值对象
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 客户端 ID（由 `initialize` 写入）
    #[serde(skip)]
    pub client_id: String,
    /// 客户端密钥（由 `initialize` 写入）
    #[serde(skip)]
    pub client_secret: String,
    pub debug_mode: bool,
    pub ui_mode: UiMode,
    pub language: Language,
    pub orientation: OrientationMode,
    pub enable_guest_login: bool,
    pub disable_exit_login: bool,
    pub require_otp: bool,
    pub enable_maintenance_check: bool,
    pub enable_require_bod: bool,
}

impl_default!(AuthConfig {
    client_id: String::new(),
    client_secret: String::new(),
    debug_mode: false,
    ui_mode: UiMode::Dialog,
    language: Language::English,
    orientation: OrientationMode::Auto,
    enable_guest_login: true,
    disable_exit_login: false,
    require_otp: false,
    enable_maintenance_check: true,
    enable_require_bod: false,
});
