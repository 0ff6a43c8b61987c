//! 登录场景
//!
//! 演示场景的无头展示模型：状态行及其颜色、用户信息文本和登录/登出按钮可见性。
//! 场景完全由网关回调驱动，回调只持有视图的 `Weak` 句柄。

use crate::config::{AuthConfig, Credentials, Language, OrientationMode, UiMode};
use crate::domain::{ErrorEvent, Session};
use crate::gateway::SessionGateway;
use bevy_ecs::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// 状态行颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Yellow,
    Green,
    Red,
    Orange,
    Blue,
}

impl StatusColor {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            StatusColor::Yellow => (255, 255, 0),
            StatusColor::Green => (0, 255, 0),
            StatusColor::Red => (255, 0, 0),
            StatusColor::Orange => (255, 127, 0),
            StatusColor::Blue => (0, 0, 255),
        }
    }
}

/// 场景视图状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginView {
    pub status: String,
    pub status_color: StatusColor,
    pub user_info: String,
    pub login_button_visible: bool,
    pub logout_button_visible: bool,
}

impl Default for LoginView {
    fn default() -> Self {
        Self {
            status: String::new(),
            status_color: StatusColor::Yellow,
            user_info: String::new(),
            login_button_visible: true,
            logout_button_visible: false,
        }
    }
}

impl LoginView {
    fn set_status(&mut self, message: impl Into<String>, color: StatusColor) {
        self.status = message.into();
        self.status_color = color;
        tracing::debug!(target: "scene", "Status: {}", self.status);
    }

    fn set_logged_in(&mut self, logged_in: bool) {
        self.login_button_visible = !logged_in;
        self.logout_button_visible = logged_in;
    }

    fn show_session(&mut self, session: &Session) {
        self.user_info = format_user_info(session);
        self.set_logged_in(true);
    }

    pub fn is_logged_in(&self) -> bool {
        self.logout_button_visible
    }
}

/// 用户信息文本，无效会话返回空串
pub fn format_user_info(session: &Session) -> String {
    if !session.is_valid() {
        return String::new();
    }

    let mut info = String::from("User Info:\n");
    info.push_str(&format!("ID: {}\n", session.user_id));
    info.push_str(&format!("Type: {}\n", session.login_type));
    info.push_str(&format!("Token: {}...\n", truncate(&session.access_token, 20)));
    if let Some(expiry) = session.expiry {
        info.push_str(&format!("Expires: {}", expiry));
        if session.is_expired_now() {
            info.push_str(" (expired)");
        }
    }
    info
}

fn truncate(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((index, _)) => &value[..index],
        None => value,
    }
}

fn lock(view: &Mutex<LoginView>) -> MutexGuard<'_, LoginView> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 登录场景 (ECS Resource)
#[derive(Resource)]
pub struct LoginScene {
    gateway: Arc<SessionGateway>,
    view: Arc<Mutex<LoginView>>,
    maintenance_ip: Option<String>,
}

impl LoginScene {
    /// 创建场景并向网关注册全部五个回调
    pub fn attach(gateway: Arc<SessionGateway>) -> Self {
        let view = Arc::new(Mutex::new(LoginView::default()));
        Self::install_callbacks(&gateway, Arc::downgrade(&view));
        Self {
            gateway,
            view,
            maintenance_ip: None,
        }
    }

    /// 点击登录前下发的维护检查 IP
    pub fn with_maintenance_ip(mut self, ip: Option<String>) -> Self {
        self.maintenance_ip = ip;
        self
    }

    fn install_callbacks(gateway: &SessionGateway, view: Weak<Mutex<LoginView>>) {
        let weak = view.clone();
        gateway.set_login_success_callback(move |session| {
            tracing::debug!(target: "scene", "Login success: user {} ({})", session.user_id, session.login_type);
            if let Some(view) = weak.upgrade() {
                let mut view = lock(&view);
                view.show_session(session);
                view.set_status("Login successful!", StatusColor::Green);
            }
        });

        let weak = view.clone();
        gateway.set_register_success_callback(move |session| {
            tracing::debug!(target: "scene", "Register success: user {}", session.user_id);
            if let Some(view) = weak.upgrade() {
                let mut view = lock(&view);
                view.show_session(session);
                view.set_status("Registration successful!", StatusColor::Green);
            }
        });

        let weak = view.clone();
        gateway.set_error_callback(move |error: &ErrorEvent| {
            tracing::error!(target: "scene", "Login error: code {}, {}", error.legacy_code(), error.message);
            if let Some(view) = weak.upgrade() {
                lock(&view).set_status(
                    format!("Error {}: {}", error.legacy_code(), error.message),
                    StatusColor::Red,
                );
            }
        });

        let weak = view.clone();
        gateway.set_cancel_callback(move || {
            if let Some(view) = weak.upgrade() {
                lock(&view).set_status("Login cancelled", StatusColor::Orange);
            }
        });

        gateway.set_auth_screen_opened_callback(move || {
            if let Some(view) = view.upgrade() {
                lock(&view).set_status("Auth screen opened", StatusColor::Blue);
            }
        });
    }

    /// 演示用的 SDK 配置
    pub fn demo_config() -> AuthConfig {
        AuthConfig {
            debug_mode: true,
            ui_mode: UiMode::Dialog,
            language: Language::Vietnamese,
            orientation: OrientationMode::Landscape,
            enable_guest_login: true,
            disable_exit_login: false,
            require_otp: true,
            ..AuthConfig::default()
        }
    }

    /// 初始化 SDK 并下发配置
    pub fn initialize_sdk(&self, credentials: &Credentials, config: &AuthConfig) -> bool {
        let success = self
            .gateway
            .initialize(&credentials.client_id, &credentials.client_secret);
        if success {
            self.gateway.apply_config(config);
            lock(&self.view).set_status("Tech3C SDK initialized successfully", StatusColor::Green);
        } else {
            lock(&self.view).set_status("Failed to initialize Tech3C SDK", StatusColor::Red);
        }
        success
    }

    /// 进入场景：网关已有会话时恢复登录视图
    pub fn on_enter(&self) {
        if self.gateway.is_logged_in() {
            let session = self.gateway.current_user();
            lock(&self.view).show_session(&session);
        }
    }

    pub fn on_login_clicked(&self) {
        if !self.gateway.is_initialized() {
            tracing::error!(target: "scene", "Login clicked before SDK initialization");
            lock(&self.view).set_status("ERROR: SDK not initialized", StatusColor::Red);
            return;
        }

        lock(&self.view).set_status("Showing login screen...", StatusColor::Yellow);
        if let Some(ip) = &self.maintenance_ip {
            self.gateway.set_ip_maintenance_check(ip);
        }
        self.gateway.show_auth();
    }

    pub fn on_logout_clicked(&self) {
        self.gateway.logout();
        let mut view = lock(&self.view);
        view.set_logged_in(false);
        view.user_info.clear();
        view.set_status("Logged out successfully", StatusColor::Orange);
    }

    /// 当前视图快照
    pub fn view(&self) -> LoginView {
        lock(&self.view).clone()
    }

    pub fn gateway(&self) -> &Arc<SessionGateway> {
        &self.gateway
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::ImmediateExecutor;
    use crate::domain::LoginType;
    use crate::platform::HeadlessAdapter;

    fn scene() -> LoginScene {
        let gateway = Arc::new(SessionGateway::new(
            Arc::new(HeadlessAdapter::new()),
            Arc::new(ImmediateExecutor),
        ));
        LoginScene::attach(gateway)
    }

    fn credentials() -> Credentials {
        Credentials {
            client_id: "3cgame".into(),
            client_secret: "secret".into(),
        }
    }

    #[test]
    fn test_login_before_initialize() {
        let scene = scene();
        scene.on_login_clicked();
        let view = scene.view();
        assert_eq!(view.status, "ERROR: SDK not initialized");
        assert_eq!(view.status_color, StatusColor::Red);
    }

    #[test]
    fn test_initialize_applies_demo_config() {
        let scene = scene();
        assert!(scene.initialize_sdk(&credentials(), &LoginScene::demo_config()));
        assert_eq!(scene.view().status, "Tech3C SDK initialized successfully");
        assert_eq!(scene.gateway().config().language, Language::Vietnamese);
        assert!(scene.gateway().config().require_otp);
    }

    #[test]
    fn test_initialize_failure_status() {
        let scene = scene();
        assert!(!scene.initialize_sdk(&Credentials::default(), &AuthConfig::default()));
        assert_eq!(scene.view().status, "Failed to initialize Tech3C SDK");
        assert_eq!(scene.view().status_color, StatusColor::Red);
    }

    #[test]
    fn test_login_and_logout_flow() {
        let scene = scene();
        scene.initialize_sdk(&credentials(), &AuthConfig::default());

        scene.on_login_clicked();
        assert_eq!(scene.view().status, "Showing login screen...");

        scene.gateway().on_auth_screen_opened();
        assert_eq!(scene.view().status_color, StatusColor::Blue);

        scene
            .gateway()
            .on_login_success("u1", "abcdefghijklmnopqrstuvwxyz", "r", 2, 0);
        let view = scene.view();
        assert_eq!(view.status, "Login successful!");
        assert!(view.is_logged_in());
        assert!(!view.login_button_visible);
        assert!(view.user_info.contains("ID: u1"));
        assert!(view.user_info.contains("Type: social"));
        assert!(view.user_info.contains("Token: abcdefghijklmnopqrst..."));

        scene.on_logout_clicked();
        let view = scene.view();
        assert_eq!(view.status, "Logged out successfully");
        assert!(view.login_button_visible);
        assert!(view.user_info.is_empty());
        assert!(!scene.gateway().is_logged_in());
    }

    #[test]
    fn test_maintenance_ip_unsupported_on_headless() {
        let scene = scene().with_maintenance_ip(Some("103.51.120.202".into()));
        scene.initialize_sdk(&credentials(), &AuthConfig::default());
        scene.on_login_clicked();
        assert_eq!(
            scene.view().status,
            "Error 1024: Platform not supported for IP maintenance check"
        );
    }

    #[test]
    fn test_error_and_cancel_status() {
        let scene = scene();
        scene.gateway().on_error("Network unavailable");
        assert_eq!(scene.view().status, "Error 2000: Network unavailable");

        scene.gateway().on_auth_cancelled();
        assert_eq!(scene.view().status, "Login cancelled");
        assert_eq!(scene.view().status_color.rgb(), (255, 127, 0));
    }

    #[test]
    fn test_on_enter_restores_session() {
        let gateway = Arc::new(SessionGateway::new(
            Arc::new(HeadlessAdapter::new()),
            Arc::new(ImmediateExecutor),
        ));
        gateway.on_register_success("u7", "tok7", "rtok7", 1700000000000);

        let scene = LoginScene::attach(gateway);
        assert!(!scene.view().is_logged_in());
        scene.on_enter();
        assert!(scene.view().is_logged_in());
        assert!(scene
            .view()
            .user_info
            .ends_with("Expires: 1700000000000 (expired)"));
        assert_eq!(scene.gateway().current_user().login_type, LoginType::Account);
    }

    #[test]
    fn test_format_user_info_invalid_session() {
        assert_eq!(format_user_info(&Session::default()), "");
    }
}
