//! 会话网关
//!
//! 应用代码与外部认证 SDK 之间的有状态门面：
//!
//! - 持有配置、初始化闸门、当前会话和五个回调槽
//! - 未初始化时，配置类调用照常写入内存配置，但不转发并通过错误槽报告 1001
//! - 外部回调可在任意线程到达，统一投递到拥有线程后再分发给应用回调
//!
//! ## 锁规则
//!
//! - 状态锁只覆盖读-改-写，从不在持锁期间调用外部 SDK 或应用回调
//! - 初始化锁串行化 `initialize` 与 `cleanup`，与状态锁相互独立
//!
//! ## 示例
//!
//! ```rust
//! use std::sync::Arc;
//! use tech3c_bridge::core::ImmediateExecutor;
//! use tech3c_bridge::gateway::SessionGateway;
//! use tech3c_bridge::platform::HeadlessAdapter;
//!
//! let gateway = SessionGateway::new(Arc::new(HeadlessAdapter::new()), Arc::new(ImmediateExecutor));
//! assert!(gateway.initialize("client-id", "client-secret"));
//! gateway.on_login_success("u1", "tok1", "rtok1", 1, 0);
//! assert!(gateway.is_logged_in());
//! ```

pub mod slots;

pub use slots::{CallbackSlots, ErrorCallback, NotifyCallback, SessionCallback, SlotKind};

use crate::config::{AuthConfig, Language, OrientationMode, UiMode};
use crate::core::error::BridgeResult;
use crate::core::scheduler::OwnerThread;
use crate::core::utils::or_empty;
use crate::domain::{ErrorEvent, LoginType, Session};
use crate::platform::inbound::{self, InboundEvent, InboundSink};
use crate::platform::{ForeignCall, ForeignQuery, Operation, PlatformAdapter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

#[derive(Debug, Default)]
struct GatewayState {
    initialized: bool,
    config: AuthConfig,
    session: Session,
    slots: CallbackSlots,
}

struct GatewayInner {
    state: Mutex<GatewayState>,
    init_lock: Mutex<()>,
    adapter: Arc<dyn PlatformAdapter>,
    owner: Arc<dyn OwnerThread>,
}

impl GatewayInner {
    fn lock_state(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 认证会话网关
pub struct SessionGateway {
    inner: Arc<GatewayInner>,
}

impl SessionGateway {
    /// 创建网关
    ///
    /// 新网关处于未初始化状态，会话为空，所有回调槽为空。
    pub fn new(adapter: Arc<dyn PlatformAdapter>, owner: Arc<dyn OwnerThread>) -> Self {
        tracing::debug!(target: "tech3c", "Creating session gateway on {} adapter", adapter.name());
        Self {
            inner: Arc::new(GatewayInner {
                state: Mutex::new(GatewayState::default()),
                init_lock: Mutex::new(()),
                adapter,
                owner,
            }),
        }
    }

    /// 创建网关并挂接到进程级入站路由
    ///
    /// 已有存活网关挂接时返回 `SinkAlreadyAttached`。
    pub fn shared(
        adapter: Arc<dyn PlatformAdapter>,
        owner: Arc<dyn OwnerThread>,
    ) -> BridgeResult<Arc<Self>> {
        let gateway = Arc::new(Self::new(adapter, owner));
        let sink: Arc<dyn InboundSink> = gateway.clone();
        inbound::attach(&sink)?;
        Ok(gateway)
    }

    // ========================================================================
    // 生命周期
    // ========================================================================

    /// 初始化 SDK
    ///
    /// 已初始化时直接返回 `true`。任一凭据为空时返回 `false`，不发起外部调用。
    /// 凭据在外部调用前写入配置，初始化失败后仍可通过 [`config`](Self::config) 读到。
    pub fn initialize(&self, client_id: &str, client_secret: &str) -> bool {
        let _init = self.inner.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_initialized() {
            tracing::debug!(target: "tech3c", "Tech3C SDK already initialized");
            return true;
        }

        if client_id.is_empty() || client_secret.is_empty() {
            tracing::error!(target: "tech3c", "Client ID or Client Secret is empty");
            return false;
        }

        {
            let mut state = self.inner.lock_state();
            state.config.client_id = client_id.to_string();
            state.config.client_secret = client_secret.to_string();
        }

        let adapter = &self.inner.adapter;
        if let Err(err) = adapter.forward(&ForeignCall::initialize(client_id, client_secret)) {
            tracing::error!(target: "tech3c", "Failed to initialize Tech3C SDK: {}", err);
            return false;
        }
        if let Err(err) = adapter.attach_inbound() {
            tracing::warn!(target: "tech3c", "Failed to register SDK callbacks: {}", err);
        }

        self.inner.lock_state().initialized = true;
        tracing::info!(target: "tech3c", "Tech3C SDK initialized on {} adapter", adapter.name());
        true
    }

    /// 清理 SDK
    ///
    /// 清空会话和所有回调槽并回到未初始化状态。未初始化时不做任何事。
    pub fn cleanup(&self) {
        let _init = self.inner.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        {
            let mut state = self.inner.lock_state();
            if !state.initialized {
                return;
            }
            state.initialized = false;
            state.session.clear();
            state.slots.clear();
        }

        if let Err(err) = self.inner.adapter.forward(&ForeignCall::unit(Operation::Cleanup)) {
            tracing::warn!(target: "tech3c", "SDK cleanup failed: {}", err);
        }
        tracing::info!(target: "tech3c", "Tech3C SDK cleaned up");
    }

    // ========================================================================
    // 配置
    // ========================================================================

    pub fn set_debug_mode(&self, enabled: bool) {
        self.inner.lock_state().config.debug_mode = enabled;
        self.forward_gated(ForeignCall::bool(Operation::SetDebugMode, enabled));
    }

    pub fn set_ui_mode(&self, mode: UiMode) {
        self.inner.lock_state().config.ui_mode = mode;
        self.forward_gated(ForeignCall::int(Operation::SetUiMode, mode.ordinal()));
    }

    pub fn set_language(&self, language: Language) {
        self.inner.lock_state().config.language = language;
        self.forward_gated(ForeignCall::int(Operation::SetLanguage, language.ordinal()));
    }

    pub fn set_orientation(&self, orientation: OrientationMode) {
        self.inner.lock_state().config.orientation = orientation;
        self.forward_gated(ForeignCall::int(
            Operation::SetOrientation,
            orientation.ordinal(),
        ));
    }

    pub fn set_enable_guest_login(&self, enabled: bool) {
        self.inner.lock_state().config.enable_guest_login = enabled;
        self.forward_gated(ForeignCall::bool(Operation::SetEnableGuestLogin, enabled));
    }

    pub fn set_disable_exit_login(&self, disabled: bool) {
        self.inner.lock_state().config.disable_exit_login = disabled;
        self.forward_gated(ForeignCall::bool(Operation::SetDisableExitLogin, disabled));
    }

    pub fn set_require_otp(&self, required: bool) {
        self.inner.lock_state().config.require_otp = required;
        self.forward_gated(ForeignCall::bool(Operation::SetRequireOtp, required));
    }

    pub fn set_enable_maintenance_check(&self, enabled: bool) {
        self.inner.lock_state().config.enable_maintenance_check = enabled;
        self.forward_gated(ForeignCall::bool(
            Operation::SetEnableMaintenanceCheck,
            enabled,
        ));
    }

    /// 设置维护检查 IP（不保存在配置中）
    pub fn set_ip_maintenance_check(&self, ip: &str) {
        self.forward_gated(ForeignCall::string(Operation::SetIpMaintenanceCheck, ip));
    }

    pub fn set_enable_require_bod(&self, enabled: bool) {
        self.inner.lock_state().config.enable_require_bod = enabled;
        self.forward_gated(ForeignCall::bool(Operation::SetEnableRequireBod, enabled));
    }

    /// 依次调用所有配置 setter（凭据除外）
    pub fn apply_config(&self, config: &AuthConfig) {
        self.set_debug_mode(config.debug_mode);
        self.set_ui_mode(config.ui_mode);
        self.set_language(config.language);
        self.set_orientation(config.orientation);
        self.set_enable_guest_login(config.enable_guest_login);
        self.set_disable_exit_login(config.disable_exit_login);
        self.set_require_otp(config.require_otp);
        self.set_enable_maintenance_check(config.enable_maintenance_check);
        self.set_enable_require_bod(config.enable_require_bod);
    }

    // ========================================================================
    // 认证操作
    // ========================================================================

    pub fn show_auth(&self) {
        self.forward_gated(ForeignCall::unit(Operation::ShowAuth));
    }

    /// 登出
    ///
    /// 无论是否初始化都会清空本地会话。
    pub fn logout(&self) {
        self.inner.lock_state().session.clear();
        self.forward_gated(ForeignCall::unit(Operation::Logout));
    }

    /// 读取 SDK 字符串状态，未初始化或失败时返回 `None`
    pub fn query(&self, query: ForeignQuery) -> Option<String> {
        if !self.is_initialized() {
            tracing::warn!(target: "tech3c", "{} called before initialization", query.operation());
            return None;
        }
        match self.inner.adapter.query(query) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(target: "tech3c", "Query {} failed: {}", query.operation(), err);
                None
            }
        }
    }

    // ========================================================================
    // 访问器
    // ========================================================================

    pub fn is_initialized(&self) -> bool {
        self.inner.lock_state().initialized
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.lock_state().session.is_valid()
    }

    /// 当前会话快照
    pub fn current_user(&self) -> Session {
        self.inner.lock_state().session.clone()
    }

    /// 当前配置快照
    pub fn config(&self) -> AuthConfig {
        self.inner.lock_state().config.clone()
    }

    // ========================================================================
    // 回调槽
    // ========================================================================

    pub fn set_login_success_callback<F>(&self, callback: F)
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        self.inner.lock_state().slots.login_success = Some(Arc::new(callback));
    }

    pub fn set_register_success_callback<F>(&self, callback: F)
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        self.inner.lock_state().slots.register_success = Some(Arc::new(callback));
    }

    pub fn set_error_callback<F>(&self, callback: F)
    where
        F: Fn(&ErrorEvent) + Send + Sync + 'static,
    {
        self.inner.lock_state().slots.error = Some(Arc::new(callback));
    }

    pub fn set_cancel_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.lock_state().slots.cancel = Some(Arc::new(callback));
    }

    pub fn set_auth_screen_opened_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.lock_state().slots.auth_screen_opened = Some(Arc::new(callback));
    }

    pub fn clear_callback(&self, kind: SlotKind) {
        self.inner.lock_state().slots.clear_slot(kind);
    }

    // ========================================================================
    // 外部回调入口（任意线程）
    // ========================================================================

    pub fn on_login_success(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
        login_type: i32,
        expiry: i64,
    ) {
        let login_type = LoginType::classify(login_type);
        let snapshot = self.store_session(Session::from_foreign(
            user_id.to_string(),
            access_token.to_string(),
            refresh_token.to_string(),
            login_type,
            expiry,
        ));
        tracing::info!(target: "tech3c", "Login success: user {} ({})", or_empty(user_id), login_type);
        self.dispatch_session(SlotKind::LoginSuccess, snapshot);
    }

    /// 注册成功，登录方式固定为 `Account`
    pub fn on_register_success(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
        expiry: i64,
    ) {
        let snapshot = self.store_session(Session::from_foreign(
            user_id.to_string(),
            access_token.to_string(),
            refresh_token.to_string(),
            LoginType::Account,
            expiry,
        ));
        tracing::info!(target: "tech3c", "Register success: user {}", or_empty(user_id));
        self.dispatch_session(SlotKind::RegisterSuccess, snapshot);
    }

    pub fn on_error(&self, message: &str) {
        tracing::warn!(target: "tech3c", "SDK reported error: {}", message);
        self.raise_error(ErrorEvent::auth_error(message));
    }

    pub fn on_auth_cancelled(&self) {
        tracing::debug!(target: "tech3c", "Authentication cancelled");
        self.dispatch_notify(SlotKind::Cancel);
    }

    pub fn on_auth_screen_opened(&self) {
        tracing::debug!(target: "tech3c", "Authentication screen opened");
        self.dispatch_notify(SlotKind::AuthScreenOpened);
    }

    // ========================================================================
    // 内部
    // ========================================================================

    fn store_session(&self, session: Session) -> Session {
        let mut state = self.inner.lock_state();
        state.session = session;
        state.session.clone()
    }

    /// 初始化闸门 + 单次外部调用
    fn forward_gated(&self, call: ForeignCall) {
        let operation = call.operation;
        if !self.is_initialized() {
            tracing::warn!(target: "tech3c", "{} called before SDK initialization", operation);
            self.raise_error(ErrorEvent::not_initialized());
            return;
        }

        match self.inner.adapter.forward(&call) {
            Ok(()) => tracing::debug!(target: "tech3c", "Forwarded {} {:?}", operation, call.args),
            Err(err) => {
                tracing::error!(target: "tech3c", "{}: {}", operation.failure_message(), err);
                if let Some(event) = ErrorEvent::from_adapter(operation, &err) {
                    self.raise_error(event);
                }
            }
        }
    }

    // 以下分发函数只捕获 Weak 句柄，在拥有线程上执行时才读取槽，
    // 因此清理后不会再触发旧订阅者

    fn raise_error(&self, event: ErrorEvent) {
        let inner = Arc::downgrade(&self.inner);
        self.inner.owner.post(Box::new(move || {
            let Some(inner) = inner.upgrade() else { return };
            let callback = inner.lock_state().slots.error.clone();
            if let Some(callback) = callback {
                callback(&event);
            }
        }));
    }

    fn dispatch_session(&self, kind: SlotKind, session: Session) {
        let inner = Arc::downgrade(&self.inner);
        self.inner.owner.post(Box::new(move || {
            let Some(inner) = inner.upgrade() else { return };
            let callback = inner.lock_state().slots.session_callback(kind);
            if let Some(callback) = callback {
                callback(&session);
            }
        }));
    }

    fn dispatch_notify(&self, kind: SlotKind) {
        let inner: Weak<GatewayInner> = Arc::downgrade(&self.inner);
        self.inner.owner.post(Box::new(move || {
            let Some(inner) = inner.upgrade() else { return };
            let callback = inner.lock_state().slots.notify_callback(kind);
            if let Some(callback) = callback {
                callback();
            }
        }));
    }
}

impl InboundSink for SessionGateway {
    fn ingest(&self, event: InboundEvent) {
        match event {
            InboundEvent::LoginSuccess {
                user_id,
                access_token,
                refresh_token,
                login_type,
                expiry,
            } => self.on_login_success(&user_id, &access_token, &refresh_token, login_type, expiry),
            InboundEvent::RegisterSuccess {
                user_id,
                access_token,
                refresh_token,
                expiry,
            } => self.on_register_success(&user_id, &access_token, &refresh_token, expiry),
            InboundEvent::Error { message } => self.on_error(&message),
            InboundEvent::AuthCancelled => self.on_auth_cancelled(),
            InboundEvent::AuthScreenOpened => self.on_auth_screen_opened(),
        }
    }
}

impl std::fmt::Debug for SessionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock_state();
        f.debug_struct("SessionGateway")
            .field("adapter", &self.inner.adapter.name())
            .field("initialized", &state.initialized)
            .field("logged_in", &state.session.is_valid())
            .field("slots", &state.slots)
            .finish()
    }
}
