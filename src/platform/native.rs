//! C ABI 适配器
//!
//! 通过 `libloading` 在运行时解析 `tech3c_ios_*` 符号。每次调用都重新解析，
//! 符号缺失只影响对应操作，不影响适配器本身的创建。
//!
//! 入站方向：`attach_inbound` 把五个 `extern "C"` 跳板注册给 SDK，
//! 跳板把 C 字符串转换为 `InboundEvent` 后交给入站路由。

use super::call::{ForeignCall, ForeignQuery, Operation};
use super::inbound::{self, InboundEvent};
use super::PlatformAdapter;
use crate::core::error::{AdapterError, AdapterResult, BridgeError, BridgeResult};
use libloading::{Library, Symbol};
use std::ffi::{c_char, c_int, c_long, CStr, CString, OsStr};

type InitializeFn = unsafe extern "C" fn(*const c_char, *const c_char) -> bool;
type VoidFn = unsafe extern "C" fn();
type BoolFn = unsafe extern "C" fn(bool);
type IntFn = unsafe extern "C" fn(c_int);
type StrFn = unsafe extern "C" fn(*const c_char);
type GetStrFn = unsafe extern "C" fn() -> *const c_char;

type LoginSuccessCallback =
    unsafe extern "C" fn(*const c_char, *const c_char, *const c_char, c_int, c_long);
type RegisterSuccessCallback =
    unsafe extern "C" fn(*const c_char, *const c_char, *const c_char, c_long);
type ErrorCallback = unsafe extern "C" fn(*const c_char);
type NotifyCallback = unsafe extern "C" fn();

const SET_LOGIN_SUCCESS_CALLBACK: &str = "tech3c_ios_setLoginSuccessCallback";
const SET_REGISTER_SUCCESS_CALLBACK: &str = "tech3c_ios_setRegisterSuccessCallback";
const SET_ERROR_CALLBACK: &str = "tech3c_ios_setErrorCallback";
const SET_CANCEL_CALLBACK: &str = "tech3c_ios_setCancelCallback";
const SET_AUTH_SCREEN_OPENED_CALLBACK: &str = "tech3c_ios_setAuthScreenOpenedCallback";

/// C ABI 适配器
pub struct NativeAdapter {
    library: Library,
}

impl NativeAdapter {
    /// 加载指定路径的动态库
    pub fn open<P: AsRef<OsStr>>(path: P) -> BridgeResult<Self> {
        let path = path.as_ref();
        // SAFETY: 加载的库只通过下面声明的 C 签名访问
        let library = unsafe { Library::new(path) }
            .map_err(|e| BridgeError::LibraryLoad(format!("{}: {}", path.to_string_lossy(), e)))?;
        tracing::info!(target: "tech3c.native", "Loaded Tech3C library from {:?}", path);
        Ok(Self { library })
    }

    /// 使用当前进程中已链接的符号（SDK 静态链接时）
    #[cfg(unix)]
    pub fn this() -> Self {
        Self {
            library: libloading::os::unix::Library::this().into(),
        }
    }

    fn resolve<T>(&self, method: &'static str, symbol: &str) -> AdapterResult<Symbol<'_, T>> {
        // SAFETY: T 是与 SDK 头文件一致的函数指针类型
        unsafe { self.library.get::<T>(symbol.as_bytes()) }.map_err(|e| {
            tracing::error!(target: "tech3c.native", "Failed to resolve {}: {}", symbol, e);
            AdapterError::Unresolved { method }
        })
    }

    fn resolve_op<T>(&self, operation: Operation) -> AdapterResult<Symbol<'_, T>> {
        self.resolve(operation.method_name(), operation.native_symbol())
    }

    fn register<T>(&self, symbol: &'static str, callback: T) -> AdapterResult<()> {
        let setter = self.resolve::<unsafe extern "C" fn(T)>(symbol, symbol)?;
        // SAFETY: 回调是整个进程生命周期内有效的静态函数
        unsafe { setter(callback) };
        Ok(())
    }
}

fn bad_argument(operation: Operation) -> AdapterError {
    AdapterError::Failed {
        method: operation.method_name(),
        reason: "missing or mistyped argument".to_string(),
    }
}

fn c_string(call: &ForeignCall, index: usize) -> AdapterResult<CString> {
    let value = call.str_arg(index).ok_or_else(|| bad_argument(call.operation))?;
    CString::new(value).map_err(|e| AdapterError::Failed {
        method: call.operation.method_name(),
        reason: e.to_string(),
    })
}

impl PlatformAdapter for NativeAdapter {
    fn name(&self) -> &'static str {
        "native"
    }

    fn forward(&self, call: &ForeignCall) -> AdapterResult<()> {
        let operation = call.operation;
        match operation {
            Operation::Initialize => {
                let client_id = c_string(call, 0)?;
                let client_secret = c_string(call, 1)?;
                let initialize = self.resolve_op::<InitializeFn>(operation)?;
                // SAFETY: 两个指针在调用期间有效
                let ok = unsafe { initialize(client_id.as_ptr(), client_secret.as_ptr()) };
                if !ok {
                    return Err(AdapterError::Failed {
                        method: operation.method_name(),
                        reason: "SDK rejected initialization".to_string(),
                    });
                }
            }
            Operation::Cleanup | Operation::ShowAuth | Operation::Logout => {
                let function = self.resolve_op::<VoidFn>(operation)?;
                unsafe { function() };
            }
            Operation::SetDebugMode
            | Operation::SetEnableGuestLogin
            | Operation::SetDisableExitLogin
            | Operation::SetRequireOtp
            | Operation::SetEnableMaintenanceCheck
            | Operation::SetEnableRequireBod => {
                let value = call.bool_arg(0).ok_or_else(|| bad_argument(operation))?;
                let function = self.resolve_op::<BoolFn>(operation)?;
                unsafe { function(value) };
            }
            Operation::SetUiMode | Operation::SetLanguage | Operation::SetOrientation => {
                let value = call.int_arg(0).ok_or_else(|| bad_argument(operation))?;
                let function = self.resolve_op::<IntFn>(operation)?;
                unsafe { function(value as c_int) };
            }
            Operation::SetIpMaintenanceCheck => {
                let ip = c_string(call, 0)?;
                let function = self.resolve_op::<StrFn>(operation)?;
                unsafe { function(ip.as_ptr()) };
            }
            Operation::GetAccessToken
            | Operation::GetRefreshToken
            | Operation::GetUserId
            | Operation::GetDeviceId => {
                return Err(AdapterError::Unsupported {
                    method: operation.method_name(),
                });
            }
        }
        tracing::trace!(target: "tech3c.native", "Called {}", operation.native_symbol());
        Ok(())
    }

    fn attach_inbound(&self) -> AdapterResult<()> {
        self.register::<LoginSuccessCallback>(SET_LOGIN_SUCCESS_CALLBACK, on_login_success)?;
        self.register::<RegisterSuccessCallback>(
            SET_REGISTER_SUCCESS_CALLBACK,
            on_register_success,
        )?;
        self.register::<ErrorCallback>(SET_ERROR_CALLBACK, on_error)?;
        self.register::<NotifyCallback>(SET_CANCEL_CALLBACK, on_auth_cancelled)?;
        self.register::<NotifyCallback>(SET_AUTH_SCREEN_OPENED_CALLBACK, on_auth_screen_opened)?;
        tracing::debug!(target: "tech3c.native", "Native callbacks registered");
        Ok(())
    }

    fn query(&self, query: ForeignQuery) -> AdapterResult<Option<String>> {
        let getter = self.resolve_op::<GetStrFn>(query.operation())?;
        // SAFETY: 返回的字符串归 SDK 所有，这里只做拷贝
        let value = unsafe { getter() };
        Ok(unsafe { optional_string(value) })
    }
}

/// 拷贝 C 字符串；空指针返回 `None`
///
/// # Safety
///
/// 非空的 `ptr` 必须指向以 NUL 结尾的有效字符串。
unsafe fn optional_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }
}

unsafe fn string_or(ptr: *const c_char, fallback: &str) -> String {
    unsafe { optional_string(ptr) }.unwrap_or_else(|| fallback.to_string())
}

unsafe extern "C" fn on_login_success(
    user_id: *const c_char,
    access_token: *const c_char,
    refresh_token: *const c_char,
    login_type: c_int,
    expiry: c_long,
) {
    let event = unsafe {
        InboundEvent::LoginSuccess {
            user_id: string_or(user_id, ""),
            access_token: string_or(access_token, ""),
            refresh_token: string_or(refresh_token, ""),
            login_type,
            expiry: i64::from(expiry),
        }
    };
    inbound::deliver(event);
}

unsafe extern "C" fn on_register_success(
    user_id: *const c_char,
    access_token: *const c_char,
    refresh_token: *const c_char,
    expiry: c_long,
) {
    let event = unsafe {
        InboundEvent::RegisterSuccess {
            user_id: string_or(user_id, ""),
            access_token: string_or(access_token, ""),
            refresh_token: string_or(refresh_token, ""),
            expiry: i64::from(expiry),
        }
    };
    inbound::deliver(event);
}

unsafe extern "C" fn on_error(message: *const c_char) {
    let message = unsafe { optional_string(message) };
    inbound::deliver(InboundEvent::error(message));
}

unsafe extern "C" fn on_auth_cancelled() {
    inbound::deliver(InboundEvent::AuthCancelled);
}

unsafe extern "C" fn on_auth_screen_opened() {
    inbound::deliver(InboundEvent::AuthScreenOpened);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::inbound::{self, InboundSink};
    use std::ptr;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<InboundEvent>>,
    }

    impl InboundSink for Recorder {
        fn ingest(&self, event: InboundEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_open_missing_library() {
        let result = NativeAdapter::open("/nonexistent/libtech3c_missing.so");
        assert!(matches!(result, Err(BridgeError::LibraryLoad(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_symbol_is_unresolved() {
        let adapter = NativeAdapter::this();
        let result = adapter.forward(&ForeignCall::unit(Operation::ShowAuth));
        assert_eq!(
            result,
            Err(AdapterError::Unresolved { method: "showAuth" })
        );
        assert!(adapter.attach_inbound().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_bad_argument_reported_before_resolution() {
        let adapter = NativeAdapter::this();
        let result = adapter.forward(&ForeignCall::unit(Operation::SetDebugMode));
        assert!(matches!(result, Err(AdapterError::Failed { .. })));
    }

    #[test]
    fn test_trampolines_convert_null_strings() {
        let _guard = inbound::test_guard();
        inbound::detach();

        let recorder = Arc::new(Recorder::default());
        let sink: Arc<dyn InboundSink> = recorder.clone();
        inbound::attach(&sink).unwrap();

        let user = CString::new("u1").unwrap();
        unsafe {
            on_login_success(user.as_ptr(), ptr::null(), ptr::null(), 2, 0);
            on_error(ptr::null());
            on_auth_cancelled();
        }
        inbound::detach();

        let events = recorder.events.lock().unwrap();
        assert_eq!(
            events[0],
            InboundEvent::LoginSuccess {
                user_id: "u1".into(),
                access_token: String::new(),
                refresh_token: String::new(),
                login_type: 2,
                expiry: 0,
            }
        );
        assert_eq!(
            events[1],
            InboundEvent::Error {
                message: "Unknown error".into()
            }
        );
        assert_eq!(events[2], InboundEvent::AuthCancelled);
    }
}
