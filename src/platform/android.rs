//! JNI 适配器
//!
//! 出站调用 `dev.axmol.lib.Tech3CHelper` 上的静态方法；入站方向由 Java 侧
//! 调用本模块导出的 `nativeOn*` 函数。

use super::call::{ForeignArg, ForeignCall, ForeignQuery, Operation};
use super::inbound::{self, InboundEvent};
use super::PlatformAdapter;
use crate::core::error::{AdapterError, AdapterResult, BridgeError, BridgeResult};
use jni::objects::{JClass, JObject, JString, JValue, JValueOwned};
use jni::sys::{jint, jlong};
use jni::{JNIEnv, JavaVM};

/// Java 辅助类
pub const HELPER_CLASS: &str = "dev/axmol/lib/Tech3CHelper";

pub struct JniAdapter {
    vm: JavaVM,
}

impl JniAdapter {
    pub fn new(vm: JavaVM) -> Self {
        Self { vm }
    }

    /// 从当前 JNI 环境获取虚拟机
    pub fn from_env(env: &JNIEnv<'_>) -> BridgeResult<Self> {
        let vm = env
            .get_java_vm()
            .map_err(|e| BridgeError::General(format!("Failed to get JavaVM: {}", e)))?;
        Ok(Self::new(vm))
    }

    /// 解析类与方法后执行静态调用
    ///
    /// 类或方法缺失时清除挂起的异常并返回 `Unresolved`；
    /// Java 侧抛出异常时打印并清除后返回 `Failed`。
    fn invoke<'local>(
        env: &mut JNIEnv<'local>,
        operation: Operation,
        args: &[ForeignArg],
    ) -> AdapterResult<JValueOwned<'local>> {
        let method = operation.method_name();
        let signature = operation.jni_signature();

        let class = match env.find_class(HELPER_CLASS) {
            Ok(class) => class,
            Err(e) => {
                clear_exception(env, false);
                tracing::error!(target: "tech3c.jni", "Failed to find {}: {}", HELPER_CLASS, e);
                return Err(AdapterError::Unresolved { method });
            }
        };
        if let Err(e) = env.get_static_method_id(&class, method, signature) {
            clear_exception(env, false);
            tracing::error!(target: "tech3c.jni", "Failed to find {}{}: {}", method, signature, e);
            return Err(AdapterError::Unresolved { method });
        }

        let mut owned: Vec<JValueOwned<'local>> = Vec::with_capacity(args.len());
        for arg in args {
            let value = match arg {
                ForeignArg::Bool(value) => JValueOwned::Bool(u8::from(*value)),
                ForeignArg::Int(value) => JValueOwned::Int(*value),
                ForeignArg::Str(value) => {
                    let string = env.new_string(value).map_err(|e| AdapterError::Failed {
                        method,
                        reason: e.to_string(),
                    })?;
                    JValueOwned::Object(JObject::from(string))
                }
            };
            owned.push(value);
        }
        let values: Vec<JValue<'_, '_>> = owned.iter().map(|value| value.borrow()).collect();

        env.call_static_method(&class, method, signature, &values)
            .map_err(|e| {
                clear_exception(env, true);
                AdapterError::Failed {
                    method,
                    reason: e.to_string(),
                }
            })
    }
}

fn clear_exception(env: &mut JNIEnv<'_>, describe: bool) {
    if env.exception_check().unwrap_or(false) {
        if describe {
            let _ = env.exception_describe();
        }
        let _ = env.exception_clear();
    }
}

impl PlatformAdapter for JniAdapter {
    fn name(&self) -> &'static str {
        "jni"
    }

    fn forward(&self, call: &ForeignCall) -> AdapterResult<()> {
        let method = call.operation.method_name();
        if !call.operation.has_java_binding() {
            tracing::debug!(target: "tech3c.jni", "{} not available on Android, skipped", method);
            return Ok(());
        }
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| AdapterError::Failed {
                method,
                reason: e.to_string(),
            })?;
        Self::invoke(&mut env, call.operation, &call.args)?;
        tracing::trace!(target: "tech3c.jni", "Called {}", method);
        Ok(())
    }

    fn query(&self, query: ForeignQuery) -> AdapterResult<Option<String>> {
        let operation = query.operation();
        let method = operation.method_name();
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| AdapterError::Failed {
                method,
                reason: e.to_string(),
            })?;

        let value = Self::invoke(&mut env, operation, &[])?;
        let object = value.l().map_err(|e| AdapterError::Failed {
            method,
            reason: e.to_string(),
        })?;
        if object.is_null() {
            return Ok(None);
        }
        let string = JString::from(object);
        Ok(Some(java_string(&mut env, &string)))
    }
}

fn java_string(env: &mut JNIEnv<'_>, value: &JString<'_>) -> String {
    if value.is_null() {
        return String::new();
    }
    match env.get_string(value) {
        Ok(string) => string.into(),
        Err(e) => {
            tracing::warn!(target: "tech3c.jni", "Failed to read Java string: {}", e);
            String::new()
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_dev_axmol_lib_Tech3CHelper_nativeOnLoginSuccess<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    user_id: JString<'local>,
    access_token: JString<'local>,
    refresh_token: JString<'local>,
    login_type: jint,
    expiry: jlong,
) {
    let event = InboundEvent::LoginSuccess {
        user_id: java_string(&mut env, &user_id),
        access_token: java_string(&mut env, &access_token),
        refresh_token: java_string(&mut env, &refresh_token),
        login_type,
        expiry,
    };
    inbound::deliver(event);
}

#[no_mangle]
pub extern "system" fn Java_dev_axmol_lib_Tech3CHelper_nativeOnRegisterSuccess<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    user_id: JString<'local>,
    access_token: JString<'local>,
    refresh_token: JString<'local>,
    expiry: jlong,
) {
    let event = InboundEvent::RegisterSuccess {
        user_id: java_string(&mut env, &user_id),
        access_token: java_string(&mut env, &access_token),
        refresh_token: java_string(&mut env, &refresh_token),
        expiry,
    };
    inbound::deliver(event);
}

#[no_mangle]
pub extern "system" fn Java_dev_axmol_lib_Tech3CHelper_nativeOnError<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    message: JString<'local>,
) {
    let message = (!message.is_null()).then(|| java_string(&mut env, &message));
    inbound::deliver(InboundEvent::error(message));
}

#[no_mangle]
pub extern "system" fn Java_dev_axmol_lib_Tech3CHelper_nativeOnAuthCancelled<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) {
    inbound::deliver(InboundEvent::AuthCancelled);
}

#[no_mangle]
pub extern "system" fn Java_dev_axmol_lib_Tech3CHelper_nativeOnAuthScreenOpened<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) {
    inbound::deliver(InboundEvent::AuthScreenOpened);
}
