//! 入站路由
//!
//! JNI 导出函数和 C 回调跳板没有上下文指针，只能通过进程级注册点找到网关。
//! 注册点只持有 `Weak` 句柄，生命周期由组装根决定；它有自己的锁，
//! 与网关状态锁相互独立。

use crate::core::error::{BridgeError, BridgeResult};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// 外部 SDK 上报的异步事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    LoginSuccess {
        user_id: String,
        access_token: String,
        refresh_token: String,
        /// 登录方式序号（未经校验）
        login_type: i32,
        expiry: i64,
    },
    RegisterSuccess {
        user_id: String,
        access_token: String,
        refresh_token: String,
        expiry: i64,
    },
    Error {
        message: String,
    },
    AuthCancelled,
    AuthScreenOpened,
}

/// 外部未提供错误信息时的默认文本
pub const UNKNOWN_ERROR: &str = "Unknown error";

impl InboundEvent {
    /// 错误事件；仅在外部传入空指针时使用默认文本，空串原样保留
    pub fn error(message: Option<String>) -> Self {
        InboundEvent::Error {
            message: message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::LoginSuccess { .. } => "login_success",
            InboundEvent::RegisterSuccess { .. } => "register_success",
            InboundEvent::Error { .. } => "error",
            InboundEvent::AuthCancelled => "auth_cancelled",
            InboundEvent::AuthScreenOpened => "auth_screen_opened",
        }
    }
}

/// 入站事件接收者
pub trait InboundSink: Send + Sync {
    /// 接收事件，可能在任意线程上调用
    fn ingest(&self, event: InboundEvent);
}

static ROUTER: Mutex<Option<Weak<dyn InboundSink>>> = Mutex::new(None);

fn router() -> MutexGuard<'static, Option<Weak<dyn InboundSink>>> {
    ROUTER.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 挂接接收者
///
/// 已有存活的接收者时返回 `SinkAlreadyAttached`。
pub fn attach(sink: &Arc<dyn InboundSink>) -> BridgeResult<()> {
    let mut slot = router();
    if slot.as_ref().and_then(Weak::upgrade).is_some() {
        return Err(BridgeError::SinkAlreadyAttached);
    }
    *slot = Some(Arc::downgrade(sink));
    tracing::debug!(target: "tech3c", "Inbound sink attached");
    Ok(())
}

/// 解除挂接
pub fn detach() {
    if router().take().is_some() {
        tracing::debug!(target: "tech3c", "Inbound sink detached");
    }
}

/// 是否有存活的接收者
pub fn is_attached() -> bool {
    router().as_ref().and_then(Weak::upgrade).is_some()
}

/// 投递事件
///
/// 在释放路由锁之后调用接收者，并拦截其中的 panic，保证不会越过 FFI 边界。
/// 返回事件是否被接收。
pub fn deliver(event: InboundEvent) -> bool {
    let sink = router().as_ref().and_then(Weak::upgrade);
    let Some(sink) = sink else {
        tracing::warn!(target: "tech3c", "Dropping {} event: no inbound sink attached", event.kind());
        return false;
    };

    let kind = event.kind();
    match panic::catch_unwind(AssertUnwindSafe(|| sink.ingest(event))) {
        Ok(()) => true,
        Err(_) => {
            tracing::error!(target: "tech3c", "Panic while handling {} event", kind);
            false
        }
    }
}

/// 串行化访问全局路由的测试
#[cfg(test)]
pub(crate) fn test_guard() -> MutexGuard<'static, ()> {
    static GUARD: Mutex<()> = Mutex::new(());
    GUARD.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<InboundEvent>>,
    }

    impl InboundSink for Recorder {
        fn ingest(&self, event: InboundEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    struct Exploding;

    impl InboundSink for Exploding {
        fn ingest(&self, _event: InboundEvent) {
            panic!("sink failure");
        }
    }

    #[test]
    fn test_error_event_defaults_only_for_missing_message() {
        assert_eq!(
            InboundEvent::error(None),
            InboundEvent::Error {
                message: UNKNOWN_ERROR.into()
            }
        );
        assert_eq!(
            InboundEvent::error(Some(String::new())),
            InboundEvent::Error {
                message: String::new()
            }
        );
        assert_eq!(
            InboundEvent::error(Some("timeout".into())).kind(),
            "error"
        );
    }

    #[test]
    fn test_deliver_without_sink_is_dropped() {
        let _guard = test_guard();
        detach();
        assert!(!deliver(InboundEvent::AuthCancelled));
    }

    #[test]
    fn test_attach_deliver_detach() {
        let _guard = test_guard();
        detach();

        let recorder = Arc::new(Recorder::default());
        let sink: Arc<dyn InboundSink> = recorder.clone();
        attach(&sink).unwrap();
        assert!(is_attached());

        assert!(deliver(InboundEvent::Error {
            message: "boom".into()
        }));
        assert_eq!(recorder.events.lock().unwrap().len(), 1);

        detach();
        assert!(!is_attached());
        assert!(!deliver(InboundEvent::AuthScreenOpened));
    }

    #[test]
    fn test_second_live_attach_rejected() {
        let _guard = test_guard();
        detach();

        let first: Arc<dyn InboundSink> = Arc::new(Recorder::default());
        let second: Arc<dyn InboundSink> = Arc::new(Recorder::default());
        attach(&first).unwrap();
        assert!(matches!(
            attach(&second),
            Err(BridgeError::SinkAlreadyAttached)
        ));

        // 原接收者释放后可以重新挂接
        drop(first);
        assert!(!is_attached());
        attach(&second).unwrap();
        detach();
    }

    #[test]
    fn test_panicking_sink_is_contained() {
        let _guard = test_guard();
        detach();

        let sink: Arc<dyn InboundSink> = Arc::new(Exploding);
        attach(&sink).unwrap();
        assert!(!deliver(InboundEvent::AuthCancelled));
        detach();
    }
}
