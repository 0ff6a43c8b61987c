//! 回调槽
//!
//! 五个互相独立的单订阅者槽，重复设置直接替换旧订阅者。

use crate::domain::{ErrorEvent, Session};
use std::sync::Arc;

pub type SessionCallback = Arc<dyn Fn(&Session) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(&ErrorEvent) + Send + Sync>;
pub type NotifyCallback = Arc<dyn Fn() + Send + Sync>;

/// 槽标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    LoginSuccess,
    RegisterSuccess,
    Error,
    Cancel,
    AuthScreenOpened,
}

#[derive(Clone, Default)]
pub struct CallbackSlots {
    pub login_success: Option<SessionCallback>,
    pub register_success: Option<SessionCallback>,
    pub error: Option<ErrorCallback>,
    pub cancel: Option<NotifyCallback>,
    pub auth_screen_opened: Option<NotifyCallback>,
}

impl CallbackSlots {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn clear_slot(&mut self, kind: SlotKind) {
        match kind {
            SlotKind::LoginSuccess => self.login_success = None,
            SlotKind::RegisterSuccess => self.register_success = None,
            SlotKind::Error => self.error = None,
            SlotKind::Cancel => self.cancel = None,
            SlotKind::AuthScreenOpened => self.auth_screen_opened = None,
        }
    }

    pub fn is_set(&self, kind: SlotKind) -> bool {
        match kind {
            SlotKind::LoginSuccess => self.login_success.is_some(),
            SlotKind::RegisterSuccess => self.register_success.is_some(),
            SlotKind::Error => self.error.is_some(),
            SlotKind::Cancel => self.cancel.is_some(),
            SlotKind::AuthScreenOpened => self.auth_screen_opened.is_some(),
        }
    }

    /// 会话类槽的当前订阅者
    pub fn session_callback(&self, kind: SlotKind) -> Option<SessionCallback> {
        match kind {
            SlotKind::LoginSuccess => self.login_success.clone(),
            SlotKind::RegisterSuccess => self.register_success.clone(),
            _ => None,
        }
    }

    /// 无参数槽的当前订阅者
    pub fn notify_callback(&self, kind: SlotKind) -> Option<NotifyCallback> {
        match kind {
            SlotKind::Cancel => self.cancel.clone(),
            SlotKind::AuthScreenOpened => self.auth_screen_opened.clone(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for CallbackSlots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackSlots")
            .field("login_success", &self.login_success.is_some())
            .field("register_success", &self.register_success.is_some())
            .field("error", &self.error.is_some())
            .field("cancel", &self.cancel.is_some())
            .field("auth_screen_opened", &self.auth_screen_opened.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_slot() {
        let mut slots = CallbackSlots {
            cancel: Some(Arc::new(|| {})),
            error: Some(Arc::new(|_: &ErrorEvent| {})),
            ..Default::default()
        };
        assert!(slots.is_set(SlotKind::Cancel));
        slots.clear_slot(SlotKind::Cancel);
        assert!(!slots.is_set(SlotKind::Cancel));
        assert!(slots.is_set(SlotKind::Error));

        slots.clear();
        assert!(!slots.is_set(SlotKind::Error));
    }

    #[test]
    fn test_kind_specific_lookup() {
        let slots = CallbackSlots {
            login_success: Some(Arc::new(|_: &Session| {})),
            ..Default::default()
        };
        assert!(slots.session_callback(SlotKind::LoginSuccess).is_some());
        assert!(slots.session_callback(SlotKind::RegisterSuccess).is_none());
        assert!(slots.notify_callback(SlotKind::LoginSuccess).is_none());
    }
}
