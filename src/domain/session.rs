//! 会话值对象
//!
//! 进程内同一时刻只有一个有效会话，不保留历史。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::utils::current_timestamp_ms;
use crate::impl_ordinal;

/// 登录方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginType {
    /// 游客
    #[default]
    Guest,
    /// 账号
    Account,
    /// 社交账号
    Social,
}

impl_ordinal!(LoginType {
    Guest = 0,
    Account = 1,
    Social = 2,
});

impl LoginType {
    /// 对外部报告的序号分类
    ///
    /// 未知序号回退为 `Guest`。
    pub fn classify(ordinal: i32) -> Self {
        match Self::from_ordinal(ordinal) {
            Some(login_type) => login_type,
            None => {
                tracing::warn!(target: "tech3c", "Unknown login type ordinal {}, treating as guest", ordinal);
                LoginType::Guest
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoginType::Guest => "guest",
            LoginType::Account => "account",
            LoginType::Social => "social",
        }
    }

    /// 字符串形式解析，未知值回退为 `Guest`
    pub fn from_name(name: &str) -> Self {
        match name {
            "account" => LoginType::Account,
            "social" => LoginType::Social,
            _ => LoginType::Guest,
        }
    }
}

impl fmt::Display for LoginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 当前认证用户
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub login_type: LoginType,
    /// 令牌过期时间（Unix 毫秒），SDK 报告 0 时为 `None`
    pub expiry: Option<i64>,
}

impl Session {
    /// 由 SDK 回调参数构造
    pub fn from_foreign(
        user_id: String,
        access_token: String,
        refresh_token: String,
        login_type: LoginType,
        expiry: i64,
    ) -> Self {
        Self {
            user_id,
            access_token,
            refresh_token,
            login_type,
            expiry: (expiry > 0).then_some(expiry),
        }
    }

    /// 用户 ID 与访问令牌均非空时有效
    pub fn is_valid(&self) -> bool {
        !self.user_id.is_empty() && !self.access_token.is_empty()
    }

    /// 令牌是否已过期；没有过期时间的会话永不过期
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= now_ms)
    }

    pub fn is_expired_now(&self) -> bool {
        self.is_expired(current_timestamp_ms())
    }

    pub fn clear(&mut self) {
        *self = Session::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_requires_user_and_token() {
        let mut session = Session::default();
        assert!(!session.is_valid());

        session.user_id = "u1".into();
        assert!(!session.is_valid());

        session.access_token = "tok1".into();
        assert!(session.is_valid());

        session.clear();
        assert!(!session.is_valid());
        assert_eq!(session.login_type, LoginType::Guest);
        assert_eq!(session.expiry, None);
    }

    #[test]
    fn test_zero_expiry_means_none() {
        let session = Session::from_foreign("u".into(), "t".into(), "r".into(), LoginType::Social, 0);
        assert_eq!(session.expiry, None);
        assert!(!session.is_expired(i64::MAX));

        let session = Session::from_foreign("u".into(), "t".into(), "r".into(), LoginType::Social, 1000);
        assert!(session.is_expired(1000));
        assert!(!session.is_expired(999));
        assert!(session.is_expired_now());
    }

    #[test]
    fn test_login_type_names() {
        assert_eq!(LoginType::Account.to_string(), "account");
        assert_eq!(LoginType::from_name("social"), LoginType::Social);
        assert_eq!(LoginType::from_name("unknown"), LoginType::Guest);
    }

    #[test]
    fn test_classify_ordinal() {
        assert_eq!(LoginType::classify(1), LoginType::Account);
        assert_eq!(LoginType::classify(2), LoginType::Social);
        assert_eq!(LoginType::classify(-3), LoginType::Guest);
        assert_eq!(LoginType::classify(42), LoginType::Guest);
    }
}
