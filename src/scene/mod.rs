//! 场景模块
//!
//! 认证流程的演示场景。

pub mod login;

pub use login::{format_user_info, LoginScene, LoginView, StatusColor};
