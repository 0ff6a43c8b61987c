//! 领域模块
//!
//! 会话与错误事件等值对象，不依赖任何平台细节。

pub mod errors;
pub mod session;

pub use errors::{ErrorCode, ErrorEvent};
pub use session::{LoginType, Session};
