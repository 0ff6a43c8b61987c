//! 核心模块
//!
//! 包含桥接层的基础设施：
//! - `error` - 错误类型定义
//! - `scheduler` - 主线程投递原语
//! - `logging` - 日志初始化
//! - `utils` - 时间戳等工具函数

pub mod error;
pub mod logging;
pub mod scheduler;
pub mod utils;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{AdapterError, AdapterResult, BridgeError, BridgeResult};

// 重新导出调度原语
pub use scheduler::{
    process_main_thread_tasks_system, ImmediateExecutor, MainThreadQueue,
    MainThreadQueueResource, OwnerTask, OwnerThread,
};
pub use utils::{current_timestamp_ms, or_empty};
