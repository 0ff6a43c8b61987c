//! 平台适配层
//!
//! 网关只通过 `PlatformAdapter` 与外部 SDK 交互，从不直接判断当前平台。
//!
//! - `android` - JNI 适配器（仅 Android）
//! - `native` - C ABI 适配器，运行时通过 `libloading` 解析 `tech3c_ios_*` 符号
//! - `headless` - 桌面与测试用的记录型适配器
//! - `inbound` - 外部回调的进程级入站路由

#[cfg(target_os = "android")]
pub mod android;
pub mod call;
pub mod headless;
pub mod inbound;
pub mod native;

#[cfg(target_os = "android")]
pub use android::JniAdapter;
pub use call::{ForeignArg, ForeignCall, ForeignQuery, Operation};
pub use headless::HeadlessAdapter;
pub use inbound::{InboundEvent, InboundSink};
pub use native::NativeAdapter;

use crate::core::error::{AdapterError, AdapterResult};

/// 外部调用能力
///
/// 每个实现对应一个平台。实现必须快速返回或快速失败，不得无限期阻塞。
pub trait PlatformAdapter: Send + Sync {
    /// 适配器名称（用于日志）
    fn name(&self) -> &'static str;

    /// 转发一次出站调用
    fn forward(&self, call: &ForeignCall) -> AdapterResult<()>;

    /// 向外部 SDK 注册入站回调
    ///
    /// 外部回调经 `inbound::deliver` 到达当前挂接的 `InboundSink`。
    fn attach_inbound(&self) -> AdapterResult<()> {
        Ok(())
    }

    /// 读取 SDK 字符串状态
    fn query(&self, query: ForeignQuery) -> AdapterResult<Option<String>> {
        Err(AdapterError::Unsupported {
            method: query.operation().method_name(),
        })
    }
}
