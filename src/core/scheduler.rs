//! 主线程调度系统
//!
//! 外部回调（JNI 上调、C 回调指针）运行在任意线程上，而应用回调必须在
//! 拥有线程（引擎的渲染/更新线程）上执行。本模块提供统一的
//! "投递到拥有线程" 原语。
//!
//! ## 功能特性
//!
//! - `OwnerThread` trait：网关的唯一投递入口
//! - `MainThreadQueue`：基于通道的主线程任务队列，由主循环排空
//! - `ImmediateExecutor`：同步执行器，用于测试和无头工具
//! - ECS 资源与系统：每帧处理队列中的任务

use bevy_ecs::prelude::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;

/// 主线程任务
pub type OwnerTask = Box<dyn FnOnce() + Send + 'static>;

/// 拥有线程投递能力
///
/// 实现必须保证同一投递者提交的任务按提交顺序执行。
pub trait OwnerThread: Send + Sync {
    /// 将任务投递到拥有线程
    fn post(&self, task: OwnerTask);
}

/// 主线程任务队列
///
/// 任何线程都可以投递任务；任务只会在调用 `process_pending()` 的线程上执行。
///
/// # 示例
///
/// ```rust
/// use tech3c_bridge::core::scheduler::{MainThreadQueue, OwnerThread};
///
/// let queue = MainThreadQueue::new();
/// queue.post(Box::new(|| {
///     // 必须在主线程执行的操作（如UI更新）
/// }));
///
/// // 在主循环中处理任务
/// assert_eq!(queue.process_pending(), 1);
/// ```
pub struct MainThreadQueue {
    /// 主线程任务接收器
    rx: Receiver<OwnerTask>,
    /// 主线程任务发送器
    tx: Sender<OwnerTask>,
}

impl Default for MainThreadQueue {
    fn default() -> Self {
        let (tx, rx) = unbounded();
        Self { rx, tx }
    }
}

impl MainThreadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 处理队列中的所有任务，直到队列为空
    ///
    /// 返回本次执行的任务数。
    pub fn process_pending(&self) -> usize {
        let mut executed = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            executed += 1;
        }
        executed
    }

    /// 处理指定数量的主线程任务
    ///
    /// 适用于需要限制每帧处理任务数量的场景，避免单帧处理时间过长。
    pub fn process_pending_limited(&self, max_tasks: usize) -> usize {
        let mut executed = 0;
        for _ in 0..max_tasks {
            match self.rx.try_recv() {
                Ok(task) => {
                    task();
                    executed += 1;
                }
                Err(_) => break,
            }
        }
        executed
    }

    /// 待处理任务数
    pub fn pending_count(&self) -> usize {
        self.rx.len()
    }
}

impl OwnerThread for MainThreadQueue {
    fn post(&self, task: OwnerTask) {
        // 接收端由 self 持有，发送不会失败
        let _ = self.tx.send(task);
    }
}

/// 同步执行器
///
/// 在调用线程上立即执行任务。只适用于调用方本身就在拥有线程上的场景。
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateExecutor;

impl OwnerThread for ImmediateExecutor {
    fn post(&self, task: OwnerTask) {
        task();
    }
}

/// 主线程队列资源 (ECS Resource)
#[derive(Resource, Clone)]
pub struct MainThreadQueueResource {
    /// 队列实例
    pub queue: Arc<MainThreadQueue>,
}

impl Default for MainThreadQueueResource {
    fn default() -> Self {
        Self {
            queue: Arc::new(MainThreadQueue::new()),
        }
    }
}

/// 每帧最多处理的主线程任务数
pub const TASKS_PER_FRAME: usize = 10;

/// 主线程任务处理系统
///
/// 将此系统添加到ECS调度器中，它会在每帧自动处理主线程任务。
/// 每次调用最多处理 `TASKS_PER_FRAME` 个任务。
pub fn process_main_thread_tasks_system(queue: Res<MainThreadQueueResource>) {
    queue.queue.process_pending_limited(TASKS_PER_FRAME);
}
