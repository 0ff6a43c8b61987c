//! 无头适配器
//!
//! 桌面构建和测试使用：记录所有出站调用，可按操作注入失败。
//! IP 维护检查在此平台上不受支持。

use super::call::{ForeignCall, ForeignQuery, Operation};
use super::PlatformAdapter;
use crate::core::error::{AdapterError, AdapterResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
pub struct HeadlessAdapter {
    calls: Mutex<Vec<ForeignCall>>,
    failures: Mutex<HashMap<Operation, AdapterError>>,
    values: Mutex<HashMap<ForeignQuery, String>>,
    inbound_attachments: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HeadlessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已转发的调用（按顺序）
    pub fn calls(&self) -> Vec<ForeignCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// 指定操作的调用
    pub fn calls_for(&self, operation: Operation) -> Vec<ForeignCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.operation == operation)
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// 让后续对 `operation` 的调用返回 `error`
    pub fn fail_with(&self, operation: Operation, error: AdapterError) {
        lock(&self.failures).insert(operation, error);
    }

    pub fn clear_failure(&self, operation: Operation) {
        lock(&self.failures).remove(&operation);
    }

    /// 设置查询返回值
    pub fn set_value(&self, query: ForeignQuery, value: impl Into<String>) {
        lock(&self.values).insert(query, value.into());
    }

    /// `attach_inbound` 被调用的次数
    pub fn inbound_attachments(&self) -> usize {
        self.inbound_attachments.load(Ordering::SeqCst)
    }
}

impl PlatformAdapter for HeadlessAdapter {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn forward(&self, call: &ForeignCall) -> AdapterResult<()> {
        lock(&self.calls).push(call.clone());
        tracing::trace!(target: "tech3c", "headless: {} {:?}", call.operation, call.args);

        if let Some(error) = lock(&self.failures).get(&call.operation) {
            return Err(error.clone());
        }
        if call.operation == Operation::SetIpMaintenanceCheck {
            return Err(AdapterError::Unsupported {
                method: call.operation.method_name(),
            });
        }
        Ok(())
    }

    fn attach_inbound(&self) -> AdapterResult<()> {
        self.inbound_attachments.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn query(&self, query: ForeignQuery) -> AdapterResult<Option<String>> {
        Ok(lock(&self.values).get(&query).cloned())
    }
}
