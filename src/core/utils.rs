//! 核心工具函数

/// 获取当前Unix时间戳（毫秒）
///
/// SDK 报告的令牌过期时间使用同一单位，用于 `Session::is_expired`。
///
/// # 示例
///
/// ```rust
/// use tech3c_bridge::core::utils::current_timestamp_ms;
///
/// let now = current_timestamp_ms();
/// assert!(now > 0);
/// ```
pub fn current_timestamp_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// 日志用：空字符串显示为 "empty"
pub fn or_empty(value: &str) -> &str {
    if value.is_empty() {
        "empty"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_timestamp_ms() {
        let ts1 = current_timestamp_ms();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let ts2 = current_timestamp_ms();
        assert!(ts2 >= ts1 + 20);
    }

    #[test]
    fn test_or_empty() {
        assert_eq!(or_empty(""), "empty");
        assert_eq!(or_empty("103.51.120.202"), "103.51.120.202");
    }
}
