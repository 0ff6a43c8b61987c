//! 核心宏定义
//!
//! 提供统一的宏来减少代码重复

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use tech3c_bridge::impl_default;
///
/// struct Credentials {
///     client_id: String,
///     retries: u32,
/// }
///
/// impl_default!(Credentials {
///     client_id: String::new(),
///     retries: 0,
/// });
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

/// 为 C 风格枚举生成序号转换
///
/// 生成 `ordinal()`（枚举 -> i32，外部调用约定）和 `from_ordinal()`
/// （i32 -> `Option<枚举>`）。
#[macro_export]
macro_rules! impl_ordinal {
    ($enum_name:ident { $($variant:ident = $value:literal),* $(,)? }) => {
        impl $enum_name {
            /// 外部调用约定使用的整数序号
            pub fn ordinal(self) -> i32 {
                match self {
                    $($enum_name::$variant => $value),*
                }
            }

            /// 从整数序号还原，未知序号返回 `None`
            pub fn from_ordinal(value: i32) -> Option<Self> {
                match value {
                    $($value => Some($enum_name::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {

    struct TestStruct {
        field1: u32,
        field2: String,
    }

    impl_default!(TestStruct {
        field1: 7,
        field2: String::new(),
    });

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Flavor {
        Plain,
        Spicy,
    }

    impl_ordinal!(Flavor { Plain = 0, Spicy = 1 });

    #[test]
    fn test_impl_default() {
        let s = TestStruct::default();
        assert_eq!(s.field1, 7);
        assert_eq!(s.field2, "");
    }

    #[test]
    fn test_impl_ordinal() {
        assert_eq!(Flavor::Spicy.ordinal(), 1);
        assert_eq!(Flavor::from_ordinal(0), Some(Flavor::Plain));
        assert_eq!(Flavor::from_ordinal(9), None);
    }
}
