//! # 错误处理宏

/// 快速创建配置错误的宏
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::BankError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BankError::config(format!($fmt, $($arg)*))
    };
}

/// 快速创建业务错误的宏
#[macro_export]
macro_rules! business_error {
    ($msg:expr) => {
        $crate::error::BankError::business($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BankError::business(format!($fmt, $($arg)*))
    };
}

/// 确保条件成立，否则返回配置错误
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::config_error!($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::config_error!($fmt, $($arg)*));
        }
    };
}

/// 确保条件成立，否则返回业务错误
#[macro_export]
macro_rules! ensure_business {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::business_error!($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::business_error!($fmt, $($arg)*));
        }
    };
}
