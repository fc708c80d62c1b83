//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_peer_eval_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum PeerEvalError {
            $($variant(String),)*
        }

        impl PeerEvalError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(PeerEvalError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(PeerEvalError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(PeerEvalError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl PeerEvalError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        PeerEvalError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_peer_eval_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "State Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    InvalidArgument("E014", "Invalid Argument"),
}

impl PeerEvalError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为存储层故障
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            PeerEvalError::DatabaseConfig(_)
                | PeerEvalError::DatabaseConnection(_)
                | PeerEvalError::DatabaseOperation(_)
        )
    }
}

impl fmt::Display for PeerEvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PeerEvalError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for PeerEvalError {
    fn from(err: sea_orm::DbErr) -> Self {
        PeerEvalError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for PeerEvalError {
    fn from(err: std::io::Error) -> Self {
        PeerEvalError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for PeerEvalError {
    fn from(err: serde_json::Error) -> Self {
        PeerEvalError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for PeerEvalError {
    fn from(err: chrono::ParseError) -> Self {
        PeerEvalError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PeerEvalError>;
