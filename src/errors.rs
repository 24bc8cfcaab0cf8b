use std::fmt;

use sea_orm::{DbErr, SqlErr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CutterError {
    NotFound(String),
    Conflict(String),
    Forbidden(String),
    Gone(String),
    Authentication(String),
    Configuration(String),
    Validation(String),
    Unauthorized(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Serialization(String),
    ExternalService(String),
}

impl CutterError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            CutterError::NotFound(_) => "E001",
            CutterError::Conflict(_) => "E002",
            CutterError::Forbidden(_) => "E003",
            CutterError::Gone(_) => "E004",
            CutterError::Authentication(_) => "E005",
            CutterError::Configuration(_) => "E006",
            CutterError::Validation(_) => "E007",
            CutterError::Unauthorized(_) => "E008",
            CutterError::DatabaseConfig(_) => "E009",
            CutterError::DatabaseConnection(_) => "E010",
            CutterError::DatabaseOperation(_) => "E011",
            CutterError::Serialization(_) => "E012",
            CutterError::ExternalService(_) => "E013",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            CutterError::NotFound(_) => "Resource Not Found",
            CutterError::Conflict(_) => "Conflict",
            CutterError::Forbidden(_) => "Forbidden",
            CutterError::Gone(_) => "Resource Gone",
            CutterError::Authentication(_) => "Authentication Error",
            CutterError::Configuration(_) => "Configuration Error",
            CutterError::Validation(_) => "Validation Error",
            CutterError::Unauthorized(_) => "Unauthorized",
            CutterError::DatabaseConfig(_) => "Database Configuration Error",
            CutterError::DatabaseConnection(_) => "Database Connection Error",
            CutterError::DatabaseOperation(_) => "Database Operation Error",
            CutterError::Serialization(_) => "Serialization Error",
            CutterError::ExternalService(_) => "External Service Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            CutterError::NotFound(msg)
            | CutterError::Conflict(msg)
            | CutterError::Forbidden(msg)
            | CutterError::Gone(msg)
            | CutterError::Authentication(msg)
            | CutterError::Configuration(msg)
            | CutterError::Validation(msg)
            | CutterError::Unauthorized(msg)
            | CutterError::DatabaseConfig(msg)
            | CutterError::DatabaseConnection(msg)
            | CutterError::DatabaseOperation(msg)
            | CutterError::Serialization(msg)
            | CutterError::ExternalService(msg) => msg,
        }
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self {
            CutterError::Validation(_) => 400,
            CutterError::Authentication(_) | CutterError::Unauthorized(_) => 401,
            CutterError::Forbidden(_) => 403,
            CutterError::NotFound(_) => 404,
            CutterError::Conflict(_) => 409,
            CutterError::Gone(_) => 410,
            CutterError::ExternalService(_) => 502,
            CutterError::Configuration(_)
            | CutterError::DatabaseConfig(_)
            | CutterError::DatabaseConnection(_)
            | CutterError::DatabaseOperation(_)
            | CutterError::Serialization(_) => 500,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for CutterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CutterError {}

// 便捷的构造函数
impl CutterError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        CutterError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        CutterError::Conflict(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        CutterError::Forbidden(msg.into())
    }

    pub fn gone<T: Into<String>>(msg: T) -> Self {
        CutterError::Gone(msg.into())
    }

    pub fn authentication<T: Into<String>>(msg: T) -> Self {
        CutterError::Authentication(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        CutterError::Configuration(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        CutterError::Validation(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        CutterError::Unauthorized(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        CutterError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        CutterError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        CutterError::DatabaseOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        CutterError::Serialization(msg.into())
    }

    pub fn external_service<T: Into<String>>(msg: T) -> Self {
        CutterError::ExternalService(msg.into())
    }
}

// 唯一约束冲突映射为 Conflict，其余数据库错误统一视为操作失败
impl From<DbErr> for CutterError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => CutterError::Conflict(detail),
            _ => CutterError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for CutterError {
    fn from(err: serde_json::Error) -> Self {
        CutterError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for CutterError {
    fn from(err: url::ParseError) -> Self {
        CutterError::Configuration(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for CutterError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        CutterError::Authentication(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CutterError>;
