//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::CutterError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 链接错误
/// - 5000-5099: 配置错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    StateMismatch = 2003,
    UserBlocked = 2005,
    IdentityProviderError = 2010,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkAlreadyExists = 3001,
    LinkInvalid = 3002,
    LinkDatabaseError = 3005,
    LinkBlocked = 3007,

    // 配置错误 5000-5099
    ConfigError = 5000,
}

impl From<&CutterError> for ErrorCode {
    fn from(err: &CutterError) -> Self {
        match err {
            CutterError::NotFound(_) => ErrorCode::LinkNotFound,
            CutterError::Conflict(_) => ErrorCode::LinkAlreadyExists,
            CutterError::Forbidden(_) => ErrorCode::Forbidden,
            CutterError::Gone(_) => ErrorCode::LinkBlocked,
            CutterError::Authentication(_) => ErrorCode::AuthFailed,
            CutterError::Configuration(_) => ErrorCode::ConfigError,
            CutterError::Validation(_) => ErrorCode::LinkInvalid,
            CutterError::Unauthorized(_) => ErrorCode::Unauthorized,
            CutterError::DatabaseConfig(_)
            | CutterError::DatabaseConnection(_)
            | CutterError::DatabaseOperation(_) => ErrorCode::LinkDatabaseError,
            CutterError::Serialization(_) => ErrorCode::InternalServerError,
            CutterError::ExternalService(_) => ErrorCode::IdentityProviderError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::LinkAlreadyExists).unwrap(),
            "3001"
        );
    }

    #[test]
    fn test_from_cutter_error() {
        assert_eq!(
            ErrorCode::from(&CutterError::conflict("taken")),
            ErrorCode::LinkAlreadyExists
        );
        assert_eq!(
            ErrorCode::from(&CutterError::unauthorized("login")),
            ErrorCode::Unauthorized
        );
        assert_eq!(
            ErrorCode::from(&CutterError::gone("blocked")),
            ErrorCode::LinkBlocked
        );
    }
}
