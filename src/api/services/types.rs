//! API 类型定义

use serde::{Deserialize, Serialize};

use crate::storage::Link;

/// 统一响应信封
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

/// 创建链接的查询参数
#[derive(Debug, Deserialize)]
pub struct CreateLinkQuery {
    pub name: Option<String>,
    pub destination: Option<String>,
}

/// 链接及其公开地址
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    #[serde(flatten)]
    pub link: Link,
    pub public_uri: String,
}

/// OAuth 回调参数（GET query 或 POST form）
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: i64,
    pub database: HealthDatabaseCheck,
    pub response_time_ms: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDatabaseCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
