//! API 模块常量定义
//!
//! 包含认证、Cookie 等相关的硬编码常量。

/// 会话 JWT Cookie 名称
pub const SESSION_COOKIE_NAME: &str = "cutter_session";

/// OAuth state Cookie 名称
pub const STATE_COOKIE_NAME: &str = "cutter_oauth_state";

/// OAuth state Cookie 有效期（分钟）
pub const STATE_COOKIE_MINUTES: i64 = 10;

/// OAuth state 随机字节数（256 bit）
pub const STATE_BYTES: usize = 32;

/// GitHub 回调路径
pub const GITHUB_CALLBACK_PATH: &str = "/callback/login/github";

/// 登录/登出后的跳转地址
pub const HOME_PATH: &str = "/";
