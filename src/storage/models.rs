use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 系统保留用户 ID，承接引入用户归属之前创建的链接
pub const LEGACY_USER_ID: u32 = migration::LEGACY_USER_ID as u32;
/// 系统保留用户名
pub const LEGACY_USERNAME: &str = migration::LEGACY_USERNAME;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOwner {
    pub id: u32,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: Uuid,
    pub name: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub created_by: LinkOwner,
    pub created_from_ip: IpAddr,
    pub is_disabled: bool,
    pub is_blocked: bool,
}

/// 待写入的新链接
#[derive(Debug, Clone)]
pub struct NewLink {
    pub name: String,
    pub destination: String,
    pub owner_id: u32,
    pub created_from_ip: IpAddr,
}

/// 可单独更新的链接标志位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFlag {
    Disabled(bool),
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ip_addresses: Vec<IpAddr>,
    pub raw_object: serde_json::Value,
    pub is_blocked: bool,
    pub roles: Vec<Role>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.name == role)
    }

    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.name.clone()).collect()
    }
}

/// 外部身份登录后需要落库的用户信息
#[derive(Debug, Clone)]
pub struct UserUpsert {
    pub id: u32,
    pub username: String,
    pub raw_object: serde_json::Value,
    pub source_ip: IpAddr,
}

/// 追加 IP，已存在时保持原有顺序不变
pub fn merge_ip(addresses: &mut Vec<IpAddr>, ip: IpAddr) -> bool {
    if addresses.contains(&ip) {
        return false;
    }
    addresses.push(ip);
    true
}
