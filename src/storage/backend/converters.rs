use std::net::{IpAddr, Ipv4Addr};

use tracing::warn;
use uuid::Uuid;

use crate::errors::{CutterError, Result};
use crate::storage::{Link, LinkOwner, NewLink, Role, User};
use migration::entities::{link, role, user};

/// 数据库中的用户 ID 转换为领域 ID
pub(super) fn user_id_from_db(id: i64) -> Result<u32> {
    u32::try_from(id)
        .map_err(|_| CutterError::database_operation(format!("用户 ID 超出范围: {}", id)))
}

/// 将 link Model 与其所属用户转换为 Link
pub fn model_to_link(model: link::Model, owner: user::Model) -> Result<Link> {
    let id = Uuid::parse_str(&model.id).map_err(|e| {
        CutterError::database_operation(format!("链接 ID 无效 '{}': {}", model.id, e))
    })?;

    let created_from_ip = model.created_from_ip.parse::<IpAddr>().unwrap_or_else(|_| {
        warn!(
            "Link '{}' has unparsable created_from_ip '{}'",
            model.name, model.created_from_ip
        );
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    });

    Ok(Link {
        id,
        name: model.name,
        destination: model.destination,
        created_at: model.created_at,
        created_by: LinkOwner {
            id: user_id_from_db(owner.id)?,
            username: owner.username,
        },
        created_from_ip,
        is_disabled: model.is_disabled,
        is_blocked: model.is_blocked,
    })
}

/// 将 NewLink 转换为 ActiveModel（用于插入）
pub fn new_link_to_active_model(
    new_link: &NewLink,
    id: Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
) -> link::ActiveModel {
    use sea_orm::ActiveValue::*;

    link::ActiveModel {
        id: Set(id.to_string()),
        name: Set(new_link.name.clone()),
        destination: Set(new_link.destination.clone()),
        created_at: Set(created_at),
        created_by_id: Set(i64::from(new_link.owner_id)),
        created_from_ip: Set(new_link.created_from_ip.to_string()),
        is_disabled: Set(false),
        is_blocked: Set(false),
    }
}

pub fn model_to_role(model: role::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
        description: model.description,
    }
}

/// 将 user Model 与角色列表转换为 User
pub fn model_to_user(model: user::Model, roles: Vec<role::Model>) -> Result<User> {
    let raw_ips: Vec<String> = serde_json::from_str(&model.ip_addresses)?;
    let ip_addresses = raw_ips
        .iter()
        .filter_map(|ip| ip.parse::<IpAddr>().ok())
        .collect();

    Ok(User {
        id: user_id_from_db(model.id)?,
        username: model.username,
        created_at: model.created_at,
        updated_at: model.updated_at,
        ip_addresses,
        raw_object: serde_json::from_str(&model.raw_object)?,
        is_blocked: model.is_blocked,
        roles: roles.into_iter().map(model_to_role).collect(),
    })
}

/// IP 列表序列化为 JSON 文本
pub(super) fn ips_to_json(ips: &[IpAddr]) -> Result<String> {
    let raw: Vec<String> = ips.iter().map(|ip| ip.to_string()).collect();
    Ok(serde_json::to_string(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    fn owner_model() -> user::Model {
        user::Model {
            id: 42,
            username: "octocat".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            ip_addresses: r#"["10.0.0.1","not-an-ip","::1"]"#.to_string(),
            raw_object: r#"{"login":"octocat","id":42}"#.to_string(),
            is_blocked: false,
        }
    }

    fn link_model() -> link::Model {
        link::Model {
            id: "6f1c1f0e-9f5b-4a55-8d7c-0f4f6a1c2b3d".to_string(),
            name: "abc123".to_string(),
            destination: "https://example.com".to_string(),
            created_at: Utc::now(),
            created_by_id: 42,
            created_from_ip: "192.168.1.20".to_string(),
            is_disabled: true,
            is_blocked: false,
        }
    }

    #[test]
    fn test_model_to_link_basic() {
        let link = model_to_link(link_model(), owner_model()).unwrap();

        assert_eq!(link.name, "abc123");
        assert_eq!(link.created_by.id, 42);
        assert_eq!(link.created_by.username, "octocat");
        assert_eq!(link.created_from_ip.to_string(), "192.168.1.20");
        assert!(link.is_disabled);
        assert!(!link.is_blocked);
    }

    #[test]
    fn test_model_to_link_bad_ip_falls_back() {
        let mut model = link_model();
        model.created_from_ip = "garbage".to_string();

        let link = model_to_link(model, owner_model()).unwrap();
        assert_eq!(link.created_from_ip, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn test_model_to_link_bad_uuid_is_error() {
        let mut model = link_model();
        model.id = "nope".to_string();

        assert!(matches!(
            model_to_link(model, owner_model()),
            Err(CutterError::DatabaseOperation(_))
        ));
    }

    #[test]
    fn test_model_to_user_skips_bad_ips() {
        let roles = vec![role::Model {
            id: 1,
            name: "admin".to_string(),
            description: "Platform administrator".to_string(),
        }];
        let user = model_to_user(owner_model(), roles).unwrap();

        assert_eq!(user.ip_addresses.len(), 2);
        assert_eq!(user.raw_object["login"], "octocat");
        assert!(user.has_role("admin"));
    }

    #[test]
    fn test_model_to_user_rejects_negative_id() {
        let mut model = owner_model();
        model.id = -5;
        assert!(model_to_user(model, vec![]).is_err());
    }

    #[test]
    fn test_new_link_to_active_model() {
        let new_link = NewLink {
            name: "xyz789".to_string(),
            destination: "https://target.com".to_string(),
            owner_id: 42,
            created_from_ip: "::1".parse().unwrap(),
        };
        let id = Uuid::new_v4();
        let am = new_link_to_active_model(&new_link, id, Utc::now());

        assert_eq!(am.id, ActiveValue::Set(id.to_string()));
        assert_eq!(am.created_by_id, ActiveValue::Set(42));
        assert_eq!(am.created_from_ip, ActiveValue::Set("::1".to_string()));
        assert_eq!(am.is_blocked, ActiveValue::Set(false));
    }

    #[test]
    fn test_ips_to_json() {
        let ips: Vec<IpAddr> = vec!["10.0.0.1".parse().unwrap(), "::1".parse().unwrap()];
        assert_eq!(ips_to_json(&ips).unwrap(), r#"["10.0.0.1","::1"]"#);
    }
}
