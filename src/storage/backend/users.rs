//! User and role persistence for SeaOrmStorage

use std::net::IpAddr;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, TransactionTrait, sea_query::Expr,
};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{ips_to_json, model_to_role, model_to_user};
use crate::errors::{CutterError, Result};
use crate::storage::models::merge_ip;
use crate::storage::{Role, User, UserUpsert};

use migration::entities::{role, user, user_role};

/// 用户名被另一个账号接管后，旧记录改用的占位名
/// GitHub 登录名不能以下划线开头，不会与真实用户冲突
pub fn vacated_username(id: u32) -> String {
    format!("__renamed_{}", id)
}

impl SeaOrmStorage {
    async fn load_user(&self, model: user::Model) -> Result<User> {
        let roles = model.find_related(role::Entity).all(&self.db).await?;
        model_to_user(model, roles)
    }

    pub async fn find_user_by_id(&self, id: u32) -> Result<Option<User>> {
        match user::Entity::find_by_id(i64::from(id)).one(&self.db).await? {
            Some(model) => Ok(Some(self.load_user(model).await?)),
            None => Ok(None),
        }
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        match model {
            Some(model) => Ok(Some(self.load_user(model).await?)),
            None => Ok(None),
        }
    }

    /// 在一个事务内创建或刷新用户
    pub async fn upsert_user(&self, upsert: &UserUpsert) -> Result<User> {
        let now = Utc::now();
        let raw_object = serde_json::to_string(&upsert.raw_object)?;

        let txn = self.db.begin().await?;

        // 登录名已转移到新账号时，先释放旧记录占用的用户名
        let stale = user::Entity::find()
            .filter(user::Column::Username.eq(upsert.username.as_str()))
            .filter(user::Column::Id.ne(i64::from(upsert.id)))
            .one(&txn)
            .await?;
        if let Some(stale) = stale {
            let stale_id = u32::try_from(stale.id).map_err(|_| {
                CutterError::database_operation(format!("用户 ID 超出范围: {}", stale.id))
            })?;
            info!(
                "Username '{}' moved from user {} to {}, renaming the old record",
                upsert.username, stale_id, upsert.id
            );
            user::Entity::update_many()
                .col_expr(user::Column::Username, Expr::value(vacated_username(stale_id)))
                .col_expr(user::Column::UpdatedAt, Expr::value(now))
                .filter(user::Column::Id.eq(stale.id))
                .exec(&txn)
                .await?;
        }

        let existing = user::Entity::find_by_id(i64::from(upsert.id))
            .one(&txn)
            .await?;

        let model = match existing {
            Some(model) => {
                let mut ips: Vec<IpAddr> = serde_json::from_str::<Vec<String>>(&model.ip_addresses)?
                    .iter()
                    .filter_map(|ip| ip.parse().ok())
                    .collect();
                merge_ip(&mut ips, upsert.source_ip);

                let mut active_model = model.into_active_model();
                active_model.username = Set(upsert.username.clone());
                active_model.raw_object = Set(raw_object);
                active_model.ip_addresses = Set(ips_to_json(&ips)?);
                active_model.updated_at = Set(now);
                active_model.update(&txn).await?
            }
            None => {
                info!("Creating user {} ({})", upsert.username, upsert.id);
                user::ActiveModel {
                    id: Set(i64::from(upsert.id)),
                    username: Set(upsert.username.clone()),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ip_addresses: Set(ips_to_json(&[upsert.source_ip])?),
                    raw_object: Set(raw_object),
                    is_blocked: Set(false),
                }
                .insert(&txn)
                .await?
            }
        };

        txn.commit().await?;

        self.load_user(model).await
    }

    /// 封禁用户，返回更新后的用户
    pub async fn set_user_blocked(&self, id: u32) -> Result<User> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::IsBlocked, Expr::value(true))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(i64::from(id)))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CutterError::not_found(format!("用户不存在: {}", id)));
        }

        self.find_user_by_id(id)
            .await?
            .ok_or_else(|| CutterError::not_found(format!("用户不存在: {}", id)))
    }

    pub async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        Ok(role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await?
            .map(model_to_role))
    }

    /// 关联角色，已关联时不做任何修改
    pub async fn attach_role(&self, user_id: u32, role_id: i64) -> Result<()> {
        let key = (i64::from(user_id), role_id);
        let txn = self.db.begin().await?;

        if user_role::Entity::find_by_id(key).one(&txn).await?.is_none() {
            user_role::Entity::insert(user_role::ActiveModel {
                user_id: Set(key.0),
                role_id: Set(key.1),
            })
            .exec_without_returning(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn count_users(&self) -> Result<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }
}
