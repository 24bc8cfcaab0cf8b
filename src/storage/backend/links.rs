//! Link persistence for SeaOrmStorage

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    sea_query::Expr,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::{model_to_link, new_link_to_active_model};
use crate::errors::{CutterError, Result};
use crate::storage::{Link, LinkFlag, NewLink};

use migration::entities::{link, user};

fn with_owner(row: (link::Model, Option<user::Model>)) -> Result<Link> {
    let (model, owner) = row;
    let owner = owner.ok_or_else(|| {
        CutterError::database_operation(format!("链接 '{}' 缺少所属用户", model.name))
    })?;
    model_to_link(model, owner)
}

impl SeaOrmStorage {
    /// 按名称精确查找
    pub async fn find_link_by_name(&self, name: &str) -> Result<Option<Link>> {
        link::Entity::find()
            .filter(link::Column::Name.eq(name))
            .find_also_related(user::Entity)
            .one(&self.db)
            .await?
            .map(with_owner)
            .transpose()
    }

    /// 按目标地址查找（用于去重）
    pub async fn find_link_by_destination(&self, destination: &str) -> Result<Option<Link>> {
        link::Entity::find()
            .filter(link::Column::Destination.eq(destination))
            .order_by_asc(link::Column::CreatedAt)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await?
            .map(with_owner)
            .transpose()
    }

    pub async fn link_name_exists(&self, name: &str) -> Result<bool> {
        let count = link::Entity::find()
            .filter(link::Column::Name.eq(name))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn is_link_owned_by(&self, link_id: Uuid, user_id: u32) -> Result<bool> {
        let count = link::Entity::find()
            .filter(link::Column::Id.eq(link_id.to_string()))
            .filter(link::Column::CreatedById.eq(i64::from(user_id)))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// 插入新链接，唯一约束冲突返回 Conflict
    pub async fn insert_link(&self, new_link: &NewLink) -> Result<Link> {
        let id = Uuid::new_v4();
        let active_model = new_link_to_active_model(new_link, id, Utc::now());

        let model = active_model.insert(&self.db).await.map_err(|e| {
            match CutterError::from(e) {
                CutterError::Conflict(_) => {
                    CutterError::conflict(format!("名称已被占用: {}", new_link.name))
                }
                other => other,
            }
        })?;

        let owner = user::Entity::find_by_id(i64::from(new_link.owner_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                CutterError::not_found(format!("用户不存在: {}", new_link.owner_id))
            })?;

        info!("Link inserted: {} -> {}", model.name, model.destination);
        model_to_link(model, owner)
    }

    /// 单条 UPDATE 修改标志位，返回更新后的链接
    pub async fn update_link_flag(&self, name: &str, flag: LinkFlag) -> Result<Link> {
        let update = link::Entity::update_many().filter(link::Column::Name.eq(name));
        let update = match flag {
            LinkFlag::Disabled(value) => update.col_expr(link::Column::IsDisabled, Expr::value(value)),
            LinkFlag::Blocked => update.col_expr(link::Column::IsBlocked, Expr::value(true)),
        };

        let result = update.exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CutterError::not_found(format!("短链接不存在: {}", name)));
        }

        debug!("Link '{}' updated with {:?}", name, flag);
        self.find_link_by_name(name)
            .await?
            .ok_or_else(|| CutterError::not_found(format!("短链接不存在: {}", name)))
    }

    /// 某用户创建的全部链接，新的在前
    pub async fn list_links_by_owner(&self, user_id: u32) -> Result<Vec<Link>> {
        link::Entity::find()
            .filter(link::Column::CreatedById.eq(i64::from(user_id)))
            .order_by_desc(link::Column::CreatedAt)
            .find_also_related(user::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(with_owner)
            .collect()
    }

    pub async fn count_links(&self) -> Result<u64> {
        Ok(link::Entity::find().count(&self.db).await?)
    }
}
