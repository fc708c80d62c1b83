//! 用户存储操作

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{PeerEvalError, Result};
use crate::models::users::{entities::User, requests::UpsertUserRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 按 uuid 创建或同步用户
    pub async fn upsert_user_impl(&self, req: UpsertUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let existing = Users::find()
            .filter(Column::Uuid.eq(&req.uuid))
            .one(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询用户失败: {e}")))?;

        let result = match existing {
            Some(user) if user.username == req.username && user.email == req.email => user,
            Some(user) => {
                let model = ActiveModel {
                    id: Set(user.id),
                    username: Set(req.username),
                    email: Set(req.email),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model
                    .update(&self.db)
                    .await
                    .map_err(|e| PeerEvalError::database_operation(format!("更新用户失败: {e}")))?
            }
            None => {
                let model = ActiveModel {
                    uuid: Set(req.uuid),
                    username: Set(req.username),
                    email: Set(req.email),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model
                    .insert(&self.db)
                    .await
                    .map_err(|e| PeerEvalError::database_operation(format!("创建用户失败: {e}")))?
            }
        };

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过 uuid 获取用户
    pub async fn get_user_by_uuid_impl(&self, uuid: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Uuid.eq(uuid))
            .one(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 批量通过邮箱获取用户
    pub async fn get_users_by_emails_impl(&self, emails: &[String]) -> Result<Vec<User>> {
        if emails.is_empty() {
            return Ok(vec![]);
        }

        let result = Users::find()
            .filter(Column::Email.is_in(emails.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_user()).collect())
    }
}
