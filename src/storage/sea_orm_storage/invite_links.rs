//! 邀请链接存储操作

use super::SeaOrmStorage;
use crate::entity::invite_links::{ActiveModel, Column, Entity as InviteLinks};
use crate::errors::{PeerEvalError, Result};
use crate::models::participants::entities::InviteLink;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 获取活动的邀请链接（包括已关闭的）
    pub async fn get_invite_link_by_activity_impl(
        &self,
        activity_id: i64,
    ) -> Result<Option<InviteLink>> {
        let result = InviteLinks::find()
            .filter(Column::ActivityId.eq(activity_id))
            .one(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询邀请链接失败: {e}")))?;

        Ok(result.map(|m| m.into_invite_link()))
    }

    /// 通过邀请码获取仍然有效的链接
    pub async fn get_invite_link_by_code_impl(
        &self,
        invite_code: &str,
    ) -> Result<Option<InviteLink>> {
        let result = InviteLinks::find()
            .filter(Column::InviteCode.eq(invite_code))
            .filter(Column::ClosedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询邀请链接失败: {e}")))?;

        Ok(result.map(|m| m.into_invite_link()))
    }

    /// 创建邀请链接
    pub async fn create_invite_link_impl(
        &self,
        activity_id: i64,
        invite_code: &str,
        shared_by: i64,
    ) -> Result<InviteLink> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            activity_id: Set(activity_id),
            invite_code: Set(Some(invite_code.to_string())),
            shared_by: Set(shared_by),
            created_at: Set(now),
            closed_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("创建邀请链接失败: {e}")))?;

        Ok(result.into_invite_link())
    }
}
