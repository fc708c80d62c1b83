//! 会话存储操作

use super::SeaOrmStorage;
use crate::entity::sessions::{ActiveModel, Column, Entity as Sessions};
use crate::errors::{PeerEvalError, Result};
use crate::models::sessions::{
    entities::{Session, SessionStatus},
    requests::NewSession,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 排期会话，初始状态为 pending
    pub async fn create_session_impl(&self, session: NewSession) -> Result<Session> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            activity_id: Set(session.activity_id),
            start_time: Set(session.start_time.timestamp()),
            end_time: Set(session.end_time.timestamp()),
            duration: Set(session.duration_minutes()),
            status: Set(SessionStatus::Pending.to_string()),
            evaluation_type: Set(session.evaluation_type.to_string()),
            group_size: Set(session.group_size),
            total_students: Set(session.total_students),
            allocation_version: Set(0),
            scheduled_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("创建会话失败: {e}")))?;

        Ok(result.into_session())
    }

    /// 通过 ID 获取会话
    pub async fn get_session_by_id_impl(&self, session_id: i64) -> Result<Option<Session>> {
        let result = Sessions::find_by_id(session_id)
            .one(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询会话失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    /// 列出活动下的会话，最新的在前
    pub async fn list_sessions_by_activity_impl(&self, activity_id: i64) -> Result<Vec<Session>> {
        let result = Sessions::find()
            .filter(Column::ActivityId.eq(activity_id))
            .order_by_desc(Column::ScheduledAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询会话列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_session()).collect())
    }
}
