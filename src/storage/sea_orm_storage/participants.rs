//! 参与记录存储操作

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::participant_submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{PeerEvalError, Result};
use crate::models::participants::entities::{JoinedVia, Participant, ParticipantSubmission};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 批量添加参与记录
    pub async fn add_participants_impl(
        &self,
        activity_id: i64,
        user_ids: &[i64],
        joined_via: JoinedVia,
    ) -> Result<Vec<ParticipantSubmission>> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("开启事务失败: {e}")))?;

        let mut created = Vec::with_capacity(user_ids.len());
        for &user_id in user_ids {
            let model = ActiveModel {
                activity_id: Set(activity_id),
                user_id: Set(user_id),
                joined_via: Set(joined_via.to_string()),
                joined_at: Set(now),
                ..Default::default()
            };

            let result = model
                .insert(&txn)
                .await
                .map_err(|e| PeerEvalError::database_operation(format!("添加参与者失败: {e}")))?;
            created.push(result.into_submission());
        }

        txn.commit()
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }

    /// 获取用户在活动中的参与记录
    pub async fn get_participant_impl(
        &self,
        activity_id: i64,
        user_id: i64,
    ) -> Result<Option<ParticipantSubmission>> {
        let result = Submissions::find()
            .filter(
                Condition::all()
                    .add(Column::ActivityId.eq(activity_id))
                    .add(Column::UserId.eq(user_id)),
            )
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询参与记录失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 按加入顺序列出参与记录
    pub async fn list_participants_impl(
        &self,
        activity_id: i64,
    ) -> Result<Vec<ParticipantSubmission>> {
        let result = Submissions::find()
            .filter(Column::ActivityId.eq(activity_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询参与记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 列出参与记录及对应用户
    pub async fn list_participants_with_users_impl(
        &self,
        activity_id: i64,
    ) -> Result<Vec<Participant>> {
        let submissions = self.list_participants_impl(activity_id).await?;

        let user_ids: Vec<i64> = submissions.iter().map(|s| s.user_id).collect();
        let users: HashMap<i64, _> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(UserColumn::Id.is_in(user_ids))
                .all(&self.db)
                .await
                .map_err(|e| PeerEvalError::database_operation(format!("查询用户失败: {e}")))?
                .into_iter()
                .map(|m| (m.id, m.into_user()))
                .collect()
        };

        Ok(submissions
            .into_iter()
            .map(|submission| {
                let user = users.get(&submission.user_id).cloned();
                Participant { submission, user }
            })
            .collect())
    }

    /// 移除参与者的全部参与记录
    pub async fn remove_participant_impl(&self, activity_id: i64, user_id: i64) -> Result<bool> {
        let result = Submissions::delete_many()
            .filter(
                Condition::all()
                    .add(Column::ActivityId.eq(activity_id))
                    .add(Column::UserId.eq(user_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("移除参与者失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 参与人数（按用户去重）
    pub async fn count_participants_impl(&self, activity_id: i64) -> Result<i64> {
        let user_ids: Vec<i64> = Submissions::find()
            .filter(Column::ActivityId.eq(activity_id))
            .all(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询参与人数失败: {e}")))?
            .into_iter()
            .map(|m| m.user_id)
            .collect();

        Ok(user_ids.into_iter().collect::<HashSet<_>>().len() as i64)
    }
}
