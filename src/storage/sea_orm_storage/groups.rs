//! 小组存储操作

use super::SeaOrmStorage;
use crate::allocation::PartitionedGroup;
use crate::entity::evaluation_groups::{ActiveModel, Column, Entity as Groups};
use crate::entity::sessions::{Column as SessionColumn, Entity as Sessions};
use crate::errors::{PeerEvalError, Result};
use crate::models::groups::entities::Group;
use crate::models::sessions::entities::{Session, SessionStatus};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 会话当前的小组，按创建顺序（即位置）排列
    pub async fn list_groups_by_session_impl(&self, session_id: i64) -> Result<Vec<Group>> {
        Self::fetch_groups(&self.db, session_id).await
    }

    pub(super) async fn fetch_groups<C: ConnectionTrait>(
        conn: &C,
        session_id: i64,
    ) -> Result<Vec<Group>> {
        let result = Groups::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询小组失败: {e}")))?;

        result.into_iter().map(|m| m.into_group()).collect()
    }

    /// 原子替换会话的小组集合
    ///
    /// 以 `allocation_version` 做比较并交换，期间会话被其他写者修改或已定稿时返回冲突。
    pub async fn replace_session_groups_impl(
        &self,
        session: &Session,
        groups: &[PartitionedGroup],
    ) -> Result<(i64, Vec<Group>)> {
        let now = chrono::Utc::now().timestamp();
        let next_version = session.allocation_version + 1;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("开启事务失败: {e}")))?;

        let bumped = Sessions::update_many()
            .col_expr(SessionColumn::AllocationVersion, Expr::value(next_version))
            .col_expr(SessionColumn::UpdatedAt, Expr::value(now))
            .filter(SessionColumn::Id.eq(session.id))
            .filter(SessionColumn::AllocationVersion.eq(session.allocation_version))
            .filter(SessionColumn::Status.eq(SessionStatus::PENDING))
            .exec(&txn)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("更新会话版本失败: {e}")))?;

        if bumped.rows_affected == 0 {
            return Err(PeerEvalError::conflict(format!(
                "Session {} was modified concurrently or is already finalized",
                session.id
            )));
        }

        Groups::delete_many()
            .filter(Column::SessionId.eq(session.id))
            .exec(&txn)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("删除旧小组失败: {e}")))?;

        // 逐条插入以保证自增 ID 与位置顺序一致
        for group in groups {
            ActiveModel {
                session_id: Set(session.id),
                activity_id: Set(session.activity_id),
                group_name: Set(group.group_name.clone()),
                group_members: Set(serde_json::to_string(&group.members)?),
                finalized_at: Set(None),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("创建小组失败: {e}")))?;
        }

        let created = Self::fetch_groups(&txn, session.id).await?;

        txn.commit()
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((next_version, created))
    }
}
