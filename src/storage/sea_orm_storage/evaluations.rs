//! 评价记录存储操作与定稿事务

use super::SeaOrmStorage;
use crate::allocation::EvaluationPair;
use crate::entity::evaluation_groups::{Column as GroupColumn, Entity as Groups};
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations};
use crate::entity::activities::Entity as Activities;
use crate::entity::invite_links::{
    ActiveModel as InviteLinkActiveModel, Column as InviteColumn, Entity as InviteLinks,
};
use crate::entity::sessions::{Column as SessionColumn, Entity as Sessions};
use crate::errors::{PeerEvalError, Result};
use crate::models::{
    PaginationInfo,
    evaluations::{
        entities::EvaluationStatus, requests::EvaluationListQuery,
        responses::EvaluationListResponse,
    },
    groups::entities::Group,
    sessions::entities::{Session, SessionStatus},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

impl SeaOrmStorage {
    /// 定稿事务
    ///
    /// 顺序：会话状态 pending -> active（比较并交换）、关闭邀请链接、标记小组、批量写入评价。
    /// 任一步失败整体回滚。
    pub async fn commit_finalization_impl(
        &self,
        session: &Session,
        pairs: &[EvaluationPair],
        batch_size: usize,
    ) -> Result<(Vec<Group>, u64)> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("开启事务失败: {e}")))?;

        let activated = Sessions::update_many()
            .col_expr(
                SessionColumn::Status,
                Expr::value(SessionStatus::Active.to_string()),
            )
            .col_expr(SessionColumn::UpdatedAt, Expr::value(now))
            .filter(SessionColumn::Id.eq(session.id))
            .filter(SessionColumn::AllocationVersion.eq(session.allocation_version))
            .filter(SessionColumn::Status.eq(SessionStatus::PENDING))
            .exec(&txn)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("更新会话状态失败: {e}")))?;

        if activated.rows_affected == 0 {
            return Err(PeerEvalError::conflict(format!(
                "Session {} is already finalized or was re-allocated concurrently",
                session.id
            )));
        }

        // 邀请链接永久失效
        let closed = InviteLinks::update_many()
            .col_expr(InviteColumn::InviteCode, Expr::value(Option::<String>::None))
            .col_expr(InviteColumn::ClosedAt, Expr::value(now))
            .filter(InviteColumn::ActivityId.eq(session.activity_id))
            .filter(InviteColumn::ClosedAt.is_null())
            .exec(&txn)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("关闭邀请链接失败: {e}")))?;

        // 从未分享过链接时写入一条已关闭的记录，之后无法再创建
        if closed.rows_affected == 0 {
            Self::insert_closed_invite_link(&txn, session.activity_id, now).await?;
        }

        Groups::update_many()
            .col_expr(GroupColumn::FinalizedAt, Expr::value(now))
            .filter(GroupColumn::SessionId.eq(session.id))
            .exec(&txn)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("标记小组失败: {e}")))?;

        let mut inserted = 0u64;
        for batch in pairs.chunks(batch_size.max(1)) {
            let models = batch.iter().map(|pair| ActiveModel {
                activity_id: Set(session.activity_id),
                session_id: Set(session.id),
                evaluator_id: Set(pair.evaluator_id),
                evaluatee_id: Set(pair.evaluatee_id),
                group_id: Set(pair.group_id),
                marks: Set(0.0),
                status: Set(EvaluationStatus::Pending.as_str().to_string()),
                is_submitted: Set(false),
                is_reviewed: Set(false),
                created_at: Set(now),
                ..Default::default()
            });

            inserted += Evaluations::insert_many(models)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| PeerEvalError::database_operation(format!("写入评价失败: {e}")))?;
        }

        debug!(
            "Session {} finalization wrote {} evaluations in batches of {}",
            session.id, inserted, batch_size
        );

        let groups = Self::fetch_groups(&txn, session.id).await?;

        txn.commit()
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((groups, inserted))
    }

    async fn insert_closed_invite_link<C: ConnectionTrait>(
        conn: &C,
        activity_id: i64,
        now: i64,
    ) -> Result<()> {
        let existing = InviteLinks::find()
            .filter(InviteColumn::ActivityId.eq(activity_id))
            .count(conn)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询邀请链接失败: {e}")))?;
        if existing > 0 {
            return Ok(());
        }

        let activity = Activities::find_by_id(activity_id)
            .one(conn)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询活动失败: {e}")))?
            .ok_or_else(|| PeerEvalError::not_found(format!("Activity {activity_id} not found")))?;

        InviteLinkActiveModel {
            activity_id: Set(activity_id),
            invite_code: Set(None),
            shared_by: Set(activity.created_by),
            created_at: Set(now),
            closed_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| PeerEvalError::database_operation(format!("关闭邀请链接失败: {e}")))?;

        Ok(())
    }

    /// 分页列出会话的评价记录
    pub async fn list_evaluations_with_pagination_impl(
        &self,
        session_id: i64,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(20).clamp(1, 100) as u64;

        let mut select = Evaluations::find().filter(Column::SessionId.eq(session_id));

        if let Some(evaluator_id) = query.evaluator_id {
            select = select.filter(Column::EvaluatorId.eq(evaluator_id));
        }

        let paginator = select.order_by_asc(Column::Id).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询评价总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询评价页数失败: {e}")))?;

        let evaluations = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询评价列表失败: {e}")))?;

        Ok(EvaluationListResponse {
            items: evaluations
                .into_iter()
                .map(|m| m.into_evaluation())
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 会话下的评价数量
    pub async fn count_evaluations_by_session_impl(&self, session_id: i64) -> Result<i64> {
        let count = Evaluations::find()
            .filter(Column::SessionId.eq(session_id))
            .count(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询评价数量失败: {e}")))?;

        Ok(count as i64)
    }
}
