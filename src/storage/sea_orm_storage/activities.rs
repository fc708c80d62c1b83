//! 活动与评分标准存储操作

use super::SeaOrmStorage;
use crate::entity::activities::{ActiveModel, Column, Entity as Activities};
use crate::entity::rubrics::{
    ActiveModel as RubricActiveModel, Column as RubricColumn, Entity as Rubrics,
};
use crate::entity::sessions::{Column as SessionColumn, Entity as Sessions};
use crate::errors::{PeerEvalError, Result};
use crate::models::{
    PaginationInfo,
    activities::{
        entities::{Activity, ActivityDetail, ActivityRole, Rubric},
        requests::{ActivityListQuery, CreateActivityRequest, UpdateActivityRequest},
        responses::ActivityListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde_json::Value;

// 浅合并：patch 中的键覆盖 base 中的同名键
fn merge_metadata(base: Value, patch: Value) -> Value {
    match (base, patch) {
        (Value::Object(mut base), Value::Object(patch)) => {
            base.extend(patch);
            Value::Object(base)
        }
        (_, patch) => patch,
    }
}

impl SeaOrmStorage {
    /// 创建活动，提供评分项时一并创建评分标准
    pub async fn create_activity_impl(
        &self,
        created_by: i64,
        req: CreateActivityRequest,
    ) -> Result<ActivityDetail> {
        let now = chrono::Utc::now().timestamp();
        let metadata = req
            .metadata
            .unwrap_or_else(|| Value::Object(Default::default()));

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            activity_name: Set(req.activity_name.trim().to_string()),
            created_by: Set(created_by),
            created_with_role: Set(req
                .created_with_role
                .unwrap_or(ActivityRole::Host)
                .to_string()),
            metadata: Set(serde_json::to_string(&metadata)?),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let activity = model
            .insert(&txn)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("创建活动失败: {e}")))?;

        let rubric = match req.rubric_criteria {
            Some(criteria) if !criteria.is_empty() => {
                let max_marks = req
                    .max_marks
                    .unwrap_or_else(|| Value::Object(Default::default()));
                let rubric = RubricActiveModel {
                    activity_id: Set(activity.id),
                    criteria: Set(serde_json::to_string(&criteria)?),
                    max_marks: Set(serde_json::to_string(&max_marks)?),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| PeerEvalError::database_operation(format!("创建评分标准失败: {e}")))?;
                Some(rubric.into_rubric())
            }
            _ => None,
        };

        txn.commit()
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(ActivityDetail {
            activity: activity.into_activity(),
            rubric,
        })
    }

    /// 通过 ID 获取活动
    pub async fn get_activity_by_id_impl(&self, activity_id: i64) -> Result<Option<Activity>> {
        let result = Activities::find_by_id(activity_id)
            .one(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询活动失败: {e}")))?;

        Ok(result.map(|m| m.into_activity()))
    }

    /// 获取活动的评分标准
    pub async fn get_rubric_by_activity_id_impl(&self, activity_id: i64) -> Result<Option<Rubric>> {
        let result = Rubrics::find()
            .filter(RubricColumn::ActivityId.eq(activity_id))
            .one(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询评分标准失败: {e}")))?;

        Ok(result.map(|m| m.into_rubric()))
    }

    /// 分页列出活动
    pub async fn list_activities_with_pagination_impl(
        &self,
        query: ActivityListQuery,
    ) -> Result<ActivityListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Activities::find();

        // 创建者筛选
        if let Some(created_by) = query.created_by {
            select = select.filter(Column::CreatedBy.eq(created_by));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::ActivityName.contains(&escaped));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询活动总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询活动页数失败: {e}")))?;

        let activities = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询活动列表失败: {e}")))?;

        Ok(ActivityListResponse {
            items: activities.into_iter().map(|m| m.into_activity()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新活动名称与元数据（元数据浅合并）
    pub async fn update_activity_impl(
        &self,
        activity_id: i64,
        update: UpdateActivityRequest,
    ) -> Result<Option<Activity>> {
        let Some(existing) = self.get_activity_by_id_impl(activity_id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(activity_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.activity_name {
            model.activity_name = Set(name.trim().to_string());
        }

        if let Some(patch) = update.metadata {
            let merged = merge_metadata(existing.metadata, patch);
            model.metadata = Set(serde_json::to_string(&merged)?);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("更新活动失败: {e}")))?;

        Ok(Some(result.into_activity()))
    }

    /// 创建或替换评分标准
    pub async fn upsert_rubric_impl(
        &self,
        activity_id: i64,
        criteria: Vec<String>,
        max_marks: Value,
    ) -> Result<Rubric> {
        let now = chrono::Utc::now().timestamp();
        let criteria = serde_json::to_string(&criteria)?;
        let max_marks = serde_json::to_string(&max_marks)?;

        let existing = Rubrics::find()
            .filter(RubricColumn::ActivityId.eq(activity_id))
            .one(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询评分标准失败: {e}")))?;

        let result = match existing {
            Some(rubric) => RubricActiveModel {
                id: Set(rubric.id),
                criteria: Set(criteria),
                max_marks: Set(max_marks),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("更新评分标准失败: {e}")))?,
            None => RubricActiveModel {
                activity_id: Set(activity_id),
                criteria: Set(criteria),
                max_marks: Set(max_marks),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("创建评分标准失败: {e}")))?,
        };

        Ok(result.into_rubric())
    }

    /// 删除活动，关联数据由外键级联删除
    pub async fn delete_activity_impl(&self, activity_id: i64) -> Result<bool> {
        let result = Activities::delete_by_id(activity_id)
            .exec(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("删除活动失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 活动下的会话数量
    pub async fn count_sessions_by_activity_impl(&self, activity_id: i64) -> Result<i64> {
        let count = Sessions::find()
            .filter(SessionColumn::ActivityId.eq(activity_id))
            .count(&self.db)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("查询会话数量失败: {e}")))?;

        Ok(count as i64)
    }
}
