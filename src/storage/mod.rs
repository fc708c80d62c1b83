use std::sync::Arc;

use crate::allocation::{EvaluationPair, PartitionedGroup};
use crate::models::{
    activities::{
        entities::{Activity, ActivityDetail, Rubric},
        requests::{ActivityListQuery, CreateActivityRequest, UpdateActivityRequest},
        responses::ActivityListResponse,
    },
    evaluations::{requests::EvaluationListQuery, responses::EvaluationListResponse},
    groups::entities::Group,
    participants::entities::{InviteLink, JoinedVia, Participant, ParticipantSubmission},
    sessions::{entities::Session, requests::NewSession},
    users::{entities::User, requests::UpsertUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 按外部身份 uuid 创建或更新本地用户
    async fn upsert_user(&self, user: UpsertUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过 uuid 获取用户信息
    async fn get_user_by_uuid(&self, uuid: &str) -> Result<Option<User>>;
    // 批量通过邮箱获取用户
    async fn get_users_by_emails(&self, emails: &[String]) -> Result<Vec<User>>;

    /// 活动管理方法
    // 创建活动（可同时创建评分标准）
    async fn create_activity(
        &self,
        created_by: i64,
        activity: CreateActivityRequest,
    ) -> Result<ActivityDetail>;
    // 通过ID获取活动
    async fn get_activity_by_id(&self, activity_id: i64) -> Result<Option<Activity>>;
    // 获取活动的评分标准
    async fn get_rubric_by_activity_id(&self, activity_id: i64) -> Result<Option<Rubric>>;
    // 列出活动
    async fn list_activities_with_pagination(
        &self,
        query: ActivityListQuery,
    ) -> Result<ActivityListResponse>;
    // 更新活动名称与元数据
    async fn update_activity(
        &self,
        activity_id: i64,
        update: UpdateActivityRequest,
    ) -> Result<Option<Activity>>;
    // 创建或替换评分标准
    async fn upsert_rubric(
        &self,
        activity_id: i64,
        criteria: Vec<String>,
        max_marks: serde_json::Value,
    ) -> Result<Rubric>;
    // 删除活动
    async fn delete_activity(&self, activity_id: i64) -> Result<bool>;
    // 活动下的会话数量
    async fn count_sessions_by_activity(&self, activity_id: i64) -> Result<i64>;

    /// 邀请链接方法
    async fn get_invite_link_by_activity(&self, activity_id: i64) -> Result<Option<InviteLink>>;
    async fn get_invite_link_by_code(&self, invite_code: &str) -> Result<Option<InviteLink>>;
    async fn create_invite_link(
        &self,
        activity_id: i64,
        invite_code: &str,
        shared_by: i64,
    ) -> Result<InviteLink>;

    /// 参与者方法
    // 添加参与记录
    async fn add_participants(
        &self,
        activity_id: i64,
        user_ids: &[i64],
        joined_via: JoinedVia,
    ) -> Result<Vec<ParticipantSubmission>>;
    // 获取用户在活动中的参与记录
    async fn get_participant(
        &self,
        activity_id: i64,
        user_id: i64,
    ) -> Result<Option<ParticipantSubmission>>;
    // 按加入顺序列出参与记录
    async fn list_participants(&self, activity_id: i64) -> Result<Vec<ParticipantSubmission>>;
    // 列出参与记录及用户信息
    async fn list_participants_with_users(&self, activity_id: i64) -> Result<Vec<Participant>>;
    // 移除参与者
    async fn remove_participant(&self, activity_id: i64, user_id: i64) -> Result<bool>;
    // 参与人数
    async fn count_participants(&self, activity_id: i64) -> Result<i64>;

    /// 会话方法
    async fn create_session(&self, session: NewSession) -> Result<Session>;
    async fn get_session_by_id(&self, session_id: i64) -> Result<Option<Session>>;
    async fn list_sessions_by_activity(&self, activity_id: i64) -> Result<Vec<Session>>;

    /// 小组方法
    // 当前小组集合，按位置排序
    async fn list_groups_by_session(&self, session_id: i64) -> Result<Vec<Group>>;
    // 原子替换小组集合，返回新的 allocation_version
    async fn replace_session_groups(
        &self,
        session: &Session,
        groups: &[PartitionedGroup],
    ) -> Result<(i64, Vec<Group>)>;

    /// 评价方法
    // 定稿事务，返回定稿后的小组与写入的评价数量
    async fn commit_finalization(
        &self,
        session: &Session,
        pairs: &[EvaluationPair],
        batch_size: usize,
    ) -> Result<(Vec<Group>, u64)>;
    // 分页列出评价记录
    async fn list_evaluations_with_pagination(
        &self,
        session_id: i64,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse>;
    // 会话下的评价数量
    async fn count_evaluations_by_session(&self, session_id: i64) -> Result<i64>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
