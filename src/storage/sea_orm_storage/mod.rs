//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod activities;
mod evaluations;
mod groups;
mod invite_links;
mod participants;
mod sessions;
mod users;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{PeerEvalError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database.url, &config.database).await
    }

    /// 连接指定数据库并运行迁移
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| PeerEvalError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    ///
    /// 内存数据库每个连接都是独立的库，只能使用单连接且不能被回收。
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PeerEvalError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
            SqlitePoolOptions::new()
                .max_connections(config.pool_size)
                .min_connections(1)
                .test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| PeerEvalError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PeerEvalError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url == ":memory:" || url == "sqlite::memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PeerEvalError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, :memory:, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn upsert_user(&self, user: UpsertUserRequest) -> Result<User> {
        self.upsert_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_uuid(&self, uuid: &str) -> Result<Option<User>> {
        self.get_user_by_uuid_impl(uuid).await
    }

    async fn get_users_by_emails(&self, emails: &[String]) -> Result<Vec<User>> {
        self.get_users_by_emails_impl(emails).await
    }

    // 活动模块
    async fn create_activity(
        &self,
        created_by: i64,
        activity: CreateActivityRequest,
    ) -> Result<ActivityDetail> {
        self.create_activity_impl(created_by, activity).await
    }

    async fn get_activity_by_id(&self, activity_id: i64) -> Result<Option<Activity>> {
        self.get_activity_by_id_impl(activity_id).await
    }

    async fn get_rubric_by_activity_id(&self, activity_id: i64) -> Result<Option<Rubric>> {
        self.get_rubric_by_activity_id_impl(activity_id).await
    }

    async fn list_activities_with_pagination(
        &self,
        query: ActivityListQuery,
    ) -> Result<ActivityListResponse> {
        self.list_activities_with_pagination_impl(query).await
    }

    async fn update_activity(
        &self,
        activity_id: i64,
        update: UpdateActivityRequest,
    ) -> Result<Option<Activity>> {
        self.update_activity_impl(activity_id, update).await
    }

    async fn upsert_rubric(
        &self,
        activity_id: i64,
        criteria: Vec<String>,
        max_marks: serde_json::Value,
    ) -> Result<Rubric> {
        self.upsert_rubric_impl(activity_id, criteria, max_marks)
            .await
    }

    async fn delete_activity(&self, activity_id: i64) -> Result<bool> {
        self.delete_activity_impl(activity_id).await
    }

    async fn count_sessions_by_activity(&self, activity_id: i64) -> Result<i64> {
        self.count_sessions_by_activity_impl(activity_id).await
    }

    // 邀请链接模块
    async fn get_invite_link_by_activity(&self, activity_id: i64) -> Result<Option<InviteLink>> {
        self.get_invite_link_by_activity_impl(activity_id).await
    }

    async fn get_invite_link_by_code(&self, invite_code: &str) -> Result<Option<InviteLink>> {
        self.get_invite_link_by_code_impl(invite_code).await
    }

    async fn create_invite_link(
        &self,
        activity_id: i64,
        invite_code: &str,
        shared_by: i64,
    ) -> Result<InviteLink> {
        self.create_invite_link_impl(activity_id, invite_code, shared_by)
            .await
    }

    // 参与者模块
    async fn add_participants(
        &self,
        activity_id: i64,
        user_ids: &[i64],
        joined_via: JoinedVia,
    ) -> Result<Vec<ParticipantSubmission>> {
        self.add_participants_impl(activity_id, user_ids, joined_via)
            .await
    }

    async fn get_participant(
        &self,
        activity_id: i64,
        user_id: i64,
    ) -> Result<Option<ParticipantSubmission>> {
        self.get_participant_impl(activity_id, user_id).await
    }

    async fn list_participants(&self, activity_id: i64) -> Result<Vec<ParticipantSubmission>> {
        self.list_participants_impl(activity_id).await
    }

    async fn list_participants_with_users(&self, activity_id: i64) -> Result<Vec<Participant>> {
        self.list_participants_with_users_impl(activity_id).await
    }

    async fn remove_participant(&self, activity_id: i64, user_id: i64) -> Result<bool> {
        self.remove_participant_impl(activity_id, user_id).await
    }

    async fn count_participants(&self, activity_id: i64) -> Result<i64> {
        self.count_participants_impl(activity_id).await
    }

    // 会话模块
    async fn create_session(&self, session: NewSession) -> Result<Session> {
        self.create_session_impl(session).await
    }

    async fn get_session_by_id(&self, session_id: i64) -> Result<Option<Session>> {
        self.get_session_by_id_impl(session_id).await
    }

    async fn list_sessions_by_activity(&self, activity_id: i64) -> Result<Vec<Session>> {
        self.list_sessions_by_activity_impl(activity_id).await
    }

    // 小组模块
    async fn list_groups_by_session(&self, session_id: i64) -> Result<Vec<Group>> {
        self.list_groups_by_session_impl(session_id).await
    }

    async fn replace_session_groups(
        &self,
        session: &Session,
        groups: &[PartitionedGroup],
    ) -> Result<(i64, Vec<Group>)> {
        self.replace_session_groups_impl(session, groups).await
    }

    // 评价模块
    async fn commit_finalization(
        &self,
        session: &Session,
        pairs: &[EvaluationPair],
        batch_size: usize,
    ) -> Result<(Vec<Group>, u64)> {
        self.commit_finalization_impl(session, pairs, batch_size)
            .await
    }

    async fn list_evaluations_with_pagination(
        &self,
        session_id: i64,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse> {
        self.list_evaluations_with_pagination_impl(session_id, query)
            .await
    }

    async fn count_evaluations_by_session(&self, session_id: i64) -> Result<i64> {
        self.count_evaluations_by_session_impl(session_id).await
    }
}
