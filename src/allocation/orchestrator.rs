//! 分组/定稿编排
//!
//! 状态：UNALLOCATED（无小组）-> ALLOCATED（有小组，仍为 pending）-> FINALIZED（active 及之后）。
//! 同一会话的操作在进程内通过会话锁串行，跨进程依赖存储层对
//! `allocation_version` 的比较并交换。

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use super::{generate_pairs, partition, resolve_roster};
use crate::config::AllocationConfig;
use crate::errors::{PeerEvalError, Result};
use crate::models::groups::responses::{AllocationResponse, FinalizeResponse};
use crate::models::sessions::entities::Session;
use crate::storage::Storage;

pub struct AllocationOrchestrator {
    storage: Arc<dyn Storage>,
    locks: DashMap<i64, Arc<tokio::sync::Mutex<()>>>,
    rng: Mutex<StdRng>,
    batch_size: usize,
}

impl AllocationOrchestrator {
    pub fn new(storage: Arc<dyn Storage>, settings: &AllocationConfig) -> Self {
        Self::with_rng(storage, settings, StdRng::from_os_rng())
    }

    /// 固定随机种子，分组结果可复现
    pub fn with_seed(storage: Arc<dyn Storage>, settings: &AllocationConfig, seed: u64) -> Self {
        Self::with_rng(storage, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(storage: Arc<dyn Storage>, settings: &AllocationConfig, rng: StdRng) -> Self {
        Self {
            storage,
            locks: DashMap::new(),
            rng: Mutex::new(rng),
            batch_size: settings.evaluation_batch_size.max(1),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    // 取出锁后立即释放 DashMap 的分片引用
    fn session_lock(&self, session_id: i64) -> Arc<tokio::sync::Mutex<()>> {
        self.locks.entry(session_id).or_default().value().clone()
    }

    /// 没有其他请求持有或等待时移除会话锁
    fn release_session_lock(&self, session_id: i64, lock: Arc<tokio::sync::Mutex<()>>) {
        drop(lock);
        self.locks.remove_if(&session_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// 当前登记的会话锁数量
    pub fn tracked_sessions(&self) -> usize {
        self.locks.len()
    }

    /// 读取会话并校验调用者是活动创建者
    async fn load_owned_session(&self, session_id: i64, caller_id: i64) -> Result<Session> {
        let session = self
            .storage
            .get_session_by_id(session_id)
            .await?
            .ok_or_else(|| PeerEvalError::not_found(format!("Session {session_id} not found")))?;

        let activity = self
            .storage
            .get_activity_by_id(session.activity_id)
            .await?
            .ok_or_else(|| {
                PeerEvalError::not_found(format!("Activity {} not found", session.activity_id))
            })?;

        if activity.created_by != caller_id {
            return Err(PeerEvalError::authorization(
                "Only the activity creator can manage group allocation",
            ));
        }

        Ok(session)
    }

    /// 分组：替换会话当前的小组集合，定稿前可重复执行
    pub async fn allocate(&self, session_id: i64, caller_id: i64) -> Result<AllocationResponse> {
        let lock = self.session_lock(session_id);
        let result = {
            let _guard = lock.lock().await;
            self.allocate_locked(session_id, caller_id).await
        };
        self.release_session_lock(session_id, lock);
        result
    }

    async fn allocate_locked(
        &self,
        session_id: i64,
        caller_id: i64,
    ) -> Result<AllocationResponse> {
        let session = self.load_owned_session(session_id, caller_id).await?;

        if session.status.is_finalized() {
            warn!(
                "Allocation refused for session {}: status is {}",
                session_id, session.status
            );
            return Err(PeerEvalError::conflict(
                "Session is already finalized, groups can no longer be changed",
            ));
        }
        if session.group_size < 1 {
            return Err(PeerEvalError::invalid_argument(format!(
                "Session {} has invalid group size {}",
                session_id, session.group_size
            )));
        }

        let roster = resolve_roster(self.storage.as_ref(), session.activity_id).await?;
        if roster.is_empty() {
            warn!(
                "Allocation refused for session {}: no participants in activity {}",
                session_id, session.activity_id
            );
            return Err(PeerEvalError::validation(
                "No participants found for this activity",
            ));
        }

        let partitioned = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            partition(&roster, session.group_size, &mut *rng)?
        };

        let (allocation_version, groups) = self
            .storage
            .replace_session_groups(&session, &partitioned)
            .await?;

        info!(
            "Session {} allocated: {} participants into {} groups (version {})",
            session_id,
            roster.len(),
            groups.len(),
            allocation_version
        );

        Ok(AllocationResponse {
            session_id,
            allocation_version,
            groups,
        })
    }

    /// 定稿：不可逆
    ///
    /// 在同一事务内关闭邀请链接、将会话置为 active、标记小组并批量写入评价记录。
    pub async fn finalize(&self, session_id: i64, caller_id: i64) -> Result<FinalizeResponse> {
        let lock = self.session_lock(session_id);
        let result = {
            let _guard = lock.lock().await;
            self.finalize_locked(session_id, caller_id).await
        };
        self.release_session_lock(session_id, lock);
        result
    }

    async fn finalize_locked(&self, session_id: i64, caller_id: i64) -> Result<FinalizeResponse> {
        let session = self.load_owned_session(session_id, caller_id).await?;

        if session.status.is_finalized() {
            warn!("Finalize refused for session {}: already finalized", session_id);
            return Err(PeerEvalError::conflict("Session is already finalized"));
        }

        let groups = self.storage.list_groups_by_session(session_id).await?;
        if groups.is_empty() {
            return Err(PeerEvalError::validation(
                "No groups found for this session, allocate before finalizing",
            ));
        }

        let pairs = generate_pairs(&groups, session.evaluation_type);

        let (groups, evaluations_created) = self
            .storage
            .commit_finalization(&session, &pairs, self.batch_size)
            .await?;

        info!(
            "Session {} finalized: {} groups, {} evaluations ({})",
            session_id,
            groups.len(),
            evaluations_created,
            session.evaluation_type
        );

        Ok(FinalizeResponse {
            session_id,
            groups,
            evaluations_created,
        })
    }
}
