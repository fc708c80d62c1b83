//! 分组/定稿编排与存储层的集成测试，使用内存 SQLite

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_peer_eval::allocation::AllocationOrchestrator;
use rust_peer_eval::config::{AllocationConfig, DatabaseConfig};
use rust_peer_eval::errors::PeerEvalError;
use rust_peer_eval::models::activities::requests::CreateActivityRequest;
use rust_peer_eval::models::evaluations::entities::EvaluationStatus;
use rust_peer_eval::models::evaluations::requests::EvaluationListQuery;
use rust_peer_eval::models::participants::entities::JoinedVia;
use rust_peer_eval::models::sessions::entities::{EvaluationType, SessionStatus};
use rust_peer_eval::models::sessions::requests::NewSession;
use rust_peer_eval::models::users::requests::UpsertUserRequest;
use rust_peer_eval::storage::Storage;
use rust_peer_eval::storage::sea_orm_storage::SeaOrmStorage;

const INVITE_CODE: &str = "abcd1234";

struct Fixture {
    storage: Arc<dyn Storage>,
    orchestrator: Arc<AllocationOrchestrator>,
    host_id: i64,
    activity_id: i64,
}

fn allocation_config() -> AllocationConfig {
    // 小批量，覆盖分批写入
    AllocationConfig {
        evaluation_batch_size: 3,
        max_group_size: 100,
    }
}

async fn memory_storage() -> Arc<dyn Storage> {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    Arc::new(SeaOrmStorage::connect(":memory:", &config).await.unwrap())
}

async fn create_user(storage: &Arc<dyn Storage>, name: &str) -> i64 {
    storage
        .upsert_user(UpsertUserRequest {
            uuid: format!("{name}-uuid"),
            username: name.to_string(),
            email: format!("{name}@example.com"),
        })
        .await
        .unwrap()
        .id
}

/// 主持人 + 活动 + 邀请链接 + n 个参与者
async fn setup(participants: usize) -> (Fixture, Vec<i64>) {
    setup_with(participants, true).await
}

async fn setup_with(participants: usize, share_link: bool) -> (Fixture, Vec<i64>) {
    let storage = memory_storage().await;
    let host_id = create_user(&storage, "host").await;

    let activity = storage
        .create_activity(
            host_id,
            CreateActivityRequest {
                activity_name: "Design review".to_string(),
                created_with_role: None,
                metadata: None,
                rubric_criteria: Some(vec!["clarity".to_string()]),
                max_marks: None,
            },
        )
        .await
        .unwrap();
    let activity_id = activity.activity.id;

    if share_link {
        storage
            .create_invite_link(activity_id, INVITE_CODE, host_id)
            .await
            .unwrap();
    }

    let mut ids = Vec::with_capacity(participants);
    for i in 0..participants {
        ids.push(create_user(&storage, &format!("student{i}")).await);
    }
    let joined_via = if share_link {
        JoinedVia::Link
    } else {
        JoinedVia::Manual
    };
    storage
        .add_participants(activity_id, &ids, joined_via)
        .await
        .unwrap();

    let orchestrator = Arc::new(AllocationOrchestrator::with_seed(
        storage.clone(),
        &allocation_config(),
        42,
    ));

    (
        Fixture {
            storage,
            orchestrator,
            host_id,
            activity_id,
        },
        ids,
    )
}

async fn schedule(fixture: &Fixture, evaluation_type: EvaluationType, group_size: i32) -> i64 {
    let start_time = Utc::now();
    fixture
        .storage
        .create_session(NewSession {
            activity_id: fixture.activity_id,
            start_time,
            end_time: start_time + Duration::minutes(90),
            evaluation_type,
            group_size,
            total_students: 0,
        })
        .await
        .unwrap()
        .id
}

async fn all_evaluations(
    storage: &Arc<dyn Storage>,
    session_id: i64,
) -> Vec<rust_peer_eval::models::evaluations::entities::Evaluation> {
    storage
        .list_evaluations_with_pagination(
            session_id,
            EvaluationListQuery {
                page: Some(1),
                size: Some(100),
                evaluator_id: None,
            },
        )
        .await
        .unwrap()
        .items
}

#[tokio::test]
async fn test_reallocation_replaces_groups() {
    let (fx, students) = setup(5).await;
    let session_id = schedule(&fx, EvaluationType::WithinGroup, 2).await;

    let first = fx
        .orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap();
    assert_eq!(first.allocation_version, 1);
    assert_eq!(first.groups.len(), 3);

    let second = fx
        .orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap();
    assert_eq!(second.allocation_version, 2);

    // 只剩第二次的小组
    let stored = fx.storage.list_groups_by_session(session_id).await.unwrap();
    assert_eq!(stored.len(), 3);
    let first_ids: HashSet<i64> = first.groups.iter().map(|g| g.id).collect();
    assert!(stored.iter().all(|g| !first_ids.contains(&g.id)));

    let names: Vec<&str> = stored.iter().map(|g| g.group_name.as_str()).collect();
    assert_eq!(names, vec!["Group 1", "Group 2", "Group 3"]);

    // 名单覆盖：5 名学生每人恰好出现一次
    let members: Vec<i64> = stored
        .iter()
        .flat_map(|g| g.group_members.iter().copied())
        .collect();
    let unique: HashSet<i64> = members.iter().copied().collect();
    assert_eq!(members.len(), unique.len());
    let expected: HashSet<i64> = students.into_iter().collect();
    assert_eq!(unique, expected);
}

#[tokio::test]
async fn test_finalize_closes_enrollment_and_activates_session() {
    let (fx, _) = setup(4).await;
    let session_id = schedule(&fx, EvaluationType::WithinGroup, 2).await;

    fx.orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap();
    let finalized = fx
        .orchestrator
        .finalize(session_id, fx.host_id)
        .await
        .unwrap();

    // 2 组 × 2 人 => 4 条
    assert_eq!(finalized.evaluations_created, 4);
    assert!(finalized.groups.iter().all(|g| g.finalized_at.is_some()));

    let session = fx
        .storage
        .get_session_by_id(session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.status, SessionStatus::Active);

    // 旧邀请码无法再使用
    assert!(
        fx.storage
            .get_invite_link_by_code(INVITE_CODE)
            .await
            .unwrap()
            .is_none()
    );
    let link = fx
        .storage
        .get_invite_link_by_activity(fx.activity_id)
        .await
        .unwrap()
        .unwrap();
    assert!(link.invite_code.is_none());
    assert!(link.closed_at.is_some());
    assert!(!link.is_open());

    let evaluations = all_evaluations(&fx.storage, session_id).await;
    assert_eq!(evaluations.len(), 4);
    for evaluation in &evaluations {
        assert_ne!(evaluation.evaluator_id, evaluation.evaluatee_id);
        assert!(evaluation.group_id.is_some());
        assert_eq!(evaluation.status, EvaluationStatus::Pending);
        assert_eq!(evaluation.marks, 0.0);
        assert!(!evaluation.is_submitted);
    }
}

#[tokio::test]
async fn test_finalize_closes_enrollment_without_shared_link() {
    // 全部手动报名，从未生成邀请链接
    let (fx, _) = setup_with(2, false).await;
    assert!(
        fx.storage
            .get_invite_link_by_activity(fx.activity_id)
            .await
            .unwrap()
            .is_none()
    );

    let session_id = schedule(&fx, EvaluationType::WithinGroup, 2).await;
    fx.orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap();
    fx.orchestrator
        .finalize(session_id, fx.host_id)
        .await
        .unwrap();

    let link = fx
        .storage
        .get_invite_link_by_activity(fx.activity_id)
        .await
        .unwrap()
        .expect("finalize leaves a closed link behind");
    assert!(link.invite_code.is_none());
    assert!(link.closed_at.is_some());
    assert!(!link.is_open());
    assert_eq!(link.shared_by, fx.host_id);

    // 每个活动只能有一条链接，已关闭后无法再创建
    assert!(
        fx.storage
            .create_invite_link(fx.activity_id, "late0001", fx.host_id)
            .await
            .is_err()
    );
    assert!(
        fx.storage
            .get_invite_link_by_code("late0001")
            .await
            .unwrap()
            .is_none()
    );

    // 同一活动的第二个会话定稿不受已关闭链接影响
    let second = schedule(&fx, EvaluationType::AnyToAny, 2).await;
    fx.orchestrator.allocate(second, fx.host_id).await.unwrap();
    fx.orchestrator.finalize(second, fx.host_id).await.unwrap();
}

#[tokio::test]
async fn test_invalid_group_size_is_rejected() {
    let (fx, _) = setup(3).await;
    let session_id = schedule(&fx, EvaluationType::WithinGroup, 0).await;

    let err = fx
        .orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap_err();
    assert!(matches!(err, PeerEvalError::InvalidArgument(_)));
    assert!(
        fx.storage
            .list_groups_by_session(session_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_empty_roster_creates_no_groups() {
    let (fx, _) = setup(0).await;
    let session_id = schedule(&fx, EvaluationType::WithinGroup, 2).await;

    let err = fx
        .orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap_err();
    assert!(matches!(err, PeerEvalError::Validation(_)));

    assert!(
        fx.storage
            .list_groups_by_session(session_id)
            .await
            .unwrap()
            .is_empty()
    );
    let session = fx
        .storage
        .get_session_by_id(session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.allocation_version, 0);
    assert_eq!(session.status, SessionStatus::Pending);
}

#[tokio::test]
async fn test_finalize_without_groups_is_rejected() {
    let (fx, _) = setup(3).await;
    let session_id = schedule(&fx, EvaluationType::AnyToAny, 2).await;

    let err = fx
        .orchestrator
        .finalize(session_id, fx.host_id)
        .await
        .unwrap_err();
    assert!(matches!(err, PeerEvalError::Validation(_)));

    // 邀请链接仍然有效
    assert!(
        fx.storage
            .get_invite_link_by_code(INVITE_CODE)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_second_finalize_conflicts() {
    let (fx, _) = setup(4).await;
    let session_id = schedule(&fx, EvaluationType::AnyToAny, 2).await;

    fx.orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap();
    let first = fx
        .orchestrator
        .finalize(session_id, fx.host_id)
        .await
        .unwrap();
    assert_eq!(first.evaluations_created, 12);

    let err = fx
        .orchestrator
        .finalize(session_id, fx.host_id)
        .await
        .unwrap_err();
    assert!(matches!(err, PeerEvalError::Conflict(_)));

    assert_eq!(
        fx.storage
            .count_evaluations_by_session(session_id)
            .await
            .unwrap(),
        12
    );
}

#[tokio::test]
async fn test_concurrent_finalize_only_one_wins() {
    let (fx, _) = setup(4).await;
    let session_id = schedule(&fx, EvaluationType::WithinGroup, 2).await;

    fx.orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap();

    // 两个编排器共享存储，模拟两个进程
    let other = Arc::new(AllocationOrchestrator::with_seed(
        fx.storage.clone(),
        &allocation_config(),
        7,
    ));

    let (a, b, c) = tokio::join!(
        fx.orchestrator.finalize(session_id, fx.host_id),
        other.finalize(session_id, fx.host_id),
        fx.orchestrator.finalize(session_id, fx.host_id),
    );

    let results = [a, b, c];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, PeerEvalError::Conflict(_)))
    );

    assert_eq!(
        fx.storage
            .count_evaluations_by_session(session_id)
            .await
            .unwrap(),
        4
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_allocate_keeps_one_consistent_group_set() {
    let (fx, students) = setup(9).await;
    let session_id = schedule(&fx, EvaluationType::WithinGroup, 2).await;

    let other = Arc::new(AllocationOrchestrator::with_seed(
        fx.storage.clone(),
        &allocation_config(),
        7,
    ));

    let mut handles = Vec::new();
    for i in 0..8 {
        let orchestrator = if i % 2 == 0 {
            fx.orchestrator.clone()
        } else {
            other.clone()
        };
        let host_id = fx.host_id;
        handles.push(tokio::spawn(async move {
            orchestrator.allocate(session_id, host_id).await
        }));
    }

    let mut successes = 0i64;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert!(matches!(e, PeerEvalError::Conflict(_)), "{e}"),
        }
    }
    assert!(successes >= 1);

    // 每次成功的分组恰好推进一次版本
    let session = fx
        .storage
        .get_session_by_id(session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.allocation_version, successes);
    assert_eq!(session.status, SessionStatus::Pending);

    // 只保留一套小组：9 人、每组 2 人 => 5 组，每人恰好一次
    let stored = fx.storage.list_groups_by_session(session_id).await.unwrap();
    assert_eq!(stored.len(), 5);
    let members: Vec<i64> = stored
        .iter()
        .flat_map(|g| g.group_members.iter().copied())
        .collect();
    assert_eq!(members.len(), students.len());
    let unique: HashSet<i64> = members.into_iter().collect();
    assert_eq!(unique, students.into_iter().collect::<HashSet<i64>>());

    assert_eq!(fx.orchestrator.tracked_sessions(), 0);
    assert_eq!(other.tracked_sessions(), 0);
}

#[tokio::test]
async fn test_session_locks_are_released() {
    let (fx, _) = setup(3).await;
    let session_id = schedule(&fx, EvaluationType::WithinGroup, 2).await;

    let err = fx
        .orchestrator
        .allocate(session_id + 100, fx.host_id)
        .await
        .unwrap_err();
    assert!(matches!(err, PeerEvalError::NotFound(_)));
    assert!(
        fx.orchestrator
            .finalize(session_id + 200, fx.host_id)
            .await
            .is_err()
    );
    assert_eq!(fx.orchestrator.tracked_sessions(), 0);

    // 成功分组但未定稿同样不留下锁
    fx.orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap();
    assert_eq!(fx.orchestrator.tracked_sessions(), 0);
}

#[tokio::test]
async fn test_allocate_after_finalize_conflicts() {
    let (fx, _) = setup(4).await;
    let session_id = schedule(&fx, EvaluationType::WithinGroup, 2).await;

    fx.orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap();
    let finalized = fx
        .orchestrator
        .finalize(session_id, fx.host_id)
        .await
        .unwrap();

    let err = fx
        .orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap_err();
    assert!(matches!(err, PeerEvalError::Conflict(_)));

    // 小组保持定稿时的样子
    let stored = fx.storage.list_groups_by_session(session_id).await.unwrap();
    let stored_ids: Vec<i64> = stored.iter().map(|g| g.id).collect();
    let finalized_ids: Vec<i64> = finalized.groups.iter().map(|g| g.id).collect();
    assert_eq!(stored_ids, finalized_ids);
}

#[tokio::test]
async fn test_only_creator_can_allocate() {
    let (fx, students) = setup(3).await;
    let session_id = schedule(&fx, EvaluationType::WithinGroup, 2).await;

    let err = fx
        .orchestrator
        .allocate(session_id, students[0])
        .await
        .unwrap_err();
    assert!(matches!(err, PeerEvalError::Authorization(_)));

    let err = fx
        .orchestrator
        .finalize(session_id, students[0])
        .await
        .unwrap_err();
    assert!(matches!(err, PeerEvalError::Authorization(_)));

    let err = fx
        .orchestrator
        .allocate(session_id + 100, fx.host_id)
        .await
        .unwrap_err();
    assert!(matches!(err, PeerEvalError::NotFound(_)));
}

#[tokio::test]
async fn test_group_to_group_pairs_cross_groups() {
    let (fx, _) = setup(4).await;
    let session_id = schedule(&fx, EvaluationType::GroupToGroup, 2).await;

    let allocated = fx
        .orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap();
    let finalized = fx
        .orchestrator
        .finalize(session_id, fx.host_id)
        .await
        .unwrap();
    assert_eq!(finalized.evaluations_created, 8);

    let group_of = |user: i64| {
        allocated
            .groups
            .iter()
            .find(|g| g.group_members.contains(&user))
            .map(|g| g.id)
    };

    for evaluation in all_evaluations(&fx.storage, session_id).await {
        assert_ne!(
            group_of(evaluation.evaluator_id),
            group_of(evaluation.evaluatee_id)
        );
        // 记录归属于评价人所在的小组
        assert_eq!(evaluation.group_id, group_of(evaluation.evaluator_id));
    }
}

#[tokio::test]
async fn test_any_to_any_has_no_group() {
    let (fx, students) = setup(4).await;
    let session_id = schedule(&fx, EvaluationType::AnyToAny, 3).await;

    fx.orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap();
    fx.orchestrator
        .finalize(session_id, fx.host_id)
        .await
        .unwrap();

    let evaluations = all_evaluations(&fx.storage, session_id).await;
    assert_eq!(evaluations.len(), 12);
    assert!(evaluations.iter().all(|e| e.group_id.is_none()));

    let pairs: HashSet<(i64, i64)> = evaluations
        .iter()
        .map(|e| (e.evaluator_id, e.evaluatee_id))
        .collect();
    assert_eq!(pairs.len(), 12);
    for a in &students {
        for b in &students {
            assert_eq!(pairs.contains(&(*a, *b)), a != b);
        }
    }
}

#[tokio::test]
async fn test_roster_ignores_duplicate_submissions() {
    let (fx, students) = setup(2).await;
    // 绕过服务层的唯一性检查，直接写入重复记录
    fx.storage
        .add_participants(fx.activity_id, &[students[0]], JoinedVia::Manual)
        .await
        .unwrap();

    let session_id = schedule(&fx, EvaluationType::WithinGroup, 5).await;
    let allocated = fx
        .orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap();

    assert_eq!(allocated.groups.len(), 1);
    assert_eq!(allocated.groups[0].group_members.len(), 2);
    assert_eq!(
        fx.storage
            .count_participants(fx.activity_id)
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn test_evaluation_listing_filters_by_evaluator() {
    let (fx, students) = setup(3).await;
    let session_id = schedule(&fx, EvaluationType::AnyToAny, 3).await;

    fx.orchestrator
        .allocate(session_id, fx.host_id)
        .await
        .unwrap();
    fx.orchestrator
        .finalize(session_id, fx.host_id)
        .await
        .unwrap();

    let page = fx
        .storage
        .list_evaluations_with_pagination(
            session_id,
            EvaluationListQuery {
                page: Some(1),
                size: Some(10),
                evaluator_id: Some(students[1]),
            },
        )
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 2);
    assert!(page.items.iter().all(|e| e.evaluator_id == students[1]));
}
