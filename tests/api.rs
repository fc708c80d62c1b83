//! HTTP 层集成测试：邀请、加入、排期、分组与定稿的完整流程

use std::sync::{Arc, Once};

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};

use rust_peer_eval::allocation::AllocationOrchestrator;
use rust_peer_eval::config::{AllocationConfig, AppConfig, DatabaseConfig};
use rust_peer_eval::routes;
use rust_peer_eval::storage::Storage;
use rust_peer_eval::storage::sea_orm_storage::SeaOrmStorage;
use rust_peer_eval::utils::jwt::Claims;
use rust_peer_eval::utils::{json_error_handler, query_error_handler};

const SECRET: &str = "integration-test-secret";

fn init_config() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // SAFETY: 只在首次读取配置之前设置一次
        unsafe { std::env::set_var("JWT_SECRET", SECRET) };
        AppConfig::init().unwrap();
    });
}

fn token(name: &str) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: format!("{name}-uuid"),
        name: name.to_string(),
        email: format!("{name}@example.com"),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn bearer(name: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token(name)))
}

async fn memory_storage() -> Arc<dyn Storage> {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    Arc::new(SeaOrmStorage::connect(":memory:", &config).await.unwrap())
}

macro_rules! app {
    ($storage:expr) => {{
        let orchestrator = Arc::new(AllocationOrchestrator::with_seed(
            $storage.clone(),
            &AllocationConfig::default(),
            1,
        ));
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new(orchestrator))
                .configure(routes::configure_auth_routes)
                .configure(routes::configure_participants_routes)
                .configure(routes::configure_sessions_routes)
                .configure(routes::configure_activities_routes)
                .configure(routes::configure_group_allocation_routes),
        )
        .await
    }};
}

macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn test_enrollment_and_finalize_flow() {
    init_config();
    let storage = memory_storage().await;
    let app = app!(storage);

    // 主持人创建活动
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/activities")
            .insert_header(bearer("host"))
            .set_json(json!({
                "activity_name": "Design review",
                "created_with_role": "HOST",
                "rubric_criteria": ["clarity", "depth"],
                "max_marks": {"clarity": 10, "depth": 5}
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let activity_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["rubric"]["criteria"], json!(["clarity", "depth"]));

    // 非主持人无法获取邀请链接
    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/activities/{activity_id}/invite-link"))
            .insert_header(bearer("outsider"))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/activities/{activity_id}/invite-link"))
            .insert_header(bearer("host"))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["created"], json!(true));
    let code = body["data"]["invite_code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 8);
    assert!(
        body["data"]["invite_link"]
            .as_str()
            .unwrap()
            .ends_with(&format!("/join/{code}"))
    );

    // 再次请求返回同一个链接
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/activities/{activity_id}/invite-link"))
            .insert_header(bearer("host"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["created"], json!(false));
    assert_eq!(body["data"]["invite_code"], json!(code));

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/invites/{code}/join"))
            .insert_header(bearer("alice"))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/invites/{code}/join"))
            .insert_header(bearer("alice"))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    // 主持人创建链接时已自动报名
    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/activities/{activity_id}/participants"))
            .insert_header(bearer("host"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(2));

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/activities/{activity_id}/sessions"))
            .insert_header(bearer("host"))
            .set_json(json!({
                "start_time": "2025-03-01T09:00:00Z",
                "end_time": "2025-03-01T10:30:00Z",
                "evaluation_type": "WITHIN_GROUP",
                "group_size": 2
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["total_students"], json!(2));
    assert_eq!(body["data"]["duration"], json!(90));
    assert_eq!(body["data"]["status"], json!("PENDING"));
    let session_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/group-allocation?action=allocate")
            .insert_header(bearer("host"))
            .set_json(json!({ "session_id": session_id }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["groups"].as_array().unwrap().len(), 1);

    // 参与者不能触发分组
    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/group-allocation?action=finalize")
            .insert_header(bearer("alice"))
            .set_json(json!({ "session_id": session_id }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/group-allocation?action=finalize")
            .insert_header(bearer("host"))
            .set_json(json!({ "session_id": session_id }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["evaluations_created"], json!(2));

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/group-allocation?action=finalize")
            .insert_header(bearer("host"))
            .set_json(json!({ "session_id": session_id }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    // 定稿后旧邀请码失效，也不能再生成新链接
    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/invites/{code}/join"))
            .insert_header(bearer("bob"))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/activities/{activity_id}/invite-link"))
            .insert_header(bearer("host"))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    // 评分标准已锁定
    let (status, _) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/activities/{activity_id}/rubric"))
            .insert_header(bearer("host"))
            .set_json(json!({ "rubric_criteria": ["clarity"] }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    // 参与者只看到自己作为评价人的记录
    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/sessions/{session_id}/evaluations"))
            .insert_header(bearer("alice"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], json!(1));

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/sessions/{session_id}/evaluations"))
            .insert_header(bearer("host"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], json!(2));

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/sessions/{session_id}/evaluations"))
            .insert_header(bearer("outsider"))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_group_allocation_rejects_bad_requests() {
    init_config();
    let storage = memory_storage().await;
    let app = app!(storage);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/group-allocation?action=allocate")
            .set_json(json!({ "session_id": 1 }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/group-allocation")
            .insert_header(bearer("host"))
            .set_json(json!({ "session_id": 1 }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/group-allocation?action=shuffle")
            .insert_header(bearer("host"))
            .set_json(json!({ "session_id": 1 }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/group-allocation?action=allocate")
            .insert_header(bearer("host"))
            .set_json(json!({}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/group-allocation?action=allocate")
            .insert_header(bearer("host"))
            .set_json(json!({ "session_id": 999 }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_manual_enrollment_by_email() {
    init_config();
    let storage = memory_storage().await;
    let app = app!(storage);

    // 首次请求即完成用户同步
    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(bearer("carol"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], json!("carol@example.com"));

    let (_, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/activities")
            .insert_header(bearer("host"))
            .set_json(json!({ "activity_name": "Lab critique" }))
    );
    let activity_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/activities/{activity_id}/participants"))
            .insert_header(bearer("host"))
            .set_json(json!({
                "participant_emails": ["Carol@Example.com", "nobody@example.com", "broken"]
            }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let invalid = body["data"]["invalid_emails"].as_array().unwrap();
    assert_eq!(invalid.len(), 2);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/activities/{activity_id}/participants"))
            .insert_header(bearer("host"))
            .set_json(json!({ "participant_emails": ["Carol@Example.com"] }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["added"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["added"][0]["joined_via"], json!("MANUAL"));

    // 重复添加被跳过
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/activities/{activity_id}/participants"))
            .insert_header(bearer("host"))
            .set_json(json!({ "participant_emails": ["carol@example.com"] }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["added"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["skipped_user_ids"].as_array().unwrap().len(), 1);

    let carol_id = body["data"]["skipped_user_ids"][0].as_i64().unwrap();
    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!(
                "/api/v1/activities/{activity_id}/participants/{carol_id}"
            ))
            .insert_header(bearer("host"))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!(
                "/api/v1/activities/{activity_id}/participants/{carol_id}"
            ))
            .insert_header(bearer("host"))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_enrollment_stays_closed_without_shared_link() {
    init_config();
    let storage = memory_storage().await;
    let app = app!(storage);

    // 参与者先完成用户同步，之后只通过邮箱手动添加
    for name in ["dave", "erin"] {
        let (status, _) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/v1/auth/me")
                .insert_header(bearer(name))
        );
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/activities")
            .insert_header(bearer("host"))
            .set_json(json!({ "activity_name": "Studio critique" }))
    );
    let activity_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/activities/{activity_id}/participants"))
            .insert_header(bearer("host"))
            .set_json(json!({
                "participant_emails": ["dave@example.com", "erin@example.com"]
            }))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/activities/{activity_id}/sessions"))
            .insert_header(bearer("host"))
            .set_json(json!({
                "start_time": "2025-03-02T09:00:00Z",
                "end_time": "2025-03-02T10:00:00Z",
                "evaluation_type": "ANY_TO_ANY",
                "group_size": 2
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let session_id = body["data"]["id"].as_i64().unwrap();

    for action in ["allocate", "finalize"] {
        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/group-allocation?action={action}"))
                .insert_header(bearer("host"))
                .set_json(json!({ "session_id": session_id }))
        );
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/activities/{activity_id}/invite-link"))
            .insert_header(bearer("host"))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["data"].is_null());
}
