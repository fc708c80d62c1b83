use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::evaluations::requests::EvaluationQueryParams;
use crate::models::sessions::requests::ScheduleSessionRequest;
use crate::services::SessionService;
use crate::utils::{SafeActivityId, SafeSessionId};

// 懒加载的全局 SESSION_SERVICE 实例
static SESSION_SERVICE: Lazy<SessionService> = Lazy::new(SessionService::new_lazy);

// HTTP处理程序
pub async fn schedule_session(
    req: HttpRequest,
    activity_id: SafeActivityId,
    session_data: web::Json<ScheduleSessionRequest>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE
        .schedule_session(&req, activity_id.0, session_data.into_inner())
        .await
}

pub async fn list_sessions(
    req: HttpRequest,
    activity_id: SafeActivityId,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.list_sessions(&req, activity_id.0).await
}

pub async fn get_session(req: HttpRequest, session_id: SafeSessionId) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.get_session(&req, session_id.0).await
}

pub async fn list_groups(req: HttpRequest, session_id: SafeSessionId) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.list_groups(&req, session_id.0).await
}

pub async fn list_evaluations(
    req: HttpRequest,
    session_id: SafeSessionId,
    query: web::Query<EvaluationQueryParams>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE
        .list_evaluations(&req, session_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_sessions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/activities/{activity_id}/sessions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 主持人与参与者都可查看
                    .route(web::get().to(list_sessions))
                    .route(
                        web::post()
                            .to(schedule_session)
                            .wrap(middlewares::RequireActivityHost),
                    ),
            ),
    )
    .service(
        web::scope("/api/v1/sessions")
            .wrap(middlewares::RequireJWT)
            .route("/{session_id}", web::get().to(get_session))
            .route("/{session_id}/groups", web::get().to(list_groups))
            .route("/{session_id}/evaluations", web::get().to(list_evaluations)),
    );
}
