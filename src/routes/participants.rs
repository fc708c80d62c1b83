use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::participants::requests::AddParticipantsRequest;
use crate::services::ParticipantService;
use crate::utils::{SafeActivityId, SafeInviteCode, SafeUserId};

// 懒加载的全局 PARTICIPANT_SERVICE 实例
static PARTICIPANT_SERVICE: Lazy<ParticipantService> = Lazy::new(ParticipantService::new_lazy);

// HTTP处理程序
pub async fn get_or_create_invite_link(
    req: HttpRequest,
    activity_id: SafeActivityId,
) -> ActixResult<HttpResponse> {
    PARTICIPANT_SERVICE
        .get_or_create_invite_link(&req, activity_id.0)
        .await
}

pub async fn join_activity(
    req: HttpRequest,
    invite_code: SafeInviteCode,
) -> ActixResult<HttpResponse> {
    PARTICIPANT_SERVICE.join_activity(&req, invite_code.0).await
}

pub async fn list_participants(
    req: HttpRequest,
    activity_id: SafeActivityId,
) -> ActixResult<HttpResponse> {
    PARTICIPANT_SERVICE
        .list_participants(&req, activity_id.0)
        .await
}

pub async fn add_participants(
    req: HttpRequest,
    activity_id: SafeActivityId,
    add_data: web::Json<AddParticipantsRequest>,
) -> ActixResult<HttpResponse> {
    PARTICIPANT_SERVICE
        .add_participants(&req, activity_id.0, add_data.into_inner())
        .await
}

pub async fn remove_participant(
    req: HttpRequest,
    activity_id: SafeActivityId,
    user_id: SafeUserId,
) -> ActixResult<HttpResponse> {
    PARTICIPANT_SERVICE
        .remove_participant(&req, activity_id.0, user_id.0)
        .await
}

// 配置路由
pub fn configure_participants_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/activities/{activity_id}/invite-link")
            .wrap(middlewares::RequireActivityHost)
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(get_or_create_invite_link)),
    )
    .service(
        web::scope("/api/v1/activities/{activity_id}/participants")
            // 仅主持人可管理参与者
            .wrap(middlewares::RequireActivityHost)
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_participants))
                    .route(web::post().to(add_participants)),
            )
            .service(
                web::resource("/{user_id}").route(web::delete().to(remove_participant)),
            ),
    )
    .service(
        web::scope("/api/v1/invites")
            // 先认证，再按用户限流
            .wrap(middlewares::RateLimit::join())
            .wrap(middlewares::RequireJWT)
            .route("/{invite_code}/join", web::post().to(join_activity)),
    );
}
