use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::activities::requests::{
    ActivityQueryParams, CreateActivityRequest, UpdateActivityRequest, UpdateRubricRequest,
};
use crate::services::ActivityService;
use crate::utils::SafeActivityId;

// 懒加载的全局 ACTIVITY_SERVICE 实例
static ACTIVITY_SERVICE: Lazy<ActivityService> = Lazy::new(ActivityService::new_lazy);

// HTTP处理程序
pub async fn list_activities(
    req: HttpRequest,
    query: web::Query<ActivityQueryParams>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .list_activities(&req, query.into_inner())
        .await
}

pub async fn create_activity(
    req: HttpRequest,
    activity_data: web::Json<CreateActivityRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .create_activity(&req, activity_data.into_inner())
        .await
}

pub async fn get_activity(
    req: HttpRequest,
    activity_id: SafeActivityId,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE.get_activity(&req, activity_id.0).await
}

pub async fn update_activity(
    req: HttpRequest,
    activity_id: SafeActivityId,
    update_data: web::Json<UpdateActivityRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .update_activity(&req, activity_id.0, update_data.into_inner())
        .await
}

pub async fn update_rubric(
    req: HttpRequest,
    activity_id: SafeActivityId,
    rubric_data: web::Json<UpdateRubricRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .update_rubric(&req, activity_id.0, rubric_data.into_inner())
        .await
}

pub async fn delete_activity(
    req: HttpRequest,
    activity_id: SafeActivityId,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE.delete_activity(&req, activity_id.0).await
}

// 配置路由
pub fn configure_activities_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/activities")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_activities))
                    // 创建者即主持人
                    .route(web::post().to(create_activity)),
            )
            .service(
                web::resource("/{activity_id}")
                    .route(web::get().to(get_activity))
                    .route(
                        web::patch()
                            .to(update_activity)
                            .wrap(middlewares::RequireActivityHost),
                    )
                    .route(
                        web::delete()
                            .to(delete_activity)
                            .wrap(middlewares::RequireActivityHost),
                    ),
            )
            .service(
                web::resource("/{activity_id}/rubric").route(
                    web::put()
                        .to(update_rubric)
                        .wrap(middlewares::RequireActivityHost),
                ),
            ),
    );
}
