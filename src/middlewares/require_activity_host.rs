/*!
 * 活动主持人访问控制中间件
 *
 * 必须在 RequireJWT 之后使用。读取路径中的 `{activity_id}`，
 * 活动不存在返回 404，当前用户不是创建者返回 403，
 * 通过后将 `Activity` 放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/activities")
 *     .wrap(RequireJWT)
 *     .service(
 *         web::resource("/{activity_id}")
 *             .route(web::patch().to(update_activity).wrap(RequireActivityHost)),
 *     )
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error};

use crate::{
    models::{ErrorCode, activities::entities::Activity, users::entities::User},
    storage::Storage,
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireActivityHost;

impl<S, B> Transform<S, ServiceRequest> for RequireActivityHost
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireActivityHostMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireActivityHostMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireActivityHostMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireActivityHostMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            // 1. 校验用户信息
            let user_id = req.extensions().get::<User>().map(|u| u.id);
            let Some(user_id) = user_id else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Unauthorized: missing user",
                    )
                    .map_into_right_body(),
                ));
            };

            // 2. 校验 activity_id
            let activity_id = req
                .match_info()
                .get("activity_id")
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|id| *id > 0);
            let Some(activity_id) = activity_id else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::BadRequest,
                        "Missing or invalid activity_id",
                    )
                    .map_into_right_body(),
                ));
            };

            // 3. 查询活动
            let activity = match load_activity(&req, activity_id).await {
                Ok(Some(activity)) => activity,
                Ok(None) => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::NOT_FOUND,
                            ErrorCode::ActivityNotFound,
                            "Activity not found",
                        )
                        .map_into_right_body(),
                    ));
                }
                Err(msg) => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            &msg,
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            // 4. 只有创建者可以管理活动
            if activity.created_by != user_id {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::ActivityPermissionDenied,
                        "Only the activity creator can perform this action",
                    )
                    .map_into_right_body(),
                ));
            }

            debug!("User {} is host of activity {}", user_id, activity_id);
            req.extensions_mut().insert(activity);
            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

impl RequireActivityHost {
    /// 从请求扩展中提取已校验的活动
    pub fn extract_activity(req: &actix_web::HttpRequest) -> Option<Activity> {
        req.extensions().get::<Activity>().cloned()
    }
}

async fn load_activity(req: &ServiceRequest, activity_id: i64) -> Result<Option<Activity>, String> {
    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| "Storage not configured".to_string())?
        .get_ref()
        .clone();

    storage.get_activity_by_id(activity_id).await.map_err(|e| {
        error!("Failed to load activity {}: {}", activity_id, e);
        "Failed to load activity".to_string()
    })
}
