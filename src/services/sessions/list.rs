use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{SessionService, resolve_viewer};
use crate::middlewares::RequireJWT;
use crate::models::sessions::responses::SessionListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized_response;

pub async fn list_sessions(
    service: &SessionService,
    request: &HttpRequest,
    activity_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);
    if let Err(resp) = resolve_viewer(&storage, activity_id, uid).await {
        return Ok(resp);
    }

    match storage.list_sessions_by_activity(activity_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SessionListResponse { items },
            "Sessions retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list sessions of activity {}: {}", activity_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve sessions",
                )),
            )
        }
    }
}
