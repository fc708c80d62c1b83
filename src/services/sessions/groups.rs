use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{SessionService, load_visible_session};
use crate::middlewares::RequireJWT;
use crate::models::groups::responses::GroupListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized_response;

pub async fn list_groups(
    service: &SessionService,
    request: &HttpRequest,
    session_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);
    if let Err(resp) = load_visible_session(&storage, session_id, uid).await {
        return Ok(resp);
    }

    match storage.list_groups_by_session(session_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GroupListResponse { items },
            "Groups retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list groups of session {}: {}", session_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve groups",
                )),
            )
        }
    }
}
