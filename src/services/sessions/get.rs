use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SessionService, load_visible_session};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::services::unauthorized_response;

pub async fn get_session(
    service: &SessionService,
    request: &HttpRequest,
    session_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);
    match load_visible_session(&storage, session_id, uid).await {
        Ok((session, _)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            session,
            "Session retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
