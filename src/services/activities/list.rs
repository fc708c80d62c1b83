use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::ActivityService;
use crate::middlewares::RequireJWT;
use crate::models::activities::requests::{ActivityListQuery, ActivityQueryParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized_response;

pub async fn list_activities(
    service: &ActivityService,
    request: &HttpRequest,
    query: ActivityQueryParams,
) -> ActixResult<HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);

    let list_query = ActivityListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        created_by: query.mine.unwrap_or(false).then_some(uid),
        search: query.search,
    };

    match storage.list_activities_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Activities retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list activities: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve activities",
                )),
            )
        }
    }
}
