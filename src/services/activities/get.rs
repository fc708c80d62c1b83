use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::ActivityService;
use crate::models::activities::entities::ActivityDetail;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_activity(
    service: &ActivityService,
    request: &HttpRequest,
    activity_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let activity = match storage.get_activity_by_id(activity_id).await {
        Ok(Some(activity)) => activity,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ActivityNotFound,
                "Activity not found",
            )));
        }
        Err(e) => {
            error!("Failed to get activity {}: {}", activity_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve activity",
                )),
            );
        }
    };

    match storage.get_rubric_by_activity_id(activity_id).await {
        Ok(rubric) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ActivityDetail { activity, rubric },
            "Activity retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to get rubric for activity {}: {}", activity_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve rubric",
                )),
            )
        }
    }
}
