use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ActivityService;
use crate::models::activities::requests::UpdateActivityRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_activity_name;

pub async fn update_activity(
    service: &ActivityService,
    request: &HttpRequest,
    activity_id: i64,
    update_data: UpdateActivityRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = &update_data.activity_name
        && let Err(msg) = validate_activity_name(name)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            msg,
        )));
    }

    if let Some(metadata) = &update_data.metadata
        && !metadata.is_object()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "metadata must be a JSON object",
        )));
    }

    let storage = service.get_storage(request);
    match storage.update_activity(activity_id, update_data).await {
        Ok(Some(activity)) => {
            info!("Activity {} updated", activity_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                activity,
                "Activity updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ActivityNotFound,
            "Activity not found",
        ))),
        Err(e) => {
            error!("Failed to update activity {}: {}", activity_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ActivityUpdateFailed,
                    "Activity update failed",
                )),
            )
        }
    }
}
