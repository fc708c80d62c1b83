use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ActivityService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_activity(
    service: &ActivityService,
    request: &HttpRequest,
    activity_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_activity(activity_id).await {
        Ok(true) => {
            info!("Activity {} deleted", activity_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Activity deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ActivityNotFound,
            "Activity not found",
        ))),
        Err(e) => {
            error!("Failed to delete activity {}: {}", activity_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ActivityDeleteFailed,
                    "Activity deletion failed",
                )),
            )
        }
    }
}
