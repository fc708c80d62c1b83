use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ParticipantService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn remove_participant(
    service: &ParticipantService,
    request: &HttpRequest,
    activity_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.remove_participant(activity_id, user_id).await {
        Ok(true) => {
            info!("User {} removed from activity {}", user_id, activity_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Participant removed successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ParticipantNotFound,
            "Participant not found in this activity",
        ))),
        Err(e) => {
            error!(
                "Failed to remove user {} from activity {}: {}",
                user_id, activity_id, e
            );
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to remove participant",
                )),
            )
        }
    }
}
