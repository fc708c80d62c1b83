use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::ParticipantService;
use crate::models::participants::responses::ParticipantListResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_participants(
    service: &ParticipantService,
    request: &HttpRequest,
    activity_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_participants_with_users(activity_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ParticipantListResponse {
                total: items.len() as i64,
                items,
            },
            "Participants retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list participants of activity {}: {}", activity_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve participants",
                )),
            )
        }
    }
}
