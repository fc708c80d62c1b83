use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::ParticipantService;
use crate::middlewares::RequireJWT;
use crate::models::participants::entities::JoinedVia;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized_response;

pub async fn join_activity(
    service: &ParticipantService,
    request: &HttpRequest,
    invite_code: String,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);

    // 只匹配仍然有效的链接
    let link = match storage.get_invite_link_by_code(&invite_code).await {
        Ok(Some(link)) => link,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::InviteLinkInvalid,
                "Invite link is invalid or has expired",
            )));
        }
        Err(e) => {
            error!("Failed to look up invite code: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to look up invite link",
                )),
            );
        }
    };

    match storage.get_participant(link.activity_id, user_id).await {
        Ok(Some(existing)) => {
            warn!(
                "User {} already joined activity {}",
                user_id, link.activity_id
            );
            return Ok(HttpResponse::Conflict().json(ApiResponse::error(
                ErrorCode::ParticipantAlreadyJoined,
                existing,
                "User has already joined the activity",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Failed to check participant: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to join activity",
                )),
            );
        }
    }

    match storage
        .add_participants(link.activity_id, &[user_id], JoinedVia::Link)
        .await
    {
        Ok(mut added) if !added.is_empty() => {
            info!("User {} joined activity {} via link", user_id, link.activity_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                added.remove(0),
                "Joined activity successfully",
            )))
        }
        Ok(_) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ParticipantAlreadyJoined,
            "User has already joined the activity",
        ))),
        Err(e) => {
            error!("Failed to join activity {}: {}", link.activity_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to join activity",
                )),
            )
        }
    }
}
