use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ActivityService;
use crate::middlewares::RequireJWT;
use crate::models::activities::requests::CreateActivityRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized_response;
use crate::utils::validate::{validate_activity_name, validate_max_marks, validate_rubric_criteria};

pub async fn create_activity(
    service: &ActivityService,
    request: &HttpRequest,
    activity_data: CreateActivityRequest,
) -> ActixResult<HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    if let Err(msg) = validate_create_request(&activity_data) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            msg,
        )));
    }

    let storage = service.get_storage(request);
    match storage.create_activity(uid, activity_data).await {
        Ok(detail) => {
            info!(
                "Activity {} ({}) created by user {}",
                detail.activity.id, detail.activity.activity_name, uid
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(detail, "Activity created successfully")))
        }
        Err(e) => {
            error!("Activity creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ActivityCreationFailed,
                    "Activity creation failed",
                )),
            )
        }
    }
}

fn validate_create_request(req: &CreateActivityRequest) -> Result<(), &'static str> {
    validate_activity_name(&req.activity_name)?;
    if let Some(metadata) = &req.metadata
        && !metadata.is_object()
    {
        return Err("metadata must be a JSON object");
    }
    if let Some(criteria) = &req.rubric_criteria {
        validate_rubric_criteria(criteria)?;
    }
    if let Some(max_marks) = &req.max_marks {
        validate_max_marks(max_marks)?;
    }
    Ok(())
}
