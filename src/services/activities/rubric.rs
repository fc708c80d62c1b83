use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde_json::Value;
use tracing::{error, info, warn};

use super::ActivityService;
use crate::models::activities::requests::UpdateRubricRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_max_marks, validate_rubric_criteria};

pub async fn update_rubric(
    service: &ActivityService,
    request: &HttpRequest,
    activity_id: i64,
    rubric_data: UpdateRubricRequest,
) -> ActixResult<HttpResponse> {
    if rubric_data.rubric_criteria.is_none() && rubric_data.max_marks.is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Nothing to update: provide rubric_criteria or max_marks",
        )));
    }

    let storage = service.get_storage(request);

    // 一旦排期了会话，评分标准即锁定
    match storage.count_sessions_by_activity(activity_id).await {
        Ok(0) => {}
        Ok(count) => {
            warn!(
                "Rubric update rejected for activity {}: {} session(s) scheduled",
                activity_id, count
            );
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::RubricLocked,
                "Rubric cannot be changed after sessions have been scheduled",
            )));
        }
        Err(e) => {
            error!("Failed to count sessions for activity {}: {}", activity_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to check activity sessions",
                )),
            );
        }
    }

    let existing = match storage.get_rubric_by_activity_id(activity_id).await {
        Ok(existing) => existing,
        Err(e) => {
            error!("Failed to get rubric for activity {}: {}", activity_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve rubric",
                )),
            );
        }
    };

    // 未提供的部分沿用已有值
    let (old_criteria, old_marks) = match existing {
        Some(rubric) => (rubric.criteria, rubric.max_marks),
        None => (Vec::new(), Value::Object(Default::default())),
    };
    let criteria = rubric_data.rubric_criteria.unwrap_or(old_criteria);
    let max_marks = rubric_data.max_marks.unwrap_or(old_marks);

    if let Err(msg) = validate_rubric_criteria(&criteria).and(validate_max_marks(&max_marks)) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            msg,
        )));
    }

    match storage.upsert_rubric(activity_id, criteria, max_marks).await {
        Ok(rubric) => {
            info!("Rubric of activity {} updated", activity_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                rubric,
                "Rubric updated successfully",
            )))
        }
        Err(e) => {
            error!("Failed to update rubric for activity {}: {}", activity_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ActivityUpdateFailed,
                    "Rubric update failed",
                )),
            )
        }
    }
}
