use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::{error, info};

use super::SessionService;
use crate::errors::{PeerEvalError, Result};
use crate::models::sessions::requests::{NewSession, ScheduleSessionRequest};
use crate::models::{ApiResponse, ErrorCode};

pub async fn schedule_session(
    service: &SessionService,
    request: &HttpRequest,
    activity_id: i64,
    session_data: ScheduleSessionRequest,
) -> ActixResult<HttpResponse> {
    let max_group_size = service.get_config().allocation.max_group_size;

    let (start_time, end_time) =
        match validate_schedule(&session_data, max_group_size) {
            Ok(times) => times,
            Err(e) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::SessionInvalid,
                    e.message(),
                )));
            }
        };

    let storage = service.get_storage(request);

    // 排期时记录当前参与人数快照
    let total_students = match storage.count_participants(activity_id).await {
        Ok(count) => count as i32,
        Err(e) => {
            error!("Failed to count participants of activity {}: {}", activity_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to count participants",
                )),
            );
        }
    };

    let new_session = NewSession {
        activity_id,
        start_time,
        end_time,
        evaluation_type: session_data.evaluation_type,
        group_size: session_data.group_size,
        total_students,
    };

    match storage.create_session(new_session).await {
        Ok(session) => {
            info!(
                "Session {} scheduled for activity {} ({}, group size {})",
                session.id, activity_id, session.evaluation_type, session.group_size
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(session, "Session scheduled successfully")))
        }
        Err(e) => {
            error!("Failed to schedule session for activity {}: {}", activity_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to schedule session",
                )),
            )
        }
    }
}

fn validate_schedule(
    req: &ScheduleSessionRequest,
    max_group_size: i32,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = DateTime::parse_from_rfc3339(req.start_time.trim())?.with_timezone(&Utc);
    let end = DateTime::parse_from_rfc3339(req.end_time.trim())?.with_timezone(&Utc);

    if end <= start {
        return Err(PeerEvalError::validation(
            "end_time must be after start_time",
        ));
    }
    if req.group_size < 1 {
        return Err(PeerEvalError::validation("group_size must be at least 1"));
    }
    if req.group_size > max_group_size {
        return Err(PeerEvalError::validation(format!(
            "group_size must not exceed {max_group_size}"
        )));
    }

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sessions::entities::EvaluationType;

    fn request(start: &str, end: &str, group_size: i32) -> ScheduleSessionRequest {
        ScheduleSessionRequest {
            start_time: start.to_string(),
            end_time: end.to_string(),
            evaluation_type: EvaluationType::WithinGroup,
            group_size,
        }
    }

    #[test]
    fn test_valid_schedule() {
        let req = request("2025-03-01T09:00:00Z", "2025-03-01T10:30:00+00:00", 4);
        let (start, end) = validate_schedule(&req, 100).unwrap();
        assert_eq!((end - start).num_minutes(), 90);
    }

    #[test]
    fn test_end_before_start() {
        let req = request("2025-03-01T10:00:00Z", "2025-03-01T09:00:00Z", 4);
        assert!(matches!(
            validate_schedule(&req, 100),
            Err(PeerEvalError::Validation(_))
        ));
    }

    #[test]
    fn test_group_size_bounds() {
        let start = "2025-03-01T09:00:00Z";
        let end = "2025-03-01T10:00:00Z";
        assert!(validate_schedule(&request(start, end, 0), 100).is_err());
        assert!(validate_schedule(&request(start, end, 101), 100).is_err());
        assert!(validate_schedule(&request(start, end, 100), 100).is_ok());
    }

    #[test]
    fn test_bad_date_format() {
        let req = request("yesterday", "2025-03-01T10:00:00Z", 2);
        assert!(matches!(
            validate_schedule(&req, 100),
            Err(PeerEvalError::DateParse(_))
        ));
    }
}
