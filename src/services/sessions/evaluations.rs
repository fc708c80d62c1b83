use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{SessionService, Viewer, load_visible_session};
use crate::middlewares::RequireJWT;
use crate::models::evaluations::requests::{EvaluationListQuery, EvaluationQueryParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized_response;

pub async fn list_evaluations(
    service: &SessionService,
    request: &HttpRequest,
    session_id: i64,
    query: EvaluationQueryParams,
) -> ActixResult<HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);
    let viewer = match load_visible_session(&storage, session_id, uid).await {
        Ok((_, viewer)) => viewer,
        Err(resp) => return Ok(resp),
    };

    let list_query = EvaluationListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        evaluator_id: evaluator_filter(viewer, uid, query.evaluator_id),
    };

    match storage
        .list_evaluations_with_pagination(session_id, list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Evaluations retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list evaluations of session {}: {}", session_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve evaluations",
                )),
            )
        }
    }
}

// 参与者只能查看自己作为评价人的记录
fn evaluator_filter(viewer: Viewer, uid: i64, requested: Option<i64>) -> Option<i64> {
    match viewer {
        Viewer::Host => requested,
        Viewer::Participant => Some(uid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluator_filter() {
        assert_eq!(evaluator_filter(Viewer::Host, 1, None), None);
        assert_eq!(evaluator_filter(Viewer::Host, 1, Some(7)), Some(7));
        assert_eq!(evaluator_filter(Viewer::Participant, 3, None), Some(3));
        assert_eq!(evaluator_filter(Viewer::Participant, 3, Some(7)), Some(3));
    }
}
