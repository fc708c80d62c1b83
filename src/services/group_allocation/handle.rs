use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupAllocationService;
use crate::errors::PeerEvalError;
use crate::middlewares::RequireJWT;
use crate::models::groups::requests::{
    AllocationAction, GroupAllocationQuery, GroupAllocationRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, error_response_with, unauthorized_response};

pub async fn handle_allocation(
    service: &GroupAllocationService,
    request: &HttpRequest,
    query: GroupAllocationQuery,
    body: GroupAllocationRequest,
) -> ActixResult<HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    let action = match parse_action(query.action.as_deref()) {
        Ok(action) => action,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                msg,
            )));
        }
    };

    let Some(session_id) = body.session_id.filter(|id| *id > 0) else {
        return Ok(error_response(&PeerEvalError::validation(
            "session_id is required",
        )));
    };

    let orchestrator = service.get_orchestrator(request);

    match action {
        AllocationAction::Allocate => match orchestrator.allocate(session_id, uid).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Groups allocated successfully",
            ))),
            Err(e) => Ok(error_response_with(&e, allocation_error_code(&e, action))),
        },
        AllocationAction::Finalize => match orchestrator.finalize(session_id, uid).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Groups finalized successfully",
            ))),
            Err(e) => Ok(error_response_with(&e, allocation_error_code(&e, action))),
        },
    }
}

fn parse_action(action: Option<&str>) -> Result<AllocationAction, String> {
    match action.map(str::trim) {
        None | Some("") => Err("Missing action parameter".to_string()),
        Some(action) => action.parse(),
    }
}

fn allocation_error_code(err: &PeerEvalError, action: AllocationAction) -> ErrorCode {
    match (err, action) {
        (PeerEvalError::NotFound(_), _) => ErrorCode::SessionNotFound,
        (PeerEvalError::Authorization(_), _) => ErrorCode::ActivityPermissionDenied,
        (PeerEvalError::Validation(_), AllocationAction::Allocate) => {
            ErrorCode::AllocationEmptyRoster
        }
        (PeerEvalError::Validation(_), AllocationAction::Finalize) => {
            ErrorCode::AllocationNotReady
        }
        (PeerEvalError::Conflict(_), _) => ErrorCode::AllocationConflict,
        (PeerEvalError::InvalidArgument(_), _) => ErrorCode::BadRequest,
        _ => ErrorCode::InternalServerError,
    }
}
