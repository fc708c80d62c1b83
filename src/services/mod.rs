pub mod activities;
pub mod auth;
pub mod group_allocation;
pub mod participants;
pub mod sessions;

pub use activities::ActivityService;
pub use auth::AuthService;
pub use group_allocation::GroupAllocationService;
pub use participants::ParticipantService;
pub use sessions::SessionService;

use actix_web::{HttpResponse, http::StatusCode};
use tracing::{error, warn};

use crate::errors::PeerEvalError;
use crate::models::{ApiResponse, ErrorCode};

/// 错误类型对应的 HTTP 状态与通用错误码
pub(crate) fn error_status(err: &PeerEvalError) -> (StatusCode, ErrorCode) {
    match err {
        PeerEvalError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        PeerEvalError::Validation(_) | PeerEvalError::DateParse(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed)
        }
        PeerEvalError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
        PeerEvalError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        PeerEvalError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
        PeerEvalError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
        ),
    }
}

/// 业务错误转为统一响应
pub(crate) fn error_response(err: &PeerEvalError) -> HttpResponse {
    let (status, code) = error_status(err);
    respond(err, status, code)
}

/// 同上，但 4xx 使用指定的业务错误码
pub(crate) fn error_response_with(err: &PeerEvalError, code: ErrorCode) -> HttpResponse {
    let (status, default_code) = error_status(err);
    if status.is_server_error() {
        respond(err, status, default_code)
    } else {
        respond(err, status, code)
    }
}

fn respond(err: &PeerEvalError, status: StatusCode, code: ErrorCode) -> HttpResponse {
    if status.is_server_error() {
        error!("{}", err);
        // 不向客户端暴露存储细节
        return HttpResponse::build(status).json(ApiResponse::error_empty(
            code,
            "Internal server error",
        ));
    }
    warn!("{}", err);
    HttpResponse::build(status).json(ApiResponse::error_empty(code, err.message()))
}

pub(crate) fn unauthorized_response() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized: missing user id",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&PeerEvalError::not_found("x")).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&PeerEvalError::validation("x")).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&PeerEvalError::authorization("x")).0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            error_status(&PeerEvalError::authentication("x")).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_status(&PeerEvalError::conflict("x")).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&PeerEvalError::database_operation("x")).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_with_keeps_server_errors() {
        let resp = error_response_with(
            &PeerEvalError::database_connection("down"),
            ErrorCode::AllocationConflict,
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = error_response_with(
            &PeerEvalError::conflict("already finalized"),
            ErrorCode::AllocationConflict,
        );
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
