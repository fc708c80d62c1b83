//! 路径参数提取器
//!
//! 只接受正整数 ID，解析失败直接返回 400。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError, http::StatusCode,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_i64(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    req.match_info()
        .get(param)
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            let message = format!("Invalid path parameter: {param}");
            let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
                ErrorCode::BadRequest,
                message.clone(),
            ));
            InternalError::from_response(message, response).into()
        })
}

macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_i64(req, $param).map($name))
            }
        }
    };
}

define_safe_i64_extractor!(SafeActivityId, "activity_id");
define_safe_i64_extractor!(SafeSessionId, "session_id");
define_safe_i64_extractor!(SafeUserId, "user_id");

/// 邀请码路径参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeInviteCode(pub String);

impl FromRequest for SafeInviteCode {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let code = req.match_info().get("invite_code").unwrap_or_default();
        let result = match super::validate::validate_invite_code(code) {
            Ok(()) => Ok(SafeInviteCode(code.to_string())),
            Err(msg) => Err(InternalError::from_response(
                msg,
                HttpResponse::build(StatusCode::NOT_FOUND).json(ApiResponse::<()>::error_empty(
                    ErrorCode::InviteLinkInvalid,
                    msg,
                )),
            )
            .into()),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extracts_positive_id() {
        let req = TestRequest::default()
            .param("session_id", "42")
            .to_http_request();
        let id = SafeSessionId::extract(&req).await.unwrap();
        assert_eq!(id, SafeSessionId(42));
    }

    #[actix_web::test]
    async fn test_rejects_invalid_ids() {
        for raw in ["0", "-1", "abc", "9999999999999999999999"] {
            let req = TestRequest::default()
                .param("activity_id", raw)
                .to_http_request();
            assert!(SafeActivityId::extract(&req).await.is_err(), "{raw}");
        }
    }

    #[actix_web::test]
    async fn test_invite_code_format() {
        let req = TestRequest::default()
            .param("invite_code", "ab12cd34")
            .to_http_request();
        assert_eq!(
            SafeInviteCode::extract(&req).await.unwrap().0,
            "ab12cd34".to_string()
        );

        let req = TestRequest::default()
            .param("invite_code", "BAD CODE")
            .to_http_request();
        assert!(SafeInviteCode::extract(&req).await.is_err());
    }
}
