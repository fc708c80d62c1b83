pub mod evaluations;
pub mod get;
pub mod groups;
pub mod list;
pub mod schedule;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::error;

use crate::config::AppConfig;
use crate::models::evaluations::requests::EvaluationQueryParams;
use crate::models::sessions::entities::Session;
use crate::models::sessions::requests::ScheduleSessionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 调用者相对于活动的身份
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Host,
    Participant,
}

pub struct SessionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SessionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 为活动排期一个互评会话
    pub async fn schedule_session(
        &self,
        request: &HttpRequest,
        activity_id: i64,
        session_data: ScheduleSessionRequest,
    ) -> ActixResult<HttpResponse> {
        schedule::schedule_session(self, request, activity_id, session_data).await
    }

    pub async fn list_sessions(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_sessions(self, request, activity_id).await
    }

    pub async fn get_session(
        &self,
        request: &HttpRequest,
        session_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_session(self, request, session_id).await
    }

    // 当前小组集合
    pub async fn list_groups(
        &self,
        request: &HttpRequest,
        session_id: i64,
    ) -> ActixResult<HttpResponse> {
        groups::list_groups(self, request, session_id).await
    }

    // 评价记录，参与者只能看到自己作为评价人的记录
    pub async fn list_evaluations(
        &self,
        request: &HttpRequest,
        session_id: i64,
        query: EvaluationQueryParams,
    ) -> ActixResult<HttpResponse> {
        evaluations::list_evaluations(self, request, session_id, query).await
    }
}

/// 判断调用者是活动主持人还是参与者，两者都不是则返回 403
pub(crate) async fn resolve_viewer(
    storage: &Arc<dyn Storage>,
    activity_id: i64,
    user_id: i64,
) -> Result<Viewer, HttpResponse> {
    let activity = match storage.get_activity_by_id(activity_id).await {
        Ok(Some(activity)) => activity,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ActivityNotFound,
                "Activity not found",
            )));
        }
        Err(e) => {
            error!("Failed to get activity {}: {}", activity_id, e);
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve activity",
                )),
            );
        }
    };

    if activity.created_by == user_id {
        return Ok(Viewer::Host);
    }

    match storage.get_participant(activity_id, user_id).await {
        Ok(Some(_)) => Ok(Viewer::Participant),
        Ok(None) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ActivityPermissionDenied,
            "You are not a member of this activity",
        ))),
        Err(e) => {
            error!("Failed to check participant {}: {}", user_id, e);
            Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to check activity membership",
                )),
            )
        }
    }
}

/// 读取会话并校验访问权限
pub(crate) async fn load_visible_session(
    storage: &Arc<dyn Storage>,
    session_id: i64,
    user_id: i64,
) -> Result<(Session, Viewer), HttpResponse> {
    let session = match storage.get_session_by_id(session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SessionNotFound,
                "Session not found",
            )));
        }
        Err(e) => {
            error!("Failed to get session {}: {}", session_id, e);
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve session",
                )),
            );
        }
    };

    let viewer = resolve_viewer(storage, session.activity_id, user_id).await?;
    Ok((session, viewer))
}
