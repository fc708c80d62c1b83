pub mod add;
pub mod invite;
pub mod join;
pub mod list;
pub mod remove;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::participants::requests::AddParticipantsRequest;
use crate::storage::Storage;

pub struct ParticipantService {
    storage: Option<Arc<dyn Storage>>,
}

impl ParticipantService {
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

    // 获取或创建活动的邀请链接
    pub async fn get_or_create_invite_link(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        invite::get_or_create_invite_link(self, request, activity_id).await
    }

    // 通过邀请码加入活动
    pub async fn join_activity(
        &self,
        request: &HttpRequest,
        invite_code: String,
    ) -> ActixResult<HttpResponse> {
        join::join_activity(self, request, invite_code).await
    }

    pub async fn list_participants(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_participants(self, request, activity_id).await
    }

    // 主持人按邮箱手动添加参与者
    pub async fn add_participants(
        &self,
        request: &HttpRequest,
        activity_id: i64,
        add_data: AddParticipantsRequest,
    ) -> ActixResult<HttpResponse> {
        add::add_participants(self, request, activity_id, add_data).await
    }

    pub async fn remove_participant(
        &self,
        request: &HttpRequest,
        activity_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        remove::remove_participant(self, request, activity_id, user_id).await
    }
}
