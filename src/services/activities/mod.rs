pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod rubric;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::activities::requests::{
    ActivityQueryParams, CreateActivityRequest, UpdateActivityRequest, UpdateRubricRequest,
};
use crate::storage::Storage;

pub struct ActivityService {
    storage: Option<Arc<dyn Storage>>,
}

impl ActivityService {
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

    pub async fn create_activity(
        &self,
        request: &HttpRequest,
        activity_data: CreateActivityRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_activity(self, request, activity_data).await
    }

    // 获取活动列表，mine=true 时只返回自己创建的
    pub async fn list_activities(
        &self,
        request: &HttpRequest,
        query: ActivityQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_activities(self, request, query).await
    }

    // 活动详情（含评分标准）
    pub async fn get_activity(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_activity(self, request, activity_id).await
    }

    pub async fn update_activity(
        &self,
        request: &HttpRequest,
        activity_id: i64,
        update_data: UpdateActivityRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_activity(self, request, activity_id, update_data).await
    }

    // 已有会话的活动不允许修改评分标准
    pub async fn update_rubric(
        &self,
        request: &HttpRequest,
        activity_id: i64,
        rubric_data: UpdateRubricRequest,
    ) -> ActixResult<HttpResponse> {
        rubric::update_rubric(self, request, activity_id, rubric_data).await
    }

    pub async fn delete_activity(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_activity(self, request, activity_id).await
    }
}
