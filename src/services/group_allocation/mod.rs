pub mod handle;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::allocation::AllocationOrchestrator;
use crate::models::groups::requests::{GroupAllocationQuery, GroupAllocationRequest};

pub struct GroupAllocationService {
    orchestrator: Option<Arc<AllocationOrchestrator>>,
}

impl GroupAllocationService {
    pub fn new_lazy() -> Self {
        Self { orchestrator: None }
    }

    pub(crate) fn get_orchestrator(&self, request: &HttpRequest) -> Arc<AllocationOrchestrator> {
        if let Some(orchestrator) = &self.orchestrator {
            orchestrator.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<AllocationOrchestrator>>>()
                .expect("AllocationOrchestrator not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 根据 action 执行分组或定稿
    pub async fn handle_allocation(
        &self,
        request: &HttpRequest,
        query: GroupAllocationQuery,
        body: GroupAllocationRequest,
    ) -> ActixResult<HttpResponse> {
        handle::handle_allocation(self, request, query, body).await
    }
}
