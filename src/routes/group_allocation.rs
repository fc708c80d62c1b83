use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::groups::requests::{GroupAllocationQuery, GroupAllocationRequest};
use crate::services::GroupAllocationService;

// 懒加载的全局 GROUP_ALLOCATION_SERVICE 实例
static GROUP_ALLOCATION_SERVICE: Lazy<GroupAllocationService> =
    Lazy::new(GroupAllocationService::new_lazy);

pub async fn handle_allocation(
    req: HttpRequest,
    query: web::Query<GroupAllocationQuery>,
    body: web::Json<GroupAllocationRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_ALLOCATION_SERVICE
        .handle_allocation(&req, query.into_inner(), body.into_inner())
        .await
}

// 配置路由
pub fn configure_group_allocation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/group-allocation")
            .wrap(middlewares::RateLimit::allocation())
            .wrap(middlewares::RequireJWT)
            // ?action=allocate|finalize
            .route("", web::post().to(handle_allocation)),
    );
}
