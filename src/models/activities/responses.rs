use super::entities::Activity;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 活动列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct ActivityListResponse {
    pub items: Vec<Activity>,
    pub pagination: PaginationInfo,
}
