use super::entities::Group;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct AllocationResponse {
    pub session_id: i64,
    pub allocation_version: i64,
    pub groups: Vec<Group>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct FinalizeResponse {
    pub session_id: i64,
    pub groups: Vec<Group>,
    pub evaluations_created: u64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupListResponse {
    pub items: Vec<Group>,
}
