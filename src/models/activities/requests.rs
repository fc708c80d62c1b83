use super::entities::ActivityRole;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use serde_json::Value;
use ts_rs::TS;

// 活动查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct ActivityQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    // 仅列出自己创建的活动
    pub mine: Option<bool>,
}

// 创建活动请求
//
// rubric_criteria 非空时同时创建评分标准
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct CreateActivityRequest {
    pub activity_name: String,
    pub created_with_role: Option<ActivityRole>,
    pub metadata: Option<Value>,
    pub rubric_criteria: Option<Vec<String>>,
    pub max_marks: Option<Value>,
}

// 更新活动请求（仅名称与元数据）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct UpdateActivityRequest {
    pub activity_name: Option<String>,
    pub metadata: Option<Value>,
}

// 更新评分标准请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct UpdateRubricRequest {
    pub rubric_criteria: Option<Vec<String>>,
    pub max_marks: Option<Value>,
}

// 活动列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ActivityListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub created_by: Option<i64>,
    pub search: Option<String>,
}
