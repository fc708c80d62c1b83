use super::entities::Evaluation;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 评价列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct EvaluationListResponse {
    pub items: Vec<Evaluation>,
    pub pagination: PaginationInfo,
}
