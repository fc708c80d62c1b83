use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评价状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "evaluation.ts")]
pub enum EvaluationStatus {
    Pending,
    Completed,
}

impl EvaluationStatus {
    pub const PENDING: &'static str = "pending";
    pub const COMPLETED: &'static str = "completed";

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationStatus::Pending => Self::PENDING,
            EvaluationStatus::Completed => Self::COMPLETED,
        }
    }
}

impl std::str::FromStr for EvaluationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            EvaluationStatus::PENDING => Ok(EvaluationStatus::Pending),
            EvaluationStatus::COMPLETED => Ok(EvaluationStatus::Completed),
            _ => Err(format!("Invalid evaluation status: {s}")),
        }
    }
}

// 一条有向评价：evaluator -> evaluatee
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct Evaluation {
    pub id: i64,
    pub activity_id: i64,
    pub session_id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    // 全员互评时为空
    pub group_id: Option<i64>,
    pub marks: f64,
    pub status: EvaluationStatus,
    pub is_submitted: bool,
    pub is_reviewed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
