use super::entities::EvaluationType;
use serde::Deserialize;
use ts_rs::TS;

// 排期会话请求，时间为 RFC 3339 字符串
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "session.ts")]
pub struct ScheduleSessionRequest {
    pub start_time: String,
    pub end_time: String,
    pub evaluation_type: EvaluationType,
    pub group_size: i32,
}

// 存储层使用的新会话
#[derive(Debug, Clone)]
pub struct NewSession {
    pub activity_id: i64,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub evaluation_type: EvaluationType,
    pub group_size: i32,
    pub total_students: i32,
}

impl NewSession {
    /// 向下取整的分钟数
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}
