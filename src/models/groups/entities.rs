use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评价小组
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct Group {
    pub id: i64,
    pub session_id: i64,
    pub activity_id: i64,
    // "Group N"，按位置编号
    pub group_name: String,
    pub group_members: Vec<i64>,
    pub finalized_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
