use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

// 创建活动时的身份
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "activity.ts")]
pub enum ActivityRole {
    Host,        // 主持人
    Participant, // 参与者
}

impl ActivityRole {
    pub const HOST: &'static str = "host";
    pub const PARTICIPANT: &'static str = "participant";
}

impl std::fmt::Display for ActivityRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityRole::Host => write!(f, "{}", ActivityRole::HOST),
            ActivityRole::Participant => write!(f, "{}", ActivityRole::PARTICIPANT),
        }
    }
}

impl std::str::FromStr for ActivityRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ActivityRole::HOST => Ok(ActivityRole::Host),
            ActivityRole::PARTICIPANT => Ok(ActivityRole::Participant),
            _ => Err(format!("Invalid activity role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct Activity {
    // 活动ID
    pub id: i64,
    // 活动名称
    pub activity_name: String,
    // 创建者ID
    pub created_by: i64,
    // 创建时的身份
    pub created_with_role: ActivityRole,
    // 自定义元数据（JSON 对象）
    pub metadata: Value,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 评分标准
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct Rubric {
    pub id: i64,
    pub activity_id: i64,
    // 评分项
    pub criteria: Vec<String>,
    // 各评分项满分，形如 {"clarity": 10}
    pub max_marks: Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 活动详情（含评分标准）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct ActivityDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub activity: Activity,
    pub rubric: Option<Rubric>,
}
