use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 会话状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "session.ts")]
pub enum SessionStatus {
    Pending,   // 待分组
    Active,    // 已定稿，评价进行中
    Completed, // 已结束
}

impl SessionStatus {
    pub const PENDING: &'static str = "pending";
    pub const ACTIVE: &'static str = "active";
    pub const COMPLETED: &'static str = "completed";

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => Self::PENDING,
            SessionStatus::Active => Self::ACTIVE,
            SessionStatus::Completed => Self::COMPLETED,
        }
    }

    /// 定稿之后不可再回退
    pub fn is_finalized(&self) -> bool {
        !matches!(self, SessionStatus::Pending)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SessionStatus::PENDING => Ok(SessionStatus::Pending),
            SessionStatus::ACTIVE => Ok(SessionStatus::Active),
            SessionStatus::COMPLETED => Ok(SessionStatus::Completed),
            _ => Err(format!("Invalid session status: {s}")),
        }
    }
}

// 评价拓扑
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "session.ts")]
pub enum EvaluationType {
    WithinGroup,  // 组内互评
    GroupToGroup, // 组间环形互评
    AnyToAny,     // 全员互评
}

impl EvaluationType {
    pub const WITHIN_GROUP: &'static str = "within_group";
    pub const GROUP_TO_GROUP: &'static str = "group_to_group";
    pub const ANY_TO_ANY: &'static str = "any_to_any";

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationType::WithinGroup => Self::WITHIN_GROUP,
            EvaluationType::GroupToGroup => Self::GROUP_TO_GROUP,
            EvaluationType::AnyToAny => Self::ANY_TO_ANY,
        }
    }
}

impl std::fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EvaluationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            EvaluationType::WITHIN_GROUP => Ok(EvaluationType::WithinGroup),
            EvaluationType::GROUP_TO_GROUP => Ok(EvaluationType::GroupToGroup),
            EvaluationType::ANY_TO_ANY => Ok(EvaluationType::AnyToAny),
            _ => Err(format!("Invalid evaluation type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "session.ts")]
pub struct Session {
    pub id: i64,
    pub activity_id: i64,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    // 时长（分钟）
    pub duration: i64,
    pub status: SessionStatus,
    pub evaluation_type: EvaluationType,
    pub group_size: i32,
    // 排期时的参与人数快照
    pub total_students: i32,
    // 每次成功分组后递增，用于并发控制
    pub allocation_version: i64,
    pub scheduled_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
