use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::User;

// 加入方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "participant.ts")]
pub enum JoinedVia {
    Link,   // 通过邀请链接
    Manual, // 主持人手动添加
}

impl JoinedVia {
    pub const LINK: &'static str = "link";
    pub const MANUAL: &'static str = "manual";
}

impl std::fmt::Display for JoinedVia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinedVia::Link => write!(f, "{}", JoinedVia::LINK),
            JoinedVia::Manual => write!(f, "{}", JoinedVia::MANUAL),
        }
    }
}

impl std::str::FromStr for JoinedVia {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            JoinedVia::LINK => Ok(JoinedVia::Link),
            JoinedVia::MANUAL => Ok(JoinedVia::Manual),
            _ => Err(format!("Invalid joined_via value: {s}")),
        }
    }
}

// 参与记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "participant.ts")]
pub struct ParticipantSubmission {
    pub id: i64,
    pub activity_id: i64,
    pub user_id: i64,
    pub joined_via: JoinedVia,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

// 参与记录及用户信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "participant.ts")]
pub struct Participant {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: ParticipantSubmission,
    pub user: Option<User>,
}

// 邀请链接
//
// invite_code 为 None 表示链接已在定稿时作废
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "participant.ts")]
pub struct InviteLink {
    pub id: i64,
    pub activity_id: i64,
    pub invite_code: Option<String>,
    pub shared_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub closed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl InviteLink {
    pub fn is_open(&self) -> bool {
        self.invite_code.as_deref().is_some_and(|c| !c.is_empty())
    }
}
