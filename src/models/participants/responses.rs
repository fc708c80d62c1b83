use super::entities::{Participant, ParticipantSubmission};
use serde::Serialize;
use ts_rs::TS;

// 邀请链接响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "participant.ts")]
pub struct InviteLinkResponse {
    pub invite_link: String,
    pub invite_code: String,
    // 本次请求是否新建了链接
    pub created: bool,
}

// 手动添加参与者响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "participant.ts")]
pub struct AddParticipantsResponse {
    pub added: Vec<ParticipantSubmission>,
    // 已经在活动中的用户
    pub skipped_user_ids: Vec<i64>,
}

// 邮箱校验失败响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "participant.ts")]
pub struct InvalidEmailsResponse {
    pub invalid_emails: Vec<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "participant.ts")]
pub struct ParticipantListResponse {
    pub total: i64,
    pub items: Vec<Participant>,
}
