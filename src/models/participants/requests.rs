use serde::Deserialize;
use ts_rs::TS;

// 手动添加参与者请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "participant.ts")]
pub struct AddParticipantsRequest {
    pub participant_emails: Vec<String>,
}
