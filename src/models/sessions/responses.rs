use super::entities::Session;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "session.ts")]
pub struct SessionListResponse {
    pub items: Vec<Session>,
}
