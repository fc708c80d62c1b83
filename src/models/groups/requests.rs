use serde::Deserialize;
use ts_rs::TS;

// 分组动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationAction {
    Allocate,
    Finalize,
}

impl std::str::FromStr for AllocationAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allocate" => Ok(AllocationAction::Allocate),
            "finalize" => Ok(AllocationAction::Finalize),
            _ => Err(format!("Invalid action: {s}")),
        }
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupAllocationQuery {
    pub action: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupAllocationRequest {
    pub session_id: Option<i64>,
}
