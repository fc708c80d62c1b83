//! 数据模型定义
//!
//! 与 `entity` 中的数据库实体分离，这里的类型直接用于 API 的请求与响应。

pub mod activities;
pub mod common;
pub mod evaluations;
pub mod groups;
pub mod participants;
pub mod sessions;
pub mod users;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证授权 2xxx
    Unauthorized = 2001,
    Forbidden = 2003,

    // 用户 3xxx
    UserNotFound = 3004,

    // 活动 4xxx
    ActivityNotFound = 4004,
    ActivityPermissionDenied = 4003,
    ActivityCreationFailed = 4005,
    ActivityUpdateFailed = 4006,
    ActivityDeleteFailed = 4007,
    RubricLocked = 4009,

    // 邀请与报名 5xxx
    InviteLinkInvalid = 5004,
    InviteLinkClosed = 5005,
    ParticipantAlreadyJoined = 5009,
    ParticipantEmailInvalid = 5001,
    ParticipantNotFound = 5014,

    // 场次与分组 6xxx
    SessionNotFound = 6004,
    SessionInvalid = 6001,
    AllocationEmptyRoster = 6010,
    AllocationNotReady = 6011,
    AllocationConflict = 6013,
}
