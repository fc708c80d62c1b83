use serde::Deserialize;

// 根据外部身份同步本地用户（按 uuid upsert）
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertUserRequest {
    pub uuid: String,
    pub username: String,
    pub email: String,
}
