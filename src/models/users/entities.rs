use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 本地用户，身份由外部认证服务签发
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct User {
    // 用户ID
    pub id: i64,
    // 外部身份服务中的用户标识 (JWT sub)
    pub uuid: String,
    // 用户名
    pub username: String,
    // 邮箱
    pub email: String,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
