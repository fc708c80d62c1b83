use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::ParticipantService;
use crate::errors::{PeerEvalError, Result};
use crate::middlewares::RequireJWT;
use crate::models::participants::entities::{InviteLink, JoinedVia};
use crate::models::participants::responses::InviteLinkResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized_response;
use crate::storage::Storage;
use crate::utils::random_code::generate_random_code;

// 邀请码碰撞时的最大重试次数
const MAX_CODE_ATTEMPTS: usize = 5;

pub async fn get_or_create_invite_link(
    service: &ParticipantService,
    request: &HttpRequest,
    activity_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);
    let config = service.get_config();

    let existing = match storage.get_invite_link_by_activity(activity_id).await {
        Ok(link) => link,
        Err(e) => {
            error!("Failed to get invite link for activity {}: {}", activity_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve invite link",
                )),
            );
        }
    };

    match existing {
        Some(link) => match link.invite_code {
            Some(code) if link.closed_at.is_none() && !code.is_empty() => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    InviteLinkResponse {
                        invite_link: config.invite_url(&code),
                        invite_code: code,
                        created: false,
                    },
                    "Invite link retrieved successfully",
                )))
            }
            // 定稿后链接永久关闭
            _ => {
                warn!(
                    "Invite link requested for activity {} after enrollment closed",
                    activity_id
                );
                Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::InviteLinkClosed,
                    "Enrollment for this activity has been closed",
                )))
            }
        },
        None => {
            let code_length = config.invite.code_length.clamp(4, 32);
            match create_link(&storage, activity_id, uid, code_length).await {
                Ok(link) => {
                    let code = link.invite_code.unwrap_or_default();
                    info!("Invite link created for activity {} by {}", activity_id, uid);
                    Ok(HttpResponse::Created().json(ApiResponse::success(
                        InviteLinkResponse {
                            invite_link: config.invite_url(&code),
                            invite_code: code,
                            created: true,
                        },
                        "Invite link created successfully",
                    )))
                }
                Err(e) => {
                    error!("Failed to create invite link for activity {}: {}", activity_id, e);
                    Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            "Failed to create invite link",
                        )),
                    )
                }
            }
        }
    }
}

/// 生成不重复的邀请码并创建链接，创建者未报名时以手动方式加入
async fn create_link(
    storage: &Arc<dyn Storage>,
    activity_id: i64,
    shared_by: i64,
    code_length: usize,
) -> Result<InviteLink> {
    let mut code = None;
    for _ in 0..MAX_CODE_ATTEMPTS {
        let candidate = generate_random_code(code_length);
        if storage.get_invite_link_by_code(&candidate).await?.is_none() {
            code = Some(candidate);
            break;
        }
    }
    let code = code.ok_or_else(|| {
        PeerEvalError::conflict("Failed to generate a unique invite code, please retry")
    })?;

    let link = storage
        .create_invite_link(activity_id, &code, shared_by)
        .await?;

    if storage.get_participant(activity_id, shared_by).await?.is_none() {
        storage
            .add_participants(activity_id, &[shared_by], JoinedVia::Manual)
            .await?;
    }

    Ok(link)
}
