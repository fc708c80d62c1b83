use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::ParticipantService;
use crate::models::participants::entities::JoinedVia;
use crate::models::participants::requests::AddParticipantsRequest;
use crate::models::participants::responses::{AddParticipantsResponse, InvalidEmailsResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_email;

pub async fn add_participants(
    service: &ParticipantService,
    request: &HttpRequest,
    activity_id: i64,
    add_data: AddParticipantsRequest,
) -> ActixResult<HttpResponse> {
    let (emails, mut invalid_emails) = normalize_emails(&add_data.participant_emails);

    if emails.is_empty() && invalid_emails.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "participant_emails must not be empty",
        )));
    }

    let storage = service.get_storage(request);

    let users = match storage.get_users_by_emails(&emails).await {
        Ok(users) => users,
        Err(e) => {
            error!("Failed to look up users by email: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to look up users",
                )),
            );
        }
    };

    // 邮箱合法但没有对应用户，同样视为无效
    let known: HashSet<String> = users.iter().map(|u| u.email.to_lowercase()).collect();
    invalid_emails.extend(emails.iter().filter(|e| !known.contains(*e)).cloned());

    if !invalid_emails.is_empty() {
        warn!(
            "Rejected manual enrollment for activity {}: {} invalid email(s)",
            activity_id,
            invalid_emails.len()
        );
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
            ErrorCode::ParticipantEmailInvalid,
            InvalidEmailsResponse { invalid_emails },
            "Some emails are invalid or not registered",
        )));
    }

    let enrolled: HashSet<i64> = match storage.list_participants(activity_id).await {
        Ok(list) => list.into_iter().map(|p| p.user_id).collect(),
        Err(e) => {
            error!("Failed to list participants of activity {}: {}", activity_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve participants",
                )),
            );
        }
    };

    let (skipped_user_ids, to_add): (Vec<i64>, Vec<i64>) = users
        .iter()
        .map(|u| u.id)
        .partition(|id| enrolled.contains(id));

    match storage
        .add_participants(activity_id, &to_add, JoinedVia::Manual)
        .await
    {
        Ok(added) => {
            info!(
                "Added {} participant(s) to activity {}, skipped {}",
                added.len(),
                activity_id,
                skipped_user_ids.len()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                AddParticipantsResponse {
                    added,
                    skipped_user_ids,
                },
                "Participants added successfully",
            )))
        }
        Err(e) => {
            error!("Failed to add participants to activity {}: {}", activity_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to add participants",
                )),
            )
        }
    }
}

/// 去空白、转小写并去重，返回 (合法邮箱, 格式错误的原始输入)
fn normalize_emails(raw: &[String]) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut valid = Vec::new();
    let mut invalid = Vec::new();

    for email in raw {
        let normalized = email.trim().to_lowercase();
        if validate_email(&normalized).is_err() {
            invalid.push(email.clone());
        } else if seen.insert(normalized.clone()) {
            valid.push(normalized);
        }
    }

    (valid, invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_emails() {
        let raw = vec![
            " Alice@Example.com ".to_string(),
            "alice@example.com".to_string(),
            "bob@example.com".to_string(),
            "not-an-email".to_string(),
        ];
        let (valid, invalid) = normalize_emails(&raw);
        assert_eq!(valid, vec!["alice@example.com", "bob@example.com"]);
        assert_eq!(invalid, vec!["not-an-email"]);
    }

    #[test]
    fn test_normalize_emails_empty() {
        let (valid, invalid) = normalize_emails(&[]);
        assert!(valid.is_empty());
        assert!(invalid.is_empty());
    }
}
