//! 参与者名单解析

use std::collections::HashSet;

use crate::errors::Result;
use crate::models::participants::entities::ParticipantSubmission;
use crate::storage::Storage;

/// 按加入顺序去重，保留每个用户第一次出现的位置
pub fn dedupe_roster(submissions: &[ParticipantSubmission]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(submissions.len());
    submissions
        .iter()
        .filter(|s| seen.insert(s.user_id))
        .map(|s| s.user_id)
        .collect()
}

/// 读取活动当前的参与者ID列表
///
/// 空列表是合法结果，由调用方决定如何处理。
pub async fn resolve_roster(storage: &dyn Storage, activity_id: i64) -> Result<Vec<i64>> {
    let submissions = storage.list_participants(activity_id).await?;
    Ok(dedupe_roster(&submissions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::participants::entities::JoinedVia;

    fn submission(id: i64, user_id: i64) -> ParticipantSubmission {
        ParticipantSubmission {
            id,
            activity_id: 1,
            user_id,
            joined_via: JoinedVia::Link,
            joined_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let submissions = vec![
            submission(1, 30),
            submission(2, 10),
            submission(3, 30),
            submission(4, 20),
            submission(5, 10),
        ];
        assert_eq!(dedupe_roster(&submissions), vec![30, 10, 20]);
    }

    #[test]
    fn test_dedupe_empty() {
        assert!(dedupe_roster(&[]).is_empty());
    }
}
