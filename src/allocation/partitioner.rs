//! 小组切分

use rand::Rng;
use rand::seq::SliceRandom;

use crate::errors::{PeerEvalError, Result};

/// 尚未持久化的小组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionedGroup {
    pub group_name: String,
    pub members: Vec<i64>,
}

/// 打乱参与者后按 `group_size` 顺序切分
///
/// 最后一组容纳余数，不做均衡。小组按位置命名为 "Group 1"、"Group 2"……
pub fn partition<R: Rng + ?Sized>(
    participant_ids: &[i64],
    group_size: i32,
    rng: &mut R,
) -> Result<Vec<PartitionedGroup>> {
    if group_size <= 0 {
        return Err(PeerEvalError::invalid_argument(format!(
            "Group size must be a positive integer, got {group_size}"
        )));
    }

    let mut shuffled = participant_ids.to_vec();
    shuffled.shuffle(rng);

    Ok(shuffled
        .chunks(group_size as usize)
        .enumerate()
        .map(|(i, chunk)| PartitionedGroup {
            group_name: format!("Group {}", i + 1),
            members: chunk.to_vec(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_partition_covers_roster() {
        let ids: Vec<i64> = (1..=11).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let groups = partition(&ids, 3, &mut rng).unwrap();

        assert_eq!(groups.len(), 4);
        for group in &groups[..groups.len() - 1] {
            assert_eq!(group.members.len(), 3);
        }
        assert_eq!(groups.last().unwrap().members.len(), 2);

        let mut all: Vec<i64> = groups.iter().flat_map(|g| g.members.clone()).collect();
        all.sort_unstable();
        assert_eq!(all, ids);
    }

    #[test]
    fn test_partition_names_are_positional() {
        let ids = [1, 2, 3, 4];
        let mut rng = StdRng::seed_from_u64(1);
        let groups = partition(&ids, 2, &mut rng).unwrap();
        let names: Vec<&str> = groups.iter().map(|g| g.group_name.as_str()).collect();
        assert_eq!(names, vec!["Group 1", "Group 2"]);
    }

    #[test]
    fn test_partition_seeded_is_deterministic() {
        let ids: Vec<i64> = (1..=20).collect();
        let a = partition(&ids, 4, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = partition(&ids, 4, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_partition_rejects_non_positive_size() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(partition(&[1, 2], 0, &mut rng).is_err());
        let err = partition(&[1, 2], -3, &mut rng).unwrap_err();
        assert_eq!(err.code(), "E014");
    }

    #[test]
    fn test_partition_empty_roster() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(partition(&[], 3, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_partition_size_larger_than_roster() {
        let mut rng = StdRng::seed_from_u64(0);
        let groups = partition(&[5, 6, 7], 10, &mut rng).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 3);
    }
}
