//! 互评配对生成

use tracing::warn;

use crate::models::groups::entities::Group;
use crate::models::sessions::entities::EvaluationType;

/// 一条待写入的评价分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvaluationPair {
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub group_id: Option<i64>,
}

/// 根据已定稿的小组与评价拓扑生成全部有向评价对
///
/// 任何拓扑下都不会产生自评。
pub fn generate_pairs(groups: &[Group], evaluation_type: EvaluationType) -> Vec<EvaluationPair> {
    match evaluation_type {
        EvaluationType::WithinGroup => within_group(groups),
        EvaluationType::GroupToGroup => {
            if groups.len() == 1 {
                warn!(
                    "Group-to-group evaluation with a single group (id {}), falling back to within-group pairing",
                    groups[0].id
                );
                within_group(groups)
            } else {
                group_to_group(groups)
            }
        }
        EvaluationType::AnyToAny => any_to_any(groups),
    }
}

fn within_group(groups: &[Group]) -> Vec<EvaluationPair> {
    let capacity = groups
        .iter()
        .map(|g| g.group_members.len().saturating_sub(1) * g.group_members.len())
        .sum();
    let mut pairs = Vec::with_capacity(capacity);

    for group in groups {
        push_all_ordered(&mut pairs, &group.group_members, Some(group.id));
    }
    pairs
}

// 小组按持久化顺序成环，第 k 组评价第 k+1 组
fn group_to_group(groups: &[Group]) -> Vec<EvaluationPair> {
    let mut pairs = Vec::new();

    for (k, group) in groups.iter().enumerate() {
        let target = &groups[(k + 1) % groups.len()];
        for &evaluator_id in &group.group_members {
            for &evaluatee_id in &target.group_members {
                if evaluator_id != evaluatee_id {
                    pairs.push(EvaluationPair {
                        evaluator_id,
                        evaluatee_id,
                        group_id: Some(group.id),
                    });
                }
            }
        }
    }
    pairs
}

fn any_to_any(groups: &[Group]) -> Vec<EvaluationPair> {
    let members: Vec<i64> = groups
        .iter()
        .flat_map(|g| g.group_members.iter().copied())
        .collect();

    let mut pairs = Vec::with_capacity(members.len().saturating_sub(1) * members.len());
    push_all_ordered(&mut pairs, &members, None);
    pairs
}

fn push_all_ordered(pairs: &mut Vec<EvaluationPair>, members: &[i64], group_id: Option<i64>) {
    for &evaluator_id in members {
        for &evaluatee_id in members {
            if evaluator_id != evaluatee_id {
                pairs.push(EvaluationPair {
                    evaluator_id,
                    evaluatee_id,
                    group_id,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const A: i64 = 1;
    const B: i64 = 2;
    const C: i64 = 3;
    const D: i64 = 4;

    fn group(id: i64, members: &[i64]) -> Group {
        Group {
            id,
            session_id: 1,
            activity_id: 1,
            group_name: format!("Group {id}"),
            group_members: members.to_vec(),
            finalized_at: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn all_types() -> [EvaluationType; 3] {
        [
            EvaluationType::WithinGroup,
            EvaluationType::GroupToGroup,
            EvaluationType::AnyToAny,
        ]
    }

    #[test]
    fn test_within_group_two_pairs_of_two() {
        let groups = vec![group(10, &[A, B]), group(11, &[C, D])];
        let pairs = generate_pairs(&groups, EvaluationType::WithinGroup);

        assert_eq!(pairs.len(), 4);
        let set: HashSet<_> = pairs
            .iter()
            .map(|p| (p.evaluator_id, p.evaluatee_id, p.group_id))
            .collect();
        assert!(set.contains(&(A, B, Some(10))));
        assert!(set.contains(&(B, A, Some(10))));
        assert!(set.contains(&(C, D, Some(11))));
        assert!(set.contains(&(D, C, Some(11))));
    }

    #[test]
    fn test_within_group_counts() {
        for n in 0..6usize {
            let members: Vec<i64> = (1..=n as i64).collect();
            let pairs = generate_pairs(&[group(1, &members)], EvaluationType::WithinGroup);
            assert_eq!(pairs.len(), n * n.saturating_sub(1));
        }
    }

    #[test]
    fn test_group_to_group_ring_of_two() {
        let groups = vec![group(10, &[A, B]), group(11, &[C, D])];
        let pairs = generate_pairs(&groups, EvaluationType::GroupToGroup);

        assert_eq!(pairs.len(), 8);
        let first: HashSet<i64> = [A, B].into_iter().collect();
        for pair in &pairs {
            // 每一对都跨组
            assert_ne!(
                first.contains(&pair.evaluator_id),
                first.contains(&pair.evaluatee_id)
            );
            let expected_group = if first.contains(&pair.evaluator_id) {
                10
            } else {
                11
            };
            assert_eq!(pair.group_id, Some(expected_group));
        }
    }

    #[test]
    fn test_group_to_group_ring_of_three_targets_next_group() {
        let groups = vec![group(1, &[1, 2]), group(2, &[3]), group(3, &[4, 5, 6])];
        let pairs = generate_pairs(&groups, EvaluationType::GroupToGroup);

        // 2*1 + 1*3 + 3*2
        assert_eq!(pairs.len(), 11);
        assert!(
            pairs
                .iter()
                .filter(|p| p.group_id == Some(3))
                .all(|p| p.evaluatee_id == 1 || p.evaluatee_id == 2)
        );
    }

    #[test]
    fn test_group_to_group_single_group_falls_back() {
        let groups = vec![group(5, &[A, B, C])];
        let pairs = generate_pairs(&groups, EvaluationType::GroupToGroup);
        assert_eq!(pairs.len(), 6);
        assert!(pairs.iter().all(|p| p.evaluator_id != p.evaluatee_id));
    }

    #[test]
    fn test_any_to_any_four_participants() {
        let groups = vec![group(10, &[A, B]), group(11, &[C, D])];
        let pairs = generate_pairs(&groups, EvaluationType::AnyToAny);

        assert_eq!(pairs.len(), 12);
        let set: HashSet<(i64, i64)> = pairs
            .iter()
            .map(|p| (p.evaluator_id, p.evaluatee_id))
            .collect();
        assert_eq!(set.len(), 12);
        assert!(pairs.iter().all(|p| p.group_id.is_none()));
    }

    #[test]
    fn test_any_to_any_ignores_grouping() {
        let members: Vec<i64> = (1..=7).collect();
        let split = vec![group(1, &members[..3]), group(2, &members[3..])];
        let single = vec![group(1, &members)];
        assert_eq!(generate_pairs(&split, EvaluationType::AnyToAny).len(), 42);
        assert_eq!(generate_pairs(&single, EvaluationType::AnyToAny).len(), 42);
    }

    #[test]
    fn test_no_self_evaluation_for_any_topology() {
        let groups = vec![
            group(1, &[1, 2, 3]),
            group(2, &[4, 5, 6]),
            group(3, &[7]),
        ];
        for evaluation_type in all_types() {
            let pairs = generate_pairs(&groups, evaluation_type);
            assert!(pairs.iter().all(|p| p.evaluator_id != p.evaluatee_id));
        }
    }

    #[test]
    fn test_no_groups_yield_no_pairs() {
        for evaluation_type in all_types() {
            assert!(generate_pairs(&[], evaluation_type).is_empty());
        }
    }
}
