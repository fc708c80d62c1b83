//! 分组与互评配对引擎
//!
//! - `roster`：解析活动的参与者名单
//! - `partitioner`：打乱并切分为固定大小的小组
//! - `pairing`：按评价拓扑生成有向评价对
//! - `orchestrator`：分组/定稿状态迁移，负责并发控制与事务提交

pub mod orchestrator;
pub mod pairing;
pub mod partitioner;
pub mod roster;

pub use orchestrator::AllocationOrchestrator;
pub use pairing::{EvaluationPair, generate_pairs};
pub use partitioner::{PartitionedGroup, partition};
pub use roster::{dedupe_roster, resolve_roster};
