//! 评价会话实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub activity_id: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub duration: i64,
    pub status: String,
    pub evaluation_type: String,
    pub group_size: i32,
    pub total_students: i32,
    pub allocation_version: i64,
    pub scheduled_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::activities::Entity",
        from = "Column::ActivityId",
        to = "super::activities::Column::Id"
    )]
    Activity,
    #[sea_orm(has_many = "super::evaluation_groups::Entity")]
    Groups,
    #[sea_orm(has_many = "super::evaluations::Entity")]
    Evaluations,
}

impl Related<super::activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl Related<super::evaluation_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_session(self) -> crate::models::sessions::entities::Session {
        use crate::models::sessions::entities::{EvaluationType, Session, SessionStatus};
        use chrono::{DateTime, Utc};

        Session {
            id: self.id,
            activity_id: self.activity_id,
            start_time: DateTime::<Utc>::from_timestamp(self.start_time, 0).unwrap_or_default(),
            end_time: DateTime::<Utc>::from_timestamp(self.end_time, 0).unwrap_or_default(),
            duration: self.duration,
            // 未知状态按已定稿处理，避免被再次分组
            status: self
                .status
                .parse::<SessionStatus>()
                .unwrap_or(SessionStatus::Completed),
            evaluation_type: self
                .evaluation_type
                .parse::<EvaluationType>()
                .unwrap_or(EvaluationType::WithinGroup),
            group_size: self.group_size,
            total_students: self.total_students,
            allocation_version: self.allocation_version,
            scheduled_at: DateTime::<Utc>::from_timestamp(self.scheduled_at, 0)
                .unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
