//! 活动实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub activity_name: String,
    pub created_by: i64,
    pub created_with_role: String,
    // JSON 对象
    #[sea_orm(column_type = "Text")]
    pub metadata: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(has_one = "super::rubrics::Entity")]
    Rubric,
    #[sea_orm(has_one = "super::invite_links::Entity")]
    InviteLink,
    #[sea_orm(has_many = "super::participant_submissions::Entity")]
    ParticipantSubmissions,
    #[sea_orm(has_many = "super::sessions::Entity")]
    Sessions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::rubrics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rubric.def()
    }
}

impl Related<super::invite_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InviteLink.def()
    }
}

impl Related<super::participant_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParticipantSubmissions.def()
    }
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_activity(self) -> crate::models::activities::entities::Activity {
        use crate::models::activities::entities::{Activity, ActivityRole};
        use chrono::{DateTime, Utc};

        Activity {
            id: self.id,
            activity_name: self.activity_name,
            created_by: self.created_by,
            created_with_role: self
                .created_with_role
                .parse::<ActivityRole>()
                .unwrap_or(ActivityRole::Host),
            metadata: serde_json::from_str(&self.metadata)
                .unwrap_or_else(|_| serde_json::Value::Object(Default::default())),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
