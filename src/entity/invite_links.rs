//! 邀请链接实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invite_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub activity_id: i64,
    // 定稿后置空
    #[sea_orm(unique, nullable)]
    pub invite_code: Option<String>,
    pub shared_by: i64,
    pub created_at: i64,
    pub closed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::activities::Entity",
        from = "Column::ActivityId",
        to = "super::activities::Column::Id"
    )]
    Activity,
}

impl Related<super::activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_invite_link(self) -> crate::models::participants::entities::InviteLink {
        use crate::models::participants::entities::InviteLink;
        use chrono::{DateTime, Utc};

        InviteLink {
            id: self.id,
            activity_id: self.activity_id,
            invite_code: self.invite_code,
            shared_by: self.shared_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            closed_at: self
                .closed_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        }
    }
}
