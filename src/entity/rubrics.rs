//! 评分标准实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rubrics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub activity_id: i64,
    // JSON 字符串数组
    #[sea_orm(column_type = "Text")]
    pub criteria: String,
    // JSON 对象：评分项 -> 满分
    #[sea_orm(column_type = "Text")]
    pub max_marks: String,
    pub created_at: i64,
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
}

impl Related<super::activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_rubric(self) -> crate::models::activities::entities::Rubric {
        use crate::models::activities::entities::Rubric;
        use chrono::{DateTime, Utc};

        Rubric {
            id: self.id,
            activity_id: self.activity_id,
            criteria: serde_json::from_str(&self.criteria).unwrap_or_default(),
            max_marks: serde_json::from_str(&self.max_marks)
                .unwrap_or_else(|_| serde_json::Value::Object(Default::default())),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
