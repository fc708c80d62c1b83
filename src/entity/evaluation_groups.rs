//! 评价小组实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub activity_id: i64,
    pub group_name: String,
    // JSON 数组，成员用户ID
    #[sea_orm(column_type = "Text")]
    pub group_members: String,
    pub finalized_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sessions::Entity",
        from = "Column::SessionId",
        to = "super::sessions::Column::Id"
    )]
    Session,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 成员列表损坏时返回序列化错误，不能当作空组处理
    pub fn into_group(self) -> crate::errors::Result<crate::models::groups::entities::Group> {
        use crate::errors::PeerEvalError;
        use crate::models::groups::entities::Group;
        use chrono::{DateTime, Utc};

        let group_members: Vec<i64> = serde_json::from_str(&self.group_members).map_err(|e| {
            PeerEvalError::serialization(format!(
                "Group {} has corrupt member list: {e}",
                self.id
            ))
        })?;

        Ok(Group {
            id: self.id,
            session_id: self.session_id,
            activity_id: self.activity_id,
            group_name: self.group_name,
            group_members,
            finalized_at: self
                .finalized_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PeerEvalError;

    fn model(group_members: &str) -> Model {
        Model {
            id: 9,
            session_id: 1,
            activity_id: 1,
            group_name: "Group 1".to_string(),
            group_members: group_members.to_string(),
            finalized_at: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_into_group_parses_members() {
        let group = model("[3,1,2]").into_group().unwrap();
        assert_eq!(group.group_members, vec![3, 1, 2]);
    }

    #[test]
    fn test_into_group_rejects_corrupt_members() {
        let err = model("[3,1,").into_group().unwrap_err();
        assert!(matches!(err, PeerEvalError::Serialization(_)));
        assert!(model("not json").into_group().is_err());
    }
}
