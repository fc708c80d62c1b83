use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表（身份由外部认证服务签发，本地仅保存映射）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Uuid).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建活动表
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::ActivityName).string().not_null())
                    .col(
                        ColumnDef::new(Activities::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Activities::CreatedWithRole)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Activities::Metadata).text().not_null())
                    .col(
                        ColumnDef::new(Activities::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Activities::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Activities::Table, Activities::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评分标准表
        manager
            .create_table(
                Table::create()
                    .table(Rubrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rubrics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Rubrics::ActivityId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Rubrics::Criteria).text().not_null())
                    .col(ColumnDef::new(Rubrics::MaxMarks).text().not_null())
                    .col(ColumnDef::new(Rubrics::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Rubrics::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Rubrics::Table, Rubrics::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建邀请链接表
        manager
            .create_table(
                Table::create()
                    .table(InviteLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InviteLinks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InviteLinks::ActivityId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(InviteLinks::InviteCode)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(InviteLinks::SharedBy).big_integer().not_null())
                    .col(
                        ColumnDef::new(InviteLinks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InviteLinks::ClosedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(InviteLinks::Table, InviteLinks::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(InviteLinks::Table, InviteLinks::SharedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建参与记录表
        manager
            .create_table(
                Table::create()
                    .table(ParticipantSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParticipantSubmissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ParticipantSubmissions::ActivityId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParticipantSubmissions::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParticipantSubmissions::JoinedVia)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParticipantSubmissions::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ParticipantSubmissions::Table,
                                ParticipantSubmissions::ActivityId,
                            )
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ParticipantSubmissions::Table, ParticipantSubmissions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评价场次表
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::ActivityId).big_integer().not_null())
                    .col(ColumnDef::new(Sessions::StartTime).big_integer().not_null())
                    .col(ColumnDef::new(Sessions::EndTime).big_integer().not_null())
                    .col(ColumnDef::new(Sessions::Duration).big_integer().not_null())
                    .col(ColumnDef::new(Sessions::Status).string().not_null())
                    .col(ColumnDef::new(Sessions::EvaluationType).string().not_null())
                    .col(ColumnDef::new(Sessions::GroupSize).integer().not_null())
                    .col(
                        ColumnDef::new(Sessions::TotalStudents)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::AllocationVersion)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sessions::ScheduledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sessions::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sessions::Table, Sessions::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建分组表（groups 在 MySQL 中为保留字）
        manager
            .create_table(
                Table::create()
                    .table(EvaluationGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationGroups::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationGroups::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationGroups::ActivityId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EvaluationGroups::GroupName).string().not_null())
                    .col(
                        ColumnDef::new(EvaluationGroups::GroupMembers)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationGroups::FinalizedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationGroups::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationGroups::Table, EvaluationGroups::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建互评记录表
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::ActivityId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::SessionId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Evaluations::EvaluatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::EvaluateeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::GroupId).big_integer().null())
                    .col(ColumnDef::new(Evaluations::Marks).double().not_null())
                    .col(ColumnDef::new(Evaluations::Status).string().not_null())
                    .col(
                        ColumnDef::new(Evaluations::IsSubmitted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Evaluations::IsReviewed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Evaluations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 常用查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participant_submissions_activity_id")
                    .table(ParticipantSubmissions::Table)
                    .col(ParticipantSubmissions::ActivityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluation_groups_session_id")
                    .table(EvaluationGroups::Table)
                    .col(EvaluationGroups::SessionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_session_evaluator")
                    .table(Evaluations::Table)
                    .col(Evaluations::SessionId)
                    .col(Evaluations::EvaluatorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EvaluationGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ParticipantSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InviteLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rubrics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Uuid,
    Username,
    Email,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Activities {
    #[sea_orm(iden = "activities")]
    Table,
    Id,
    ActivityName,
    CreatedBy,
    CreatedWithRole,
    Metadata,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Rubrics {
    #[sea_orm(iden = "rubrics")]
    Table,
    Id,
    ActivityId,
    Criteria,
    MaxMarks,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InviteLinks {
    #[sea_orm(iden = "invite_links")]
    Table,
    Id,
    ActivityId,
    InviteCode,
    SharedBy,
    CreatedAt,
    ClosedAt,
}

#[derive(DeriveIden)]
enum ParticipantSubmissions {
    #[sea_orm(iden = "participant_submissions")]
    Table,
    Id,
    ActivityId,
    UserId,
    JoinedVia,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Sessions {
    #[sea_orm(iden = "sessions")]
    Table,
    Id,
    ActivityId,
    StartTime,
    EndTime,
    Duration,
    Status,
    EvaluationType,
    GroupSize,
    TotalStudents,
    AllocationVersion,
    ScheduledAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EvaluationGroups {
    #[sea_orm(iden = "evaluation_groups")]
    Table,
    Id,
    SessionId,
    ActivityId,
    GroupName,
    GroupMembers,
    FinalizedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Evaluations {
    #[sea_orm(iden = "evaluations")]
    Table,
    Id,
    ActivityId,
    SessionId,
    EvaluatorId,
    EvaluateeId,
    GroupId,
    Marks,
    Status,
    IsSubmitted,
    IsReviewed,
    CreatedAt,
}
