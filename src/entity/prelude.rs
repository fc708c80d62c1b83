//! 预导入模块，方便使用

pub use super::activities::{
    ActiveModel as ActivityActiveModel, Entity as Activities, Model as ActivityModel,
};
pub use super::evaluation_groups::{
    ActiveModel as GroupActiveModel, Entity as EvaluationGroups, Model as GroupModel,
};
pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::invite_links::{
    ActiveModel as InviteLinkActiveModel, Entity as InviteLinks, Model as InviteLinkModel,
};
pub use super::participant_submissions::{
    ActiveModel as SubmissionActiveModel, Entity as ParticipantSubmissions,
    Model as SubmissionModel,
};
pub use super::rubrics::{ActiveModel as RubricActiveModel, Entity as Rubrics, Model as RubricModel};
pub use super::sessions::{ActiveModel as SessionActiveModel, Entity as Sessions, Model as SessionModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
