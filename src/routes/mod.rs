pub mod activities;

pub mod auth;

pub mod group_allocation;

pub mod participants;

pub mod sessions;

pub use activities::configure_activities_routes;
pub use auth::configure_auth_routes;
pub use group_allocation::configure_group_allocation_routes;
pub use participants::configure_participants_routes;
pub use sessions::configure_sessions_routes;
