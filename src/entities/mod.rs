//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod contribution;
pub mod event;
pub mod event_type;
pub mod organization;
pub mod quarterly_summary;
pub mod volunteer;

// Re-export specific types to avoid conflicts
pub use contribution::{
    Column as ContributionColumn, Entity as Contribution, Model as ContributionModel,
};
pub use event::{Column as EventColumn, Entity as Event, Model as EventModel};
pub use event_type::{Column as EventTypeColumn, Entity as EventType, Model as EventTypeModel};
pub use organization::{
    Column as OrganizationColumn, Entity as Organization, Model as OrganizationModel,
};
pub use quarterly_summary::{
    Column as QuarterlySummaryColumn, Entity as QuarterlySummary, Model as QuarterlySummaryModel,
};
pub use volunteer::{Column as VolunteerColumn, Entity as Volunteer, Model as VolunteerModel};
