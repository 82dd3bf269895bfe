//! Organization entity - Groups that host or take part in events.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Organization database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    /// Unique identifier for the organization
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Organization name
    pub name: String,
    /// Kind of organization (school, church, club...)
    #[sea_orm(column_name = "type")]
    pub org_type: Option<String>,
    /// Rough size description
    pub size: Option<String>,
    /// Primary contact person
    pub contact_name: Option<String>,
    /// Contact phone number
    pub contact_phone: Option<String>,
    /// Contact email address
    pub contact_email: Option<String>,
    /// When the organization was recorded
    pub created_at: DateTime,
}

/// Organizations have no storage-level relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
