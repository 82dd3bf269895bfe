//! Event type entity - Categories events are filed under (e.g. "School", "Church").
//!
//! Names are unique. Events keep their `event_type_id` when a type is deleted,
//! so this entity declares no relation back to events.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event type database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_types")]
pub struct Model {
    /// Unique identifier for the event type
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique across all event types
    #[sea_orm(unique)]
    pub name: String,
    /// Free-text description
    pub description: Option<String>,
}

/// Event types have no storage-level relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
