//! Core business logic for the records store.
//!
//! Each submodule owns one concern and talks to the database through `SeaORM`.
//! Nothing here knows about HTTP or templates; callers get typed models back
//! and render them however they like.

/// Contributions recorded against events
pub mod contribution;
/// Events, their derived quarter and their cascading delete
pub mod event;
/// Event types and their seeding
pub mod event_type;
/// Coercion of submitted form text
pub mod form;
/// Organizations
pub mod organization;
/// Fiscal quarter derivation
pub mod quarter;
/// Aggregate queries, dashboard and quarterly report
pub mod report;
/// Cached quarterly summaries
pub mod summary;
/// Volunteers and their contribution totals
pub mod volunteer;

pub use quarter::{Quarter, quarter_label};
