//! Typed, mutable object model over JSCalendar documents.
//!
//! Documents are held as order-preserving JSON trees and materialized into
//! typed [`model::Value`]s lazily, one member at a time. Recurrence overrides
//! are expanded into full occurrences when bound to their master and folded
//! back into minimal patch objects when written.

pub mod error;
pub mod mapper;
pub mod model;

pub use error::{ModelError, ModelResult};
pub use mapper::Mapper;
