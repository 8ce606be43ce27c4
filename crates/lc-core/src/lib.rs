//! Core types and logic for LC Tracker.
//!
//! Holds the record model (students, zones, entries), the [`store::RecordStore`]
//! abstraction, the per-period entry form, and the pure filter/aggregation
//! engine behind the Data view. Storage backends and front ends depend on this
//! crate; it has no database or HTTP dependencies.

pub mod calendar;
pub mod entry;
pub mod error;
pub mod filter;
pub mod form;
pub mod record;
pub mod repository;
pub mod roster;
pub mod store;
pub mod view;

pub use error::{Error, Result};
