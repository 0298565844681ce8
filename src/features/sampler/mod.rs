//! # Feature: Slot Sampler
//!
//! Draws well-spread points over (weekday, fraction-of-allowed-time) with a Latin
//! hypercube and resolves each point to a concrete timestamp in the coming week.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Per-slot errors for empty days and DST gaps instead of aborting the batch
//! - 1.0.0: Initial release

pub mod lhs;
pub mod slots;

pub use lhs::LatinHypercube;
pub use slots::{
    date_offset_days, localize, resolve_date, resolve_time, ResolvedSlot, SamplePoint,
    SlotSampler,
};
