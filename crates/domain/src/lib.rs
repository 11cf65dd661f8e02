//! # homechart-domain
//!
//! Pure domain model for the homechart telemetry service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Readings** (timestamped sensor samples) and **Time series**
//! - Implement the **chart resampling pipeline**: bin generation, neighbour
//!   lookup, interpolation and the seconds-to-milliseconds key transform
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod reading;
pub mod resample;
pub mod series;
