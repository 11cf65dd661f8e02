//! # homechart-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ReadingRepository`: store readings, load a sensor's time series
//!   - `SessionStore`: map session tokens to homes
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ChartService`: resample a sensor's series for the chart front end
//!   - `AccessService`: resolve which home a request is allowed to read
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `homechart-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod access;
pub mod ports;
pub mod services;
