//! # homechart-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small **JSON API** for the chart front end
//!   (`/api/sensors/{sensor}/chart`, `/api/sensors/{sensor}/readings`)
//! - Extract the caller's address and session from each request
//! - Map HTTP requests into application service calls (driving adapter)
//! - Render failures as `{"statusCode": …, "errorMessage": …}` envelopes
//!
//! ## Dependency rule
//! Depends on `homechart-app` (for port traits and services) and
//! `homechart-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod context;
pub mod error;
pub mod router;
pub mod state;
