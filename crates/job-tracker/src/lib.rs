//! Core engine for a personal job-application tracker.
//!
//! The [`tracker`] module holds the domain model and the pure filtering,
//! classification, statistics, and export functions; [`config`], [`telemetry`]
//! and [`error`] carry the ambient setup shared with the command-line front end.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracker;
