#![forbid(unsafe_code)]

//! Core domain model and business logic for the FitTrack system.
//!
//! This crate provides:
//! - Domain types (users, exercises, plans, sessions, logs)
//! - The entity store with durable snapshot persistence
//! - Plan composition (ordered exercise lists)
//! - The workout session lifecycle
//! - Weekly-completion and weight-trend analytics
//! - CSV history export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod users;
pub mod exercises;
pub mod plans;
pub mod sessions;
pub mod weight;
pub mod analytics;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::Store;
pub use analytics::{completion_rate, week_start, weekly_stats, weight_delta, WorkoutStats};
