//! Betting client for the betmaster backend.
//!
//! This crate provides:
//! - Best-odds aggregation across bookmakers
//! - Market views with numbered head-to-head and totals choices
//! - A bet slip with lenient stake handling and sequential submission
//! - Balance, deposit and bet liquidation against the backend API
//! - An interactive shell and an in-memory sandbox backend

pub mod api;
pub mod betting;
pub mod config;
pub mod error;
pub mod market;
pub mod metrics;
pub mod odds;
pub mod render;
pub mod session;
pub mod shell;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
