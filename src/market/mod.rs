//! Market module for sports betting markets.
//!
//! This module handles:
//! - Event, quote and market listing types
//! - Sport rules (draws, totals units, market groups)
//! - Backend API client for reads and deposits

pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{
    filter_markets, BetId, BetStatus, BookMarket, Bookmaker, Event, MarketInfo, MarketType,
    PlacedBet, Quote, Sport,
};
