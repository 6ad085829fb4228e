//! Odds aggregation and the market views built on it.
//!
//! This module handles:
//! - Best price per outcome across bookmakers
//! - Per-event selectable choices (head-to-head and totals)

pub mod aggregator;
pub mod view;

pub use aggregator::{best_offer, BestOffer};
pub use view::{build_market_views, find_view, market_view, MarketView, OutcomeChoice};
