//! Bet slip, bet placement and liquidation.

pub mod execution;
pub mod placement;
pub mod slip;
pub mod stake;

pub use execution::{liquidate_bet, register_bet, BetRequest, LiquidationResponse};
pub use placement::{build_request, place_slip, EntryOutcome, EntryResult, PlacementReport};
pub use slip::{BetSlip, SlipEntry, DEFAULT_STAKE};
pub use stake::{format_amount, parse_amount, potential_win};
