//! Bet registration and liquidation requests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::ApiError;
use crate::market::client::{read_json, status_error, LIQUIDATE_BET_PATH, REGISTER_BET_PATH};
use crate::market::{BackendClient, BetId, MarketType};
use crate::metrics::RequestTimer;

/// Liquidation status the backend uses for refusals.
pub const LIQUIDATION_ERROR_STATUS: &str = "erro";

/// Bet registration request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetRequest {
    /// Event id.
    pub id: String,
    /// Bookmaker whose odds are taken.
    pub bookmaker: String,
    /// Market type.
    pub market: MarketType,
    /// Outcome label.
    pub outcome: String,
    /// Odds; null when the slip's odds string does not parse.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub multiplier: Option<Decimal>,
    /// Stake; null when the slip's stake string does not parse.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub valor: Option<Decimal>,
    /// Market key the event was loaded from.
    pub sport: String,
}

/// Liquidation request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationRequest {
    /// Bet to settle.
    #[serde(rename = "id-aposta")]
    pub bet_id: BetId,
}

/// Liquidation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationResponse {
    /// "erro" on refusal, anything else on success.
    pub status: String,
    /// Human-readable detail.
    #[serde(default)]
    pub message: String,
}

/// Register one bet with the backend.
///
/// A non-success answer becomes [`ApiError::Rejected`] carrying the backend's
/// message when it sent one.
#[instrument(skip(client, request), fields(event = %request.id, outcome = %request.outcome))]
pub async fn register_bet(client: &BackendClient, request: &BetRequest) -> Result<(), ApiError> {
    debug!(
        bookmaker = %request.bookmaker,
        market = %request.market,
        multiplier = ?request.multiplier,
        valor = ?request.valor,
        "Registering bet"
    );

    let _timer = RequestTimer::new(REGISTER_BET_PATH);
    let response = client
        .http()
        .post(client.endpoint(REGISTER_BET_PATH)?)
        .json(request)
        .send()
        .await?;

    if !response.status().is_success() {
        let err = status_error(REGISTER_BET_PATH, response).await;
        warn!(error = %err, "Bet refused");
        return Err(err);
    }

    info!("Bet registered");
    Ok(())
}

/// Ask the backend to settle a bet.
///
/// An `"erro"` status is returned as [`ApiError::Rejected`].
#[instrument(skip(client), fields(bet_id = %bet_id))]
pub async fn liquidate_bet(
    client: &BackendClient,
    bet_id: &BetId,
) -> Result<LiquidationResponse, ApiError> {
    let _timer = RequestTimer::new(LIQUIDATE_BET_PATH);
    let response = client
        .http()
        .post(client.endpoint(LIQUIDATE_BET_PATH)?)
        .json(&LiquidationRequest {
            bet_id: bet_id.clone(),
        })
        .send()
        .await?;

    let body: LiquidationResponse = read_json(LIQUIDATE_BET_PATH, response).await?;

    if body.status == LIQUIDATION_ERROR_STATUS {
        warn!(message = %body.message, "Liquidation refused");
        return Err(ApiError::Rejected {
            endpoint: LIQUIDATE_BET_PATH.to_string(),
            message: body.message,
        });
    }

    info!(status = %body.status, "Bet liquidated");
    Ok(body)
}
