//! Betting backend API client.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::error::{ApiError, AppError};
use crate::metrics::RequestTimer;

use super::types::{Event, MarketInfo, PlacedBet};

/// Balance endpoint (GET reads, POST deposits).
pub const BALANCE_PATH: &str = "/saldo";
/// Events of a market.
pub const EVENTS_PATH: &str = "/eventos";
/// Market listing.
pub const MARKETS_PATH: &str = "/mercados";
/// Placed bets.
pub const BETS_PATH: &str = "/apostas";
/// Bet registration.
pub const REGISTER_BET_PATH: &str = "/apostas/registrar";
/// Bet liquidation.
pub const LIQUIDATE_BET_PATH: &str = "/apostas/liquidar";

/// Betting backend HTTP client.
#[derive(Debug, Clone)]
pub struct BackendClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Backend base URL, always ending in '/'.
    base_url: Url,
}

/// Balance response from API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// Current balance.
    #[serde(with = "rust_decimal::serde::float")]
    pub saldo: Decimal,
}

/// Deposit request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Amount to deposit.
    #[serde(with = "rust_decimal::serde::float")]
    pub valor: Decimal,
}

/// Error body sent with non-success statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub message: Option<String>,
}

/// Either a list or a single item; `/eventos` answers both ways.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A JSON array.
    Many(Vec<T>),
    /// A bare object.
    One(T),
}

impl<T> OneOrMany<T> {
    /// Normalize to a list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

impl BackendClient {
    /// Create a new backend client from config.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let base_url = config.api_url().map_err(AppError::InvalidConfig)?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(std::time::Duration::from_millis(
                config.http_timeout_ms.min(2_000),
            ))
            .build()
            .map_err(ApiError::from)?;

        Ok(Self::with_http(http, base_url))
    }

    /// Wrap an existing HTTP client.
    pub fn with_http(http: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    /// Get the HTTP client reference.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Get the backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of an endpoint path, keeping any path prefix of the base.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Get the current balance.
    #[instrument(skip(self))]
    pub async fn get_balance(&self) -> Result<Decimal, ApiError> {
        let _timer = RequestTimer::new(BALANCE_PATH);
        let response = self.http.get(self.endpoint(BALANCE_PATH)?).send().await?;
        let body: BalanceResponse = read_json(BALANCE_PATH, response).await?;

        debug!(balance = %body.saldo, "Retrieved balance");

        Ok(body.saldo)
    }

    /// Deposit funds; returns the new balance.
    #[instrument(skip(self), fields(amount = %amount))]
    pub async fn deposit(&self, amount: Decimal) -> Result<Decimal, ApiError> {
        let _timer = RequestTimer::new(BALANCE_PATH);
        let response = self
            .http
            .post(self.endpoint(BALANCE_PATH)?)
            .json(&DepositRequest { valor: amount })
            .send()
            .await?;
        let body: BalanceResponse = read_json(BALANCE_PATH, response).await?;

        debug!(balance = %body.saldo, "Deposit accepted");

        Ok(body.saldo)
    }

    /// List every market the backend offers.
    #[instrument(skip(self))]
    pub async fn get_markets(&self) -> Result<Vec<MarketInfo>, ApiError> {
        let _timer = RequestTimer::new(MARKETS_PATH);
        let response = self.http.get(self.endpoint(MARKETS_PATH)?).send().await?;
        let markets: Vec<MarketInfo> = read_json(MARKETS_PATH, response).await?;

        debug!(count = markets.len(), "Retrieved markets");

        Ok(markets)
    }

    /// Events of one market. A single-object answer becomes a one-element list.
    #[instrument(skip(self))]
    pub async fn get_events(&self, market_key: &str) -> Result<Vec<Event>, ApiError> {
        let _timer = RequestTimer::new(EVENTS_PATH);
        let response = self
            .http
            .get(self.endpoint(EVENTS_PATH)?)
            .query(&[("market", market_key)])
            .send()
            .await?;
        let events: OneOrMany<Event> = read_json(EVENTS_PATH, response).await?;
        let events = events.into_vec();

        debug!(count = events.len(), "Retrieved events");

        Ok(events)
    }

    /// Every bet the backend holds for this account.
    #[instrument(skip(self))]
    pub async fn get_bets(&self) -> Result<Vec<PlacedBet>, ApiError> {
        let _timer = RequestTimer::new(BETS_PATH);
        let response = self.http.get(self.endpoint(BETS_PATH)?).send().await?;
        let bets: Vec<PlacedBet> = read_json(BETS_PATH, response).await?;

        debug!(count = bets.len(), "Retrieved placed bets");

        Ok(bets)
    }
}

/// Decode a success body, or turn a failure status into an [`ApiError`].
pub(crate) async fn read_json<T: DeserializeOwned>(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(status_error(endpoint, response).await);
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Parse {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

/// Error for a non-success response, using the backend's message if it sent one.
pub(crate) async fn status_error(endpoint: &str, response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.bytes().await.unwrap_or_default();

    match serde_json::from_slice::<ErrorBody>(&body) {
        Ok(ErrorBody {
            message: Some(message),
        }) => ApiError::Rejected {
            endpoint: endpoint.to_string(),
            message,
        },
        _ => ApiError::Status {
            endpoint: endpoint.to_string(),
            status,
        },
    }
}
