//! Unified error types for the betting client.

use rust_decimal::Decimal;
use thiserror::Error;

/// Unified error type for the betting client.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Backend API error.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Bet slip error.
    #[error("slip error: {0}")]
    Slip(#[from] SlipError),

    /// Amount rejected before reaching the backend.
    #[error("invalid amount: {0} (must be greater than zero)")]
    InvalidAmount(Decimal),

    /// Bet id not present in the loaded bet list.
    #[error("bet {0} not found")]
    BetNotFound(String),

    /// Only pending bets can be liquidated.
    #[error("bet {id} is not pending (status: {status})")]
    BetNotPending {
        /// Bet id.
        id: String,
        /// Current status.
        status: String,
    },

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors talking to the betting backend.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure (connection refused, timeout, ...).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status with no usable message.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        /// Endpoint path.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// The backend refused the operation and said why.
    #[error("{message}")]
    Rejected {
        /// Endpoint path.
        endpoint: String,
        /// Message from the backend.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("failed to parse {endpoint} response: {reason}")]
    Parse {
        /// Endpoint path.
        endpoint: String,
        /// Reason for failure.
        reason: String,
    },

    /// Endpoint could not be joined onto the base URL.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the request never got an answer from the backend.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Http(_))
    }
}

/// Bet slip editing errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SlipError {
    /// No slip entry at this position.
    #[error("no slip entry at position {index} (slip has {len})")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Current slip length.
        len: usize,
    },

    /// No event at this position in the current market views.
    #[error("no event at position {0}")]
    UnknownEvent(usize),

    /// No outcome choice at this position for the event.
    #[error("event {event_id} has no choice at position {index}")]
    UnknownChoice {
        /// Event id.
        event_id: String,
        /// Requested position.
        index: usize,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
