//! Sandbox backend handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::betting::execution::{
    BetRequest, LiquidationRequest, LiquidationResponse, LIQUIDATION_ERROR_STATUS,
};
use crate::market::client::{BalanceResponse, DepositRequest, ErrorBody};
use crate::market::{BetId, BetStatus, Event, MarketInfo, PlacedBet};

/// Bet held by the sandbox, with the event it was placed on.
#[derive(Debug, Clone)]
pub struct SandboxBet {
    /// Event id.
    pub event_id: String,
    /// The bet as served on `/apostas`.
    pub bet: PlacedBet,
}

/// Everything the sandbox backend knows.
#[derive(Debug, Default)]
pub struct SandboxBook {
    /// Account balance.
    pub balance: Decimal,
    /// Market listing, in insertion order.
    pub markets: Vec<MarketInfo>,
    /// Events by market key.
    pub events: HashMap<String, Vec<Event>>,
    /// Placed bets, oldest first.
    pub bets: Vec<SandboxBet>,
    /// Winning outcome labels by event id, once the event is over.
    pub results: HashMap<String, Vec<String>>,
    next_bet_id: i64,
}

impl SandboxBook {
    fn find_event(&self, event_id: &str) -> Option<&Event> {
        self.events.values().flatten().find(|e| e.id == event_id)
    }
}

/// Application state shared with handlers.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Sandbox data.
    pub book: Arc<RwLock<SandboxBook>>,
}

impl AppState {
    /// Empty sandbox with a starting balance.
    pub fn new(balance: Decimal) -> Self {
        Self {
            book: Arc::new(RwLock::new(SandboxBook {
                balance,
                next_bet_id: 1,
                ..SandboxBook::default()
            })),
        }
    }

    /// Register a market and its events.
    pub async fn add_market(&self, info: MarketInfo, events: Vec<Event>) {
        let mut book = self.book.write().await;
        book.events.insert(info.key.clone(), events);
        book.markets.push(info);
    }

    /// Replace a market's events, as a new odds feed would.
    pub async fn set_events(&self, market_key: &str, events: Vec<Event>) {
        self.book
            .write()
            .await
            .events
            .insert(market_key.to_string(), events);
    }

    /// Record the winning outcome labels of a finished event.
    pub async fn set_result(&self, event_id: &str, winners: Vec<String>) {
        self.book
            .write()
            .await
            .results
            .insert(event_id.to_string(), winners);
    }

    /// Current balance.
    pub async fn balance(&self) -> Decimal {
        self.book.read().await.balance
    }
}

/// `GET /eventos` query.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Market key.
    pub market: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

type Refusal = (StatusCode, Json<ErrorBody>);

fn refuse(status: StatusCode, message: &str) -> Refusal {
    (
        status,
        Json(ErrorBody {
            message: Some(message.to_string()),
        }),
    )
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// `GET /saldo`.
pub async fn get_balance(State(state): State<AppState>) -> Json<BalanceResponse> {
    Json(BalanceResponse {
        saldo: state.balance().await,
    })
}

/// `POST /saldo`.
pub async fn deposit(
    State(state): State<AppState>,
    Json(request): Json<DepositRequest>,
) -> Result<Json<BalanceResponse>, Refusal> {
    if request.valor <= Decimal::ZERO {
        return Err(refuse(StatusCode::BAD_REQUEST, "Valor de depósito inválido"));
    }

    let mut book = state.book.write().await;
    book.balance = book
        .balance
        .checked_add(request.valor)
        .ok_or_else(|| refuse(StatusCode::BAD_REQUEST, "Valor de depósito inválido"))?;

    info!(amount = %request.valor, balance = %book.balance, "Sandbox deposit");
    Ok(Json(BalanceResponse {
        saldo: book.balance,
    }))
}

/// `GET /mercados`.
pub async fn get_markets(State(state): State<AppState>) -> Json<Vec<MarketInfo>> {
    Json(state.book.read().await.markets.clone())
}

/// `GET /eventos?market=<key>`.
pub async fn get_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<Event>>, Refusal> {
    let book = state.book.read().await;
    match book.events.get(&query.market) {
        Some(events) => Ok(Json(events.clone())),
        None => Err(refuse(StatusCode::NOT_FOUND, "Mercado não encontrado")),
    }
}

/// `GET /apostas`.
pub async fn get_bets(State(state): State<AppState>) -> Json<Vec<PlacedBet>> {
    let book = state.book.read().await;
    Json(book.bets.iter().map(|b| b.bet.clone()).collect())
}

/// `POST /apostas/registrar`.
pub async fn register_bet(
    State(state): State<AppState>,
    Json(request): Json<BetRequest>,
) -> Result<(StatusCode, Json<PlacedBet>), Refusal> {
    let valor = match request.valor {
        Some(v) if v > Decimal::ZERO => v,
        _ => return Err(refuse(StatusCode::BAD_REQUEST, "Valor da aposta inválido")),
    };
    let multiplier = match request.multiplier {
        Some(m) if m > Decimal::ONE => m,
        _ => return Err(refuse(StatusCode::BAD_REQUEST, "Odd inválida")),
    };

    let mut book = state.book.write().await;

    if book.find_event(&request.id).is_none() {
        return Err(refuse(StatusCode::BAD_REQUEST, "Evento não encontrado"));
    }
    if valor > book.balance {
        return Err(refuse(StatusCode::BAD_REQUEST, "Saldo insuficiente"));
    }

    let id = book.next_bet_id;
    book.next_bet_id += 1;
    book.balance -= valor;

    let bet = PlacedBet {
        id: BetId::Number(id),
        market: request.market.to_string(),
        outcome: request.outcome.clone(),
        multiplier,
        valor,
        status: BetStatus::Pending,
    };
    book.bets.push(SandboxBet {
        event_id: request.id.clone(),
        bet: bet.clone(),
    });

    debug!(bet_id = id, bookmaker = %request.bookmaker, "Sandbox bet registered");
    Ok((StatusCode::CREATED, Json(bet)))
}

/// `POST /apostas/liquidar`. Refusals come back as 200 with status "erro".
pub async fn liquidate_bet(
    State(state): State<AppState>,
    Json(request): Json<LiquidationRequest>,
) -> Json<LiquidationResponse> {
    let refusal = |message: &str| {
        Json(LiquidationResponse {
            status: LIQUIDATION_ERROR_STATUS.to_string(),
            message: message.to_string(),
        })
    };

    let mut book = state.book.write().await;
    let book = &mut *book;

    let Some(entry) = book.bets.iter_mut().find(|b| b.bet.id == request.bet_id) else {
        return refusal("Aposta não encontrada");
    };
    if !entry.bet.status.is_pending() {
        return refusal("Aposta já liquidada");
    }
    let Some(winners) = book.results.get(&entry.event_id) else {
        return refusal("Evento ainda não finalizado");
    };

    let message = if winners.contains(&entry.bet.outcome) {
        let Some(balance) = entry
            .bet
            .potential_payout()
            .and_then(|payout| book.balance.checked_add(payout))
        else {
            return refusal("Prêmio excede o limite do saldo");
        };
        entry.bet.status = BetStatus::Won;
        book.balance = balance;
        "Aposta ganha"
    } else {
        entry.bet.status = BetStatus::Lost;
        "Aposta perdida"
    };

    info!(bet_id = %request.bet_id, result = message, "Sandbox bet liquidated");
    Json(LiquidationResponse {
        status: "sucesso".to_string(),
        message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn app_state_starts_with_balance() {
        let state = AppState::new(dec!(50));
        assert_eq!(state.balance().await, dec!(50));
        assert!(state.book.read().await.markets.is_empty());
    }

    #[tokio::test]
    async fn deposit_beyond_maximum_balance_is_refused() {
        let state = AppState::new(Decimal::MAX);

        let result = deposit(
            State(state.clone()),
            Json(DepositRequest { valor: dec!(1) }),
        )
        .await;

        match result {
            Err((status, _)) => assert_eq!(status, StatusCode::BAD_REQUEST),
            Ok(_) => panic!("deposit past the maximum balance was accepted"),
        }
        assert_eq!(state.balance().await, Decimal::MAX);
    }

    #[tokio::test]
    async fn winning_payout_beyond_maximum_balance_is_refused() {
        let state = AppState::new(dec!(0));
        {
            let mut book = state.book.write().await;
            book.balance = Decimal::MAX;
            book.bets.push(SandboxBet {
                event_id: "ev1".to_string(),
                bet: PlacedBet {
                    id: BetId::Number(1),
                    market: "h2h".to_string(),
                    outcome: "Flamengo".to_string(),
                    multiplier: dec!(2.1),
                    valor: dec!(10),
                    status: BetStatus::Pending,
                },
            });
        }
        state.set_result("ev1", vec!["Flamengo".to_string()]).await;

        let Json(response) = liquidate_bet(
            State(state.clone()),
            Json(LiquidationRequest {
                bet_id: BetId::Number(1),
            }),
        )
        .await;

        assert_eq!(response.status, LIQUIDATION_ERROR_STATUS);
        assert_eq!(state.balance().await, Decimal::MAX);
        assert!(state.book.read().await.bets[0].bet.status.is_pending());
    }
}
