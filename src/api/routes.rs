//! Sandbox backend route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    deposit, get_balance, get_bets, get_events, get_markets, health, liquidate_bet, register_bet,
    AppState,
};
use crate::market::client::{
    BALANCE_PATH, BETS_PATH, EVENTS_PATH, LIQUIDATE_BET_PATH, MARKETS_PATH, REGISTER_BET_PATH,
};

/// Create the sandbox router, serving the same paths the client calls.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(BALANCE_PATH, get(get_balance).post(deposit))
        .route(EVENTS_PATH, get(get_events))
        .route(MARKETS_PATH, get(get_markets))
        .route(BETS_PATH, get(get_bets))
        .route(REGISTER_BET_PATH, post(register_bet))
        .route(LIQUIDATE_BET_PATH, post(liquidate_bet))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::demo::with_demo_data;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn bet(event: &str, outcome: &str, valor: Value) -> Value {
        json!({
            "id": event,
            "bookmaker": "betmgm",
            "market": "h2h",
            "outcome": outcome,
            "multiplier": 2.1,
            "valor": valor,
            "sport": "soccer_brazil_campeonato",
        })
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = create_router(AppState::new(dec!(0)));
        let (status, body) = send(app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn deposit_rejects_non_positive_values() {
        let state = AppState::new(dec!(100));
        let app = create_router(state.clone());

        let (status, body) = send(app.clone(), "POST", "/saldo", Some(json!({"valor": 0}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let (status, body) = send(app, "POST", "/saldo", Some(json!({"valor": 25.5}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["saldo"], 125.5);
        assert_eq!(state.balance().await, dec!(125.5));
    }

    #[tokio::test]
    async fn events_need_a_known_market() {
        let app = create_router(with_demo_data(dec!(100)).await);

        let (status, body) = send(
            app.clone(),
            "GET",
            "/eventos?market=basketball_nba",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, _) = send(app, "GET", "/eventos?market=curling", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn registration_validates_and_debits() {
        let state = with_demo_data(dec!(20)).await;
        let app = create_router(state.clone());

        let (status, body) = send(
            app.clone(),
            "POST",
            "/apostas/registrar",
            Some(bet("nope", "Flamengo", json!(5))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Evento não encontrado");

        let (status, body) = send(
            app.clone(),
            "POST",
            "/apostas/registrar",
            Some(bet("bra-fla-pal", "Flamengo", Value::Null)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Valor da aposta inválido");

        let (status, body) = send(
            app.clone(),
            "POST",
            "/apostas/registrar",
            Some(bet("bra-fla-pal", "Flamengo", json!(50))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Saldo insuficiente");

        let (status, body) = send(
            app.clone(),
            "POST",
            "/apostas/registrar",
            Some(bet("bra-fla-pal", "Flamengo", json!(10))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "pendente");
        assert_eq!(state.balance().await, dec!(10));

        let (_, bets) = send(app, "GET", "/apostas", None).await;
        assert_eq!(bets.as_array().unwrap().len(), 1);
        assert_eq!(bets[0]["id"], 1);
    }

    #[tokio::test]
    async fn liquidation_needs_result_and_pays_winners() {
        let state = with_demo_data(dec!(20)).await;
        let app = create_router(state.clone());

        send(
            app.clone(),
            "POST",
            "/apostas/registrar",
            Some(bet("bra-fla-pal", "Flamengo", json!(10))),
        )
        .await;

        let (_, body) = send(app.clone(), "POST", "/apostas/liquidar", Some(json!({"id-aposta": 9}))).await;
        assert_eq!(body["status"], "erro");

        let (_, body) = send(app.clone(), "POST", "/apostas/liquidar", Some(json!({"id-aposta": 1}))).await;
        assert_eq!(body["status"], "erro");
        assert_eq!(body["message"], "Evento ainda não finalizado");

        state
            .set_result("bra-fla-pal", vec!["Flamengo".to_string()])
            .await;
        let (status, body) = send(app.clone(), "POST", "/apostas/liquidar", Some(json!({"id-aposta": 1}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "sucesso");
        assert_eq!(state.balance().await, dec!(31));

        let (_, body) = send(app, "POST", "/apostas/liquidar", Some(json!({"id-aposta": 1}))).await;
        assert_eq!(body["status"], "erro");
    }
}
