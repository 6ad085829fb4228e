//! Client against the sandbox backend over real HTTP.

use std::time::Duration;

use betmaster::api::{self, AppState};
use betmaster::betting::{liquidate_bet, place_slip, BetSlip, EntryOutcome};
use betmaster::error::{ApiError, AppError};
use betmaster::market::{BackendClient, BetId, BetStatus, Sport};
use betmaster::odds::build_market_views;
use betmaster::session::Session;
use betmaster::Config;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const BRASILEIRAO: &str = "soccer_brazil_campeonato";

async fn sandbox(balance: rust_decimal::Decimal) -> (AppState, Config) {
    let state = api::with_demo_data(balance).await;
    let addr = api::spawn(state.clone()).await.unwrap();
    (state, Config::for_backend(format!("http://{}", addr)))
}

async fn soccer_session(config: &Config) -> Session {
    let client = BackendClient::new(config).unwrap();
    let mut session = Session::new(client, config, Sport::Futebol, BRASILEIRAO);
    session.load_events().await.unwrap();
    session
}

#[tokio::test]
async fn balance_and_deposit() {
    let (state, config) = sandbox(dec!(100)).await;
    let client = BackendClient::new(&config).unwrap();

    assert_eq!(client.get_balance().await.unwrap(), dec!(100));
    assert_eq!(client.deposit(dec!(50)).await.unwrap(), dec!(150));
    assert_eq!(state.balance().await, dec!(150));

    match client.deposit(dec!(-5)).await {
        Err(ApiError::Rejected { message, .. }) => assert_eq!(message, "Valor de depósito inválido"),
        other => panic!("expected rejection, got {:?}", other),
    }

    let mut session = soccer_session(&config).await;
    assert!(matches!(
        session.deposit(dec!(0)).await,
        Err(AppError::InvalidAmount(_))
    ));
    assert_eq!(session.deposit(dec!(0.5)).await.unwrap(), dec!(150.5));
    assert_eq!(session.balance(), Some(dec!(150.5)));
}

#[tokio::test]
async fn markets_are_grouped_by_sport() {
    let (_state, config) = sandbox(dec!(100)).await;
    let client = BackendClient::new(&config).unwrap();

    let markets = client.get_markets().await.unwrap();
    let basketball = betmaster::market::filter_markets(&markets, Some(Sport::Basquete));
    assert_eq!(markets.len(), 3);
    assert_eq!(basketball.len(), 1);
    assert_eq!(basketball[0].key, "basketball_nba");
}

#[tokio::test]
async fn events_become_best_odds_views() {
    let (_state, config) = sandbox(dec!(100)).await;
    let session = soccer_session(&config).await;

    assert_eq!(session.heading(), "Brasileirão Série A");
    assert_eq!(session.views().len(), 2);

    let view = &session.views()[0];
    assert_eq!(view.title, "Flamengo vs Palmeiras");

    let odds: Vec<(&str, &str)> = view
        .choices()
        .map(|c| (c.label.as_str(), c.odds.as_str()))
        .collect();
    assert_eq!(
        odds,
        vec![
            ("Flamengo", "2.15"),
            ("Draw", "3.25"),
            ("Palmeiras", "3.55"),
            ("Mais do que 2.5 gols", "1.95"),
            ("Menos do que 2.5 gols", "1.94"),
        ]
    );
    assert_eq!(view.h2h_options[0].bookmaker.as_deref(), Some("pinnacle"));
    assert_eq!(view.totals_options[0].bookmaker.as_deref(), Some("betmgm"));
}

#[tokio::test]
async fn basketball_views_have_no_draw() {
    let (_state, config) = sandbox(dec!(100)).await;
    let client = BackendClient::new(&config).unwrap();
    let mut session = Session::new(client, &config, Sport::Basquete, "basketball_nba");
    session.load_events().await.unwrap();

    let view = &session.views()[0];
    assert_eq!(view.h2h_options.len(), 2);
    assert_eq!(view.totals_options[0].label, "Mais do que 224.5 pontos");
}

#[tokio::test]
async fn unknown_market_fails_to_load() {
    let (_state, config) = sandbox(dec!(100)).await;
    let client = BackendClient::new(&config).unwrap();
    let mut session = Session::new(client, &config, Sport::Futebol, "curling");

    assert!(matches!(
        session.load_events().await,
        Err(AppError::Api(ApiError::Rejected { .. }))
    ));
    assert!(session.views().is_empty());
}

#[tokio::test]
async fn slip_submission_places_rejects_and_skips() {
    let (state, config) = sandbox(dec!(20)).await;
    let mut session = soccer_session(&config).await;

    // Flamengo at the default stake, Palmeiras above the balance left, and a
    // pick on the second event, which the feed then drops.
    session.select(0, 0).unwrap();
    session.select(0, 2).unwrap();
    session.set_stake(1, "50").unwrap();
    session.select(1, 0).unwrap();

    let first = state.book.read().await.events[BRASILEIRAO][0].clone();
    state.set_events(BRASILEIRAO, vec![first]).await;
    assert_eq!(session.load_events().await.unwrap(), 1);

    let report = session.place_slip().await;
    let outcomes: Vec<EntryOutcome> = report.results.iter().map(|r| r.outcome.clone()).collect();
    assert_eq!(
        outcomes,
        vec![
            EntryOutcome::Placed,
            EntryOutcome::Rejected {
                message: "Saldo insuficiente".to_string()
            },
            EntryOutcome::Skipped,
        ]
    );

    assert!(session.slip().is_empty());
    assert_eq!(report.latest_balance, Some(dec!(10)));
    assert_eq!(session.balance(), Some(dec!(10)));
    assert_eq!(session.bets().len(), 1);
    assert_eq!(session.bets()[0].outcome, "Flamengo");
    assert_eq!(session.bets()[0].multiplier, dec!(2.15));
}

#[tokio::test]
async fn liquidation_settles_pending_bets_once() {
    let (state, config) = sandbox(dec!(20)).await;
    let mut session = soccer_session(&config).await;

    session.select(0, 0).unwrap();
    assert_eq!(session.place_slip().await.placed(), 1);
    assert_eq!(session.bets()[0].status, BetStatus::Pending);

    match session.liquidate("1").await {
        Err(AppError::Api(ApiError::Rejected { message, .. })) => {
            assert_eq!(message, "Evento ainda não finalizado")
        }
        other => panic!("expected rejection, got {:?}", other),
    }

    state
        .set_result("bra-fla-pal", vec!["Flamengo".to_string()])
        .await;
    let response = session.liquidate("1").await.unwrap();
    assert_eq!(response.status, "sucesso");

    // 20 - 10 staked + 10 x 2.15 paid out.
    assert_eq!(session.balance(), Some(dec!(31.5)));
    assert_eq!(session.bets()[0].status, BetStatus::Won);

    assert!(matches!(
        session.liquidate("1").await,
        Err(AppError::BetNotPending { .. })
    ));
    assert!(matches!(
        session.liquidate("99").await,
        Err(AppError::BetNotFound(_))
    ));
}

#[tokio::test]
async fn backend_refuses_unknown_bet_liquidation() {
    let (_state, config) = sandbox(dec!(20)).await;
    let client = BackendClient::new(&config).unwrap();

    match liquidate_bet(&client, &BetId::Number(99)).await {
        Err(ApiError::Rejected { message, .. }) => assert_eq!(message, "Aposta não encontrada"),
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_backend_fails_entries_and_still_clears_slip() {
    let (state, _config) = sandbox(dec!(20)).await;
    let events = state.book.read().await.events[BRASILEIRAO].clone();
    let views = build_market_views(&events, Sport::Futebol);

    // Nothing listens on port 9.
    let offline = BackendClient::new(&Config::for_backend("http://127.0.0.1:9")).unwrap();
    let mut slip = BetSlip::default();
    slip.select(views[0].id.clone(), views[0].title.clone(), &views[0].h2h_options[0]);

    let report = place_slip(&offline, &views, &mut slip, BRASILEIRAO, "betmgm").await;
    assert_eq!(report.failed(), 1);
    assert_eq!(report.latest_balance, None);
    assert!(slip.is_empty());
}

#[tokio::test]
async fn interrupted_submission_never_resubmits_sent_entries() {
    let (state, config) = sandbox(dec!(100)).await;
    let mut session = soccer_session(&config).await;

    session.select(0, 0).unwrap();
    session.select(0, 2).unwrap();

    // Drop the batch as soon as the backend holds a bet.
    let first_bet_registered = async {
        while state.book.read().await.bets.is_empty() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    };
    tokio::select! {
        _ = session.place_slip() => {}
        _ = first_bet_registered => {}
    }
    assert!(session.slip().len() < 2);

    session.place_slip().await;
    assert!(session.slip().is_empty());

    let mut outcomes: Vec<String> = state
        .book
        .read()
        .await
        .bets
        .iter()
        .map(|b| b.bet.outcome.clone())
        .collect();
    let registered = outcomes.len();
    outcomes.sort();
    outcomes.dedup();
    assert_eq!(outcomes.len(), registered);
    assert!(outcomes.contains(&"Flamengo".to_string()));
}
