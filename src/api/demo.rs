//! Demo markets and events served by `betmaster sandbox`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::market::{BookMarket, Bookmaker, Event, MarketInfo, Quote, Sport};

use super::handlers::AppState;

/// Over line, over price, under price.
type TotalsLine = (Decimal, Decimal, Decimal);

fn bookmaker(
    key: &str,
    title: &str,
    h2h: &[(&str, Decimal)],
    totals: Option<TotalsLine>,
) -> Bookmaker {
    let mut markets = vec![BookMarket {
        key: "h2h".to_string(),
        outcomes: h2h
            .iter()
            .map(|(name, price)| Quote::new(*name, *price))
            .collect(),
    }];

    if let Some((point, over, under)) = totals {
        markets.push(BookMarket {
            key: "totals".to_string(),
            outcomes: vec![
                Quote::with_point("Over", over, point),
                Quote::with_point("Under", under, point),
            ],
        });
    }

    Bookmaker {
        key: key.to_string(),
        title: Some(title.to_string()),
        markets,
    }
}

fn event(
    id: &str,
    sport_key: &str,
    sport_title: &str,
    commence_time: &str,
    teams: (&str, &str),
    bookmakers: Vec<Bookmaker>,
) -> Event {
    Event {
        id: id.to_string(),
        sport_key: Some(sport_key.to_string()),
        sport_title: Some(sport_title.to_string()),
        commence_time: commence_time.to_string(),
        home_team: teams.0.to_string(),
        away_team: teams.1.to_string(),
        bookmakers,
    }
}

fn market(key: &str, title: &str, description: &str, sport: Sport) -> MarketInfo {
    MarketInfo {
        key: key.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        group: sport.group().to_string(),
    }
}

fn brasileirao() -> (MarketInfo, Vec<Event>) {
    let key = "soccer_brazil_campeonato";
    let title = "Brasileirão Série A";
    let events = vec![
        event(
            "bra-fla-pal",
            key,
            title,
            "2024-11-20T19:00:00Z",
            ("Flamengo", "Palmeiras"),
            vec![
                bookmaker(
                    "betmgm",
                    "BetMGM",
                    &[("Flamengo", dec!(2.10)), ("Draw", dec!(3.20)), ("Palmeiras", dec!(3.40))],
                    Some((dec!(2.5), dec!(1.95), dec!(1.85))),
                ),
                bookmaker(
                    "pinnacle",
                    "Pinnacle",
                    &[("Flamengo", dec!(2.15)), ("Draw", dec!(3.10)), ("Palmeiras", dec!(3.55))],
                    Some((dec!(2.5), dec!(1.92), dec!(1.94))),
                ),
                bookmaker(
                    "bet365",
                    "Bet365",
                    &[("Flamengo", dec!(2.05)), ("Draw", dec!(3.25)), ("Palmeiras", dec!(3.50))],
                    None,
                ),
            ],
        ),
        event(
            "bra-cor-sao",
            key,
            title,
            "2024-11-21T22:30:00Z",
            ("Corinthians", "São Paulo"),
            vec![
                bookmaker(
                    "betmgm",
                    "BetMGM",
                    &[("Corinthians", dec!(2.60)), ("Draw", dec!(3.00)), ("São Paulo", dec!(2.80))],
                    Some((dec!(2.0), dec!(1.80), dec!(2.00))),
                ),
                bookmaker(
                    "bet365",
                    "Bet365",
                    &[("Corinthians", dec!(2.55)), ("Draw", dec!(3.10)), ("São Paulo", dec!(2.90))],
                    Some((dec!(2.5), dec!(2.20), dec!(1.66))),
                ),
            ],
        ),
    ];
    (
        market(key, title, "Campeonato Brasileiro", Sport::Futebol),
        events,
    )
}

fn premier_league() -> (MarketInfo, Vec<Event>) {
    let key = "soccer_epl";
    let title = "EPL";
    let events = vec![event(
        "epl-ars-che",
        key,
        title,
        "2024-11-23T15:00:00Z",
        ("Arsenal", "Chelsea"),
        vec![
            bookmaker(
                "betmgm",
                "BetMGM",
                &[("Arsenal", dec!(1.85)), ("Draw", dec!(3.60)), ("Chelsea", dec!(4.20))],
                Some((dec!(2.5), dec!(1.75), dec!(2.05))),
            ),
            bookmaker(
                "pinnacle",
                "Pinnacle",
                &[("Arsenal", dec!(1.88)), ("Draw", dec!(3.70)), ("Chelsea", dec!(4.10))],
                Some((dec!(2.5), dec!(1.78), dec!(2.08))),
            ),
        ],
    )];
    (
        market(key, title, "English Premier League", Sport::Futebol),
        events,
    )
}

fn nba() -> (MarketInfo, Vec<Event>) {
    let key = "basketball_nba";
    let title = "NBA";
    let events = vec![
        event(
            "nba-lal-bos",
            key,
            title,
            "2024-11-21T00:30:00Z",
            ("Los Angeles Lakers", "Boston Celtics"),
            vec![
                bookmaker(
                    "betmgm",
                    "BetMGM",
                    &[("Los Angeles Lakers", dec!(2.40)), ("Boston Celtics", dec!(1.60))],
                    Some((dec!(224.5), dec!(1.91), dec!(1.91))),
                ),
                bookmaker(
                    "pinnacle",
                    "Pinnacle",
                    &[("Los Angeles Lakers", dec!(2.45)), ("Boston Celtics", dec!(1.58))],
                    Some((dec!(225.5), dec!(1.95), dec!(1.87))),
                ),
            ],
        ),
        event(
            "nba-gsw-mil",
            key,
            title,
            "2024-11-22T03:00:00Z",
            ("Golden State Warriors", "Milwaukee Bucks"),
            vec![
                bookmaker(
                    "bet365",
                    "Bet365",
                    &[("Golden State Warriors", dec!(1.95)), ("Milwaukee Bucks", dec!(1.87))],
                    Some((dec!(231.5), dec!(1.90), dec!(1.90))),
                ),
                bookmaker(
                    "betmgm",
                    "BetMGM",
                    &[("Golden State Warriors", dec!(1.91)), ("Milwaukee Bucks", dec!(1.91))],
                    None,
                ),
            ],
        ),
    ];
    (
        market(key, title, "National Basketball Association", Sport::Basquete),
        events,
    )
}

/// Sandbox state with the demo markets loaded.
pub async fn with_demo_data(balance: Decimal) -> AppState {
    let state = AppState::new(balance);
    for (info, events) in [brasileirao(), premier_league(), nba()] {
        state.add_market(info, events).await;
    }
    state
}
