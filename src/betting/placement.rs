//! Submitting the whole bet slip.

use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use super::execution::{register_bet, BetRequest};
use super::slip::{BetSlip, SlipEntry};
use super::stake::parse_amount;
use crate::market::BackendClient;
use crate::metrics;
use crate::odds::{find_view, MarketView};

/// What happened to one slip entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Backend accepted the bet.
    Placed,
    /// Backend refused the bet.
    Rejected {
        /// Reason given by the backend.
        message: String,
    },
    /// Request never got an answer.
    Failed {
        /// Transport error.
        error: String,
    },
    /// Event or choice no longer in the loaded markets; nothing was sent.
    Skipped,
}

/// One entry's result, in slip order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryResult {
    /// Event title.
    pub market_name: String,
    /// Choice label.
    pub selection: String,
    /// Outcome.
    pub outcome: EntryOutcome,
}

/// Result of submitting a slip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementReport {
    /// Per-entry results, in slip order.
    pub results: Vec<EntryResult>,
    /// Balance fetched after the last accepted bet.
    pub latest_balance: Option<Decimal>,
}

impl PlacementReport {
    fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Bets accepted.
    pub fn placed(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Placed))
    }

    /// Bets refused by the backend.
    pub fn rejected(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Rejected { .. }))
    }

    /// Bets lost to transport errors.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Failed { .. }))
    }

    /// Entries skipped as stale.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Skipped))
    }
}

/// Build the registration request for a slip entry.
///
/// The entry is matched against the current views by event id and choice
/// label; `None` when either is gone. The bookmaker captured at selection time
/// wins over the current one, which wins over `default_bookmaker`.
pub fn build_request(
    entry: &SlipEntry,
    views: &[MarketView],
    market_key: &str,
    default_bookmaker: &str,
) -> Option<BetRequest> {
    let view = find_view(views, &entry.market_id)?;
    let choice = view.find_choice(&entry.selection)?;

    let bookmaker = entry
        .bookmaker
        .clone()
        .or_else(|| choice.bookmaker.clone())
        .unwrap_or_else(|| default_bookmaker.to_string());

    Some(BetRequest {
        id: entry.market_id.clone(),
        bookmaker,
        market: choice.kind,
        outcome: entry.selection.clone(),
        multiplier: parse_amount(&entry.odds),
        valor: parse_amount(&entry.stake),
        sport: market_key.to_string(),
    })
}

/// Submit every slip entry, one after another, emptying the slip.
///
/// A refused or failed entry never stops the rest. The balance is re-read
/// after each accepted bet. Each entry leaves the slip before its request is
/// sent, so a batch dropped halfway keeps only the entries never tried.
#[instrument(skip_all, fields(entries = slip.len(), market = %market_key))]
pub async fn place_slip(
    client: &BackendClient,
    views: &[MarketView],
    slip: &mut BetSlip,
    market_key: &str,
    default_bookmaker: &str,
) -> PlacementReport {
    let mut report = PlacementReport::default();

    while let Some(entry) = slip.pop_front() {
        let outcome = match build_request(&entry, views, market_key, default_bookmaker) {
            None => {
                debug!(
                    event = %entry.market_id,
                    selection = %entry.selection,
                    "Market gone, skipping slip entry"
                );
                metrics::inc_slip_entries_skipped();
                EntryOutcome::Skipped
            }
            Some(request) => {
                metrics::inc_bets_submitted();
                match register_bet(client, &request).await {
                    Ok(()) => {
                        metrics::inc_bets_placed();
                        match client.get_balance().await {
                            Ok(balance) => report.latest_balance = Some(balance),
                            Err(e) => warn!(error = %e, "Balance refresh after bet failed"),
                        }
                        EntryOutcome::Placed
                    }
                    Err(e) if e.is_transport() => {
                        metrics::inc_bets_failed();
                        EntryOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                    Err(e) => {
                        metrics::inc_bets_rejected();
                        EntryOutcome::Rejected {
                            message: e.to_string(),
                        }
                    }
                }
            }
        };

        report.results.push(EntryResult {
            market_name: entry.market_name,
            selection: entry.selection,
            outcome,
        });
    }

    info!(
        placed = report.placed(),
        rejected = report.rejected(),
        failed = report.failed(),
        skipped = report.skipped(),
        "Slip submitted"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::types::{BookMarket, Bookmaker, Event, MarketType, Quote, Sport};
    use crate::odds::build_market_views;
    use rust_decimal_macros::dec;

    fn views() -> Vec<MarketView> {
        let event = Event {
            id: "ev1".to_string(),
            sport_key: None,
            sport_title: None,
            commence_time: "2024-11-20T19:00:00Z".to_string(),
            home_team: "Flamengo".to_string(),
            away_team: "Palmeiras".to_string(),
            bookmakers: vec![Bookmaker {
                key: "pinnacle".to_string(),
                title: None,
                markets: vec![
                    BookMarket {
                        key: "h2h".to_string(),
                        outcomes: vec![Quote::new("Flamengo", dec!(2.1))],
                    },
                    BookMarket {
                        key: "totals".to_string(),
                        outcomes: vec![Quote::with_point("Over", dec!(1.9), dec!(2.5))],
                    },
                ],
            }],
        };
        build_market_views(&[event], Sport::Futebol)
    }

    fn entry(event: &str, selection: &str, stake: &str) -> SlipEntry {
        SlipEntry {
            market_id: event.to_string(),
            market_name: "Flamengo vs Palmeiras".to_string(),
            selection: selection.to_string(),
            odds: "2.10".to_string(),
            stake: stake.to_string(),
            kind: MarketType::H2h,
            bookmaker: None,
        }
    }

    #[test]
    fn build_request_resolves_against_views() {
        let views = views();
        let request = build_request(&entry("ev1", "Flamengo", "10"), &views, "soccer_epl", "betmgm")
            .unwrap();

        assert_eq!(request.id, "ev1");
        assert_eq!(request.bookmaker, "pinnacle");
        assert_eq!(request.market, MarketType::H2h);
        assert_eq!(request.multiplier, Some(dec!(2.10)));
        assert_eq!(request.valor, Some(dec!(10)));
        assert_eq!(request.sport, "soccer_epl");
    }

    #[test]
    fn build_request_uses_totals_kind_and_label() {
        let views = views();
        let request = build_request(
            &entry("ev1", "Mais do que 2.5 gols", "5"),
            &views,
            "soccer_epl",
            "betmgm",
        )
        .unwrap();

        assert_eq!(request.market, MarketType::Totals);
        assert_eq!(request.outcome, "Mais do que 2.5 gols");
    }

    #[test]
    fn build_request_skips_stale_entries() {
        let views = views();
        assert!(build_request(&entry("ev9", "Flamengo", "10"), &views, "k", "betmgm").is_none());
        assert!(build_request(&entry("ev1", "Vasco", "10"), &views, "k", "betmgm").is_none());
    }

    #[test]
    fn build_request_bookmaker_precedence() {
        let views = views();
        let mut captured = entry("ev1", "Flamengo", "10");
        captured.bookmaker = Some("bet365".to_string());
        assert_eq!(
            build_request(&captured, &views, "k", "betmgm").unwrap().bookmaker,
            "bet365"
        );

        // Draw is listed for soccer but nobody quotes it.
        let unquoted = entry("ev1", "Draw", "10");
        assert_eq!(
            build_request(&unquoted, &views, "k", "betmgm").unwrap().bookmaker,
            "betmgm"
        );
    }

    #[test]
    fn build_request_sends_unparsable_stake_as_null() {
        let views = views();
        let request = build_request(&entry("ev1", "Flamengo", "abc"), &views, "k", "betmgm").unwrap();
        assert_eq!(request.valor, None);
    }

    #[test]
    fn report_counts() {
        let report = PlacementReport {
            results: vec![
                EntryResult {
                    market_name: "a".to_string(),
                    selection: "x".to_string(),
                    outcome: EntryOutcome::Placed,
                },
                EntryResult {
                    market_name: "a".to_string(),
                    selection: "y".to_string(),
                    outcome: EntryOutcome::Skipped,
                },
                EntryResult {
                    market_name: "a".to_string(),
                    selection: "z".to_string(),
                    outcome: EntryOutcome::Rejected {
                        message: "Saldo insuficiente".to_string(),
                    },
                },
            ],
            latest_balance: None,
        };

        assert_eq!(report.placed(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.rejected(), 1);
        assert_eq!(report.failed(), 0);
    }
}
