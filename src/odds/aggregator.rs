//! Best-price selection across bookmakers.

use rust_decimal::Decimal;

use crate::market::types::{Event, MarketType};

/// Best price found for one outcome of one market type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BestOffer {
    /// Highest quoted price, zero when nobody quotes the outcome.
    pub price: Decimal,
    /// Line carried by the winning quote. Always zero outside totals markets.
    pub point: Decimal,
    /// Bookmaker that quoted the winning price.
    pub bookmaker: Option<String>,
}

impl BestOffer {
    /// Whether any bookmaker quoted the outcome at a positive price.
    pub fn is_offered(&self) -> bool {
        self.price > Decimal::ZERO
    }
}

/// Scan every bookmaker's `market_type` markets for `outcome_name` and keep
/// the highest price.
///
/// Names match exactly. Only a strictly greater price replaces the current
/// best, so on ties the first quote in bookmaker order wins and its line is
/// the one reported.
pub fn best_offer(event: &Event, outcome_name: &str, market_type: MarketType) -> BestOffer {
    let mut best = BestOffer::default();

    for bookmaker in &event.bookmakers {
        let quotes = bookmaker
            .markets
            .iter()
            .filter(|m| m.key == market_type.key())
            .flat_map(|m| m.outcomes.iter())
            .filter(|q| q.name == outcome_name);

        for quote in quotes {
            if quote.price > best.price {
                best.price = quote.price;
                best.bookmaker = Some(
                    quote
                        .bookmaker
                        .clone()
                        .unwrap_or_else(|| bookmaker.key.clone()),
                );
                if market_type == MarketType::Totals {
                    best.point = quote.point.unwrap_or(Decimal::ZERO);
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::types::{BookMarket, Bookmaker, Quote};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn bookmaker(key: &str, markets: Vec<BookMarket>) -> Bookmaker {
        Bookmaker {
            key: key.to_string(),
            title: None,
            markets,
        }
    }

    fn market(key: &str, outcomes: Vec<Quote>) -> BookMarket {
        BookMarket {
            key: key.to_string(),
            outcomes,
        }
    }

    fn event(bookmakers: Vec<Bookmaker>) -> Event {
        Event {
            id: "ev1".to_string(),
            sport_key: None,
            sport_title: None,
            commence_time: "2024-11-20T19:00:00Z".to_string(),
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            bookmakers,
        }
    }

    #[test]
    fn picks_highest_price_across_bookmakers() {
        let ev = event(vec![
            bookmaker("a", vec![market("h2h", vec![Quote::new("Home", dec!(1.90))])]),
            bookmaker("b", vec![market("h2h", vec![Quote::new("Home", dec!(2.10))])]),
        ]);

        let best = best_offer(&ev, "Home", MarketType::H2h);
        assert_eq!(best.price, dec!(2.10));
        assert_eq!(best.bookmaker.as_deref(), Some("b"));
        assert_eq!(best.point, Decimal::ZERO);
    }

    #[test]
    fn no_matching_quote_yields_zero() {
        let ev = event(vec![bookmaker(
            "a",
            vec![market("h2h", vec![Quote::new("Away", dec!(3.0))])],
        )]);

        assert_eq!(best_offer(&ev, "Home", MarketType::H2h), BestOffer::default());
        assert_eq!(best_offer(&ev, "Away", MarketType::Totals), BestOffer::default());
        assert_eq!(best_offer(&event(vec![]), "Home", MarketType::H2h).price, Decimal::ZERO);
        assert!(!best_offer(&ev, "Home", MarketType::H2h).is_offered());
    }

    #[test]
    fn names_match_exactly() {
        let ev = event(vec![bookmaker(
            "a",
            vec![market("h2h", vec![Quote::new("home", dec!(5.0))])],
        )]);

        assert_eq!(best_offer(&ev, "Home", MarketType::H2h).price, Decimal::ZERO);
    }

    #[test]
    fn totals_point_follows_winning_quote() {
        let ev = event(vec![
            bookmaker(
                "a",
                vec![market("totals", vec![Quote::with_point("Over", dec!(1.80), dec!(2.5))])],
            ),
            bookmaker(
                "b",
                vec![market("totals", vec![Quote::with_point("Over", dec!(1.95), dec!(3.5))])],
            ),
        ]);

        let best = best_offer(&ev, "Over", MarketType::Totals);
        assert_eq!(best.price, dec!(1.95));
        assert_eq!(best.point, dec!(3.5));
    }

    #[test]
    fn ties_keep_first_seen_point() {
        let ev = event(vec![
            bookmaker(
                "a",
                vec![market("totals", vec![Quote::with_point("Over", dec!(1.90), dec!(2.5))])],
            ),
            bookmaker(
                "b",
                vec![market("totals", vec![Quote::with_point("Over", dec!(1.90), dec!(3.5))])],
            ),
        ]);

        let best = best_offer(&ev, "Over", MarketType::Totals);
        assert_eq!(best.point, dec!(2.5));
        assert_eq!(best.bookmaker.as_deref(), Some("a"));
    }

    #[test]
    fn h2h_ignores_points() {
        let ev = event(vec![bookmaker(
            "a",
            vec![market("h2h", vec![Quote::with_point("Home", dec!(2.0), dec!(1.5))])],
        )]);

        assert_eq!(best_offer(&ev, "Home", MarketType::H2h).point, Decimal::ZERO);
    }

    #[test]
    fn quote_level_bookmaker_wins_over_container() {
        let mut quote = Quote::new("Home", dec!(2.0));
        quote.bookmaker = Some("pinnacle".to_string());
        let ev = event(vec![bookmaker("aggregated", vec![market("h2h", vec![quote])])]);

        assert_eq!(
            best_offer(&ev, "Home", MarketType::H2h).bookmaker.as_deref(),
            Some("pinnacle")
        );
    }
}
