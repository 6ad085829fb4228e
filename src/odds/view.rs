//! Selectable market views derived from backend events.

use rust_decimal::Decimal;
use time::OffsetDateTime;

use super::aggregator::best_offer;
use crate::betting::stake::format_amount;
use crate::market::types::{Event, MarketType, Sport};

/// Outcome name of a draw in head-to-head markets.
pub const DRAW: &str = "Draw";
/// Outcome name of the upper side of a totals line.
pub const OVER: &str = "Over";
/// Outcome name of the lower side of a totals line.
pub const UNDER: &str = "Under";

/// One button the user can pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeChoice {
    /// Label shown to the user and used as the bet's outcome.
    pub label: String,
    /// Outcome name as quoted by bookmakers.
    pub outcome: String,
    /// Best price.
    pub price: Decimal,
    /// Best price, two decimals.
    pub odds: String,
    /// Market this choice belongs to.
    pub kind: MarketType,
    /// Bookmaker quoting the best price.
    pub bookmaker: Option<String>,
}

/// Everything the user can bet on for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketView {
    /// Event id.
    pub id: String,
    /// "Home vs Away".
    pub title: String,
    /// Start time as sent by the backend.
    pub commence_time: String,
    /// Parsed start time.
    pub starts_at: Option<OffsetDateTime>,
    /// Head-to-head choices: home, optional draw, away.
    pub h2h_options: Vec<OutcomeChoice>,
    /// Over/under choices; empty when no line is quoted.
    pub totals_options: Vec<OutcomeChoice>,
}

impl MarketView {
    /// Head-to-head choices followed by totals choices.
    pub fn choices(&self) -> impl Iterator<Item = &OutcomeChoice> {
        self.h2h_options.iter().chain(self.totals_options.iter())
    }

    /// Choice at a position of [`MarketView::choices`].
    pub fn choice(&self, index: usize) -> Option<&OutcomeChoice> {
        self.choices().nth(index)
    }

    /// Choice with this label.
    pub fn find_choice(&self, label: &str) -> Option<&OutcomeChoice> {
        self.choices().find(|c| c.label == label)
    }
}

fn choice(event: &Event, label: String, outcome: &str, kind: MarketType) -> OutcomeChoice {
    let best = best_offer(event, outcome, kind);
    OutcomeChoice {
        label,
        outcome: outcome.to_string(),
        odds: format_amount(best.price),
        price: best.price,
        kind,
        bookmaker: best.bookmaker,
    }
}

/// Derive the view of one event for a sport.
pub fn market_view(event: &Event, sport: Sport) -> MarketView {
    let home = event.home_team.as_str();
    let away = event.away_team.as_str();

    let mut h2h_options = vec![choice(event, home.to_string(), home, MarketType::H2h)];
    if sport.allows_draw() {
        h2h_options.push(choice(event, DRAW.to_string(), DRAW, MarketType::H2h));
    }
    h2h_options.push(choice(event, away.to_string(), away, MarketType::H2h));

    let line = best_offer(event, OVER, MarketType::Totals).point;
    let totals_options = if line > Decimal::ZERO {
        let line = line.normalize();
        let unit = sport.totals_unit();
        vec![
            choice(
                event,
                format!("Mais do que {} {}", line, unit),
                OVER,
                MarketType::Totals,
            ),
            choice(
                event,
                format!("Menos do que {} {}", line, unit),
                UNDER,
                MarketType::Totals,
            ),
        ]
    } else {
        Vec::new()
    };

    MarketView {
        id: event.id.clone(),
        title: format!("{} vs {}", home, away),
        commence_time: event.commence_time.clone(),
        starts_at: event.starts_at(),
        h2h_options,
        totals_options,
    }
}

/// Derive views for every event, in order.
pub fn build_market_views(events: &[Event], sport: Sport) -> Vec<MarketView> {
    events.iter().map(|e| market_view(e, sport)).collect()
}

/// View with this event id.
pub fn find_view<'a>(views: &'a [MarketView], event_id: &str) -> Option<&'a MarketView> {
    views.iter().find(|v| v.id == event_id)
}
