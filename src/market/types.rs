//! Market and event types as served by the betting backend.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Sport the user is betting on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Sport {
    /// Soccer. Head-to-head markets include a draw.
    #[strum(to_string = "futebol", serialize = "soccer")]
    #[default]
    Futebol,
    /// Basketball. No draw outcome.
    #[strum(to_string = "basquete", serialize = "basketball")]
    Basquete,
}

impl Sport {
    /// Market group the backend uses for this sport.
    pub fn group(&self) -> &'static str {
        match self {
            Sport::Futebol => "Soccer",
            Sport::Basquete => "Basketball",
        }
    }

    /// Whether head-to-head markets offer a draw.
    pub fn allows_draw(&self) -> bool {
        matches!(self, Sport::Futebol)
    }

    /// Unit counted by totals markets.
    pub fn totals_unit(&self) -> &'static str {
        match self {
            Sport::Futebol => "gols",
            Sport::Basquete => "pontos",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Sport::Futebol => "Futebol",
            Sport::Basquete => "Basquete",
        }
    }
}

/// Market type tag on bookmaker markets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarketType {
    /// Head-to-head winner.
    H2h,
    /// Over/under a numeric line.
    Totals,
}

impl MarketType {
    /// Key used in bookmaker market lists.
    pub fn key(&self) -> &'static str {
        match self {
            MarketType::H2h => "h2h",
            MarketType::Totals => "totals",
        }
    }
}

/// One bookmaker's price for one outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Outcome name ("Home FC", "Draw", "Over", ...).
    pub name: String,
    /// Decimal odds.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Line for totals markets.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub point: Option<Decimal>,
    /// Source bookmaker, when the backend annotates it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmaker: Option<String>,
}

impl Quote {
    /// Quote without a line.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            point: None,
            bookmaker: None,
        }
    }

    /// Quote on a totals line.
    pub fn with_point(name: impl Into<String>, price: Decimal, point: Decimal) -> Self {
        Self {
            point: Some(point),
            ..Self::new(name, price)
        }
    }
}

/// A bookmaker market: all quotes of one market type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookMarket {
    /// Market key ("h2h", "totals").
    pub key: String,
    /// Quotes in this market.
    #[serde(default)]
    pub outcomes: Vec<Quote>,
}

/// One bookmaker and its markets for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmaker {
    /// Bookmaker key ("betmgm").
    pub key: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Markets offered.
    #[serde(default)]
    pub markets: Vec<BookMarket>,
}

/// A sporting event with bookmaker quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier.
    pub id: String,
    /// Sport key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_key: Option<String>,
    /// Sport title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_title: Option<String>,
    /// Start time, RFC 3339.
    pub commence_time: String,
    /// Home participant.
    pub home_team: String,
    /// Away participant.
    pub away_team: String,
    /// Bookmakers quoting this event.
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

impl Event {
    /// Parsed start time, if the backend sent a valid RFC 3339 timestamp.
    pub fn starts_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.commence_time, &Rfc3339).ok()
    }
}

/// Market listing entry from `GET /mercados`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInfo {
    /// Market key passed to `/eventos`.
    pub key: String,
    /// Display title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Sport group ("Soccer", "Basketball").
    #[serde(default)]
    pub group: String,
}

/// Keep only the markets belonging to a sport; `None` keeps everything.
pub fn filter_markets(markets: &[MarketInfo], sport: Option<Sport>) -> Vec<MarketInfo> {
    markets
        .iter()
        .filter(|m| sport.map_or(true, |s| m.group == s.group()))
        .cloned()
        .collect()
}

/// Placed bet identifier. The backend may use numbers or strings; whichever
/// it sends is echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BetId {
    /// Numeric id.
    Number(i64),
    /// String id.
    Text(String),
}

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetId::Number(n) => write!(f, "{}", n),
            BetId::Text(s) => f.write_str(s),
        }
    }
}

/// Settlement status of a placed bet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BetStatus {
    /// Awaiting liquidation.
    Pending,
    /// Settled as a win.
    Won,
    /// Settled as a loss.
    Lost,
    /// Any other status string, kept verbatim.
    Other(String),
}

impl BetStatus {
    /// Whether the bet can still be liquidated.
    pub fn is_pending(&self) -> bool {
        matches!(self, BetStatus::Pending)
    }

    /// Wire form.
    pub fn as_str(&self) -> &str {
        match self {
            BetStatus::Pending => "pendente",
            BetStatus::Won => "ganhou",
            BetStatus::Lost => "perdeu",
            BetStatus::Other(s) => s,
        }
    }
}

impl From<String> for BetStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pendente" => BetStatus::Pending,
            "ganhou" => BetStatus::Won,
            "perdeu" => BetStatus::Lost,
            _ => BetStatus::Other(s),
        }
    }
}

impl From<BetStatus> for String {
    fn from(status: BetStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bet held by the backend, as returned by `GET /apostas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBet {
    /// Bet identifier.
    pub id: BetId,
    /// Market type ("h2h", "totals").
    pub market: String,
    /// Outcome the bet is on.
    pub outcome: String,
    /// Odds the bet was taken at.
    #[serde(with = "rust_decimal::serde::float")]
    pub multiplier: Decimal,
    /// Stake.
    #[serde(with = "rust_decimal::serde::float")]
    pub valor: Decimal,
    /// Settlement status.
    pub status: BetStatus,
}

impl PlacedBet {
    /// Payout if the bet wins; `None` when it does not fit a `Decimal`.
    pub fn potential_payout(&self) -> Option<Decimal> {
        self.valor.checked_mul(self.multiplier)
    }
}
