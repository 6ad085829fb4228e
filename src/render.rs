//! Plain-text rendering of market views, the slip and placed bets.

use std::fmt::Write;

use rust_decimal::Decimal;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::betting::{format_amount, BetSlip, EntryOutcome, PlacementReport};
use crate::market::{MarketInfo, PlacedBet};
use crate::odds::MarketView;

/// Format a start time as "2024-11-20 19:00 UTC".
pub fn format_start_time(starts_at: Option<OffsetDateTime>, raw: &str) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute] UTC");
    starts_at
        .and_then(|t| t.to_offset(time::UtcOffset::UTC).format(&format).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// Balance line; "Loading..." until the first fetch succeeds.
pub fn render_balance(balance: Option<Decimal>) -> String {
    match balance {
        Some(b) => format!("Balance: R$ {}", format_amount(b)),
        None => "Balance: Loading...".to_string(),
    }
}

/// Market listing with keys.
pub fn render_markets(markets: &[MarketInfo]) -> String {
    let mut out = String::new();
    if markets.is_empty() {
        out.push_str("No markets available.\n");
    }
    for m in markets {
        let _ = writeln!(out, "{:<32} {}", m.key, m.title);
        if !m.description.is_empty() {
            let _ = writeln!(out, "{:<32} {}", "", m.description);
        }
    }
    out
}

/// Numbered events and choices; choices already on the slip are starred.
pub fn render_views(heading: &str, views: &[MarketView], slip: &BetSlip) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading);
    if views.is_empty() {
        out.push_str("  No events.\n");
    }

    for (i, view) in views.iter().enumerate() {
        let _ = writeln!(out, "[{}] {}", i, view.title);
        let _ = writeln!(
            out,
            "    A partida começa às: {}",
            format_start_time(view.starts_at, &view.commence_time)
        );

        let mut n = 0;
        for (section, options) in [
            ("Confronto Direto", &view.h2h_options),
            ("Totais", &view.totals_options),
        ] {
            if options.is_empty() {
                continue;
            }
            let _ = writeln!(out, "    {}", section);
            for choice in options {
                let mark = if slip.is_selected(&view.id, &choice.label) {
                    "*"
                } else {
                    " "
                };
                let _ = writeln!(out, "     {}{:>2}) {:<32} {}", mark, n, choice.label, choice.odds);
                n += 1;
            }
        }
    }
    out
}

/// The slip with stakes, potential wins and total.
pub fn render_slip(slip: &BetSlip) -> String {
    let mut out = String::from("Apostas\n");
    if slip.is_empty() {
        out.push_str("  Slip is empty.\n");
        return out;
    }

    for (i, entry) in slip.entries().iter().enumerate() {
        let _ = writeln!(out, "[{}] {}", i, entry.market_name);
        let _ = writeln!(out, "    {} @ {}", entry.selection, entry.odds);
        let _ = writeln!(
            out,
            "    Aposta R$ {}  Ganho potencial: R$ {}",
            entry.stake,
            entry.potential_win()
        );
    }

    let n = slip.len();
    let _ = writeln!(out, "Total a ser apostado: R$ {}", slip.total_stake());
    let _ = writeln!(out, "Fazer {} aposta{}", n, if n != 1 { "s" } else { "" });
    out
}

/// Placed bets with their status.
pub fn render_bets(bets: &[PlacedBet]) -> String {
    let mut out = String::from("Apostas feitas\n");
    if bets.is_empty() {
        out.push_str("  No bets yet.\n");
    }
    for bet in bets {
        let _ = writeln!(
            out,
            "#{:<6} {:<7} {} @ {}  Valor apostado: R$ {}  Status: {}",
            bet.id.to_string(),
            bet.market,
            bet.outcome,
            bet.multiplier,
            format_amount(bet.valor),
            bet.status
        );
    }
    out
}

/// One line per submitted slip entry.
pub fn render_report(report: &PlacementReport) -> String {
    let mut out = String::new();
    for result in &report.results {
        let line = match &result.outcome {
            EntryOutcome::Placed => format!("Aposta feita em {}", result.selection),
            EntryOutcome::Rejected { message } => {
                format!("Erro ao apostar em {}: {}", result.selection, message)
            }
            EntryOutcome::Failed { error } => {
                format!("Erro ao apostar em {}: {}", result.selection, error)
            }
            EntryOutcome::Skipped => format!(
                "{} ({}) no longer available, skipped",
                result.selection, result.market_name
            ),
        };
        let _ = writeln!(out, "{}", line);
    }
    if let Some(balance) = report.latest_balance {
        let _ = writeln!(out, "{}", render_balance(Some(balance)));
    }
    out
}
