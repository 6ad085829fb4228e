//! The bet slip: selections waiting to be placed.

use rust_decimal::Decimal;

use super::stake::{amount_or_zero, format_amount, potential_win, sanitize_stake};
use crate::error::SlipError;
use crate::market::types::MarketType;
use crate::odds::OutcomeChoice;

/// Stake given to new entries when none is configured.
pub const DEFAULT_STAKE: &str = "10";

/// One pending selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlipEntry {
    /// Event the selection belongs to.
    pub market_id: String,
    /// Event title at selection time.
    pub market_name: String,
    /// Choice label.
    pub selection: String,
    /// Odds at selection time, as displayed.
    pub odds: String,
    /// Stake as typed.
    pub stake: String,
    /// Market type at selection time.
    pub kind: MarketType,
    /// Bookmaker quoting the odds at selection time.
    pub bookmaker: Option<String>,
}

impl SlipEntry {
    /// What this entry returns if it wins, two decimals.
    pub fn potential_win(&self) -> String {
        potential_win(&self.stake, &self.odds)
    }
}

/// Ordered list of pending selections.
///
/// Entries are never deduplicated: picking the same outcome twice yields two
/// lines, each with its own stake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetSlip {
    entries: Vec<SlipEntry>,
    default_stake: String,
}

impl Default for BetSlip {
    fn default() -> Self {
        Self::new(DEFAULT_STAKE)
    }
}

impl BetSlip {
    /// Empty slip whose new entries start at `default_stake`.
    pub fn new(default_stake: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            default_stake: default_stake.into(),
        }
    }

    /// Append a selection with the default stake.
    pub fn select(
        &mut self,
        event_id: impl Into<String>,
        event_label: impl Into<String>,
        choice: &OutcomeChoice,
    ) -> &SlipEntry {
        self.entries.push(SlipEntry {
            market_id: event_id.into(),
            market_name: event_label.into(),
            selection: choice.label.clone(),
            odds: choice.odds.clone(),
            stake: self.default_stake.clone(),
            kind: choice.kind,
            bookmaker: choice.bookmaker.clone(),
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Remove the entry at `index`, keeping the order of the rest.
    pub fn remove(&mut self, index: usize) -> Result<SlipEntry, SlipError> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    /// Set the stake of the entry at `index`.
    ///
    /// Unparsable or negative input is stored as `"0"`, anything else
    /// verbatim.
    pub fn set_stake(&mut self, index: usize, raw: &str) -> Result<&SlipEntry, SlipError> {
        self.check_index(index)?;
        let entry = &mut self.entries[index];
        entry.stake = sanitize_stake(raw);
        Ok(entry)
    }

    /// Sum of all stakes, two decimals. Unparsable stakes count as zero; the
    /// sum saturates at the largest representable amount.
    pub fn total_stake(&self) -> String {
        let total = self
            .entries
            .iter()
            .map(|e| amount_or_zero(&e.stake))
            .fold(Decimal::ZERO, Decimal::saturating_add);
        format_amount(total)
    }

    /// Whether this choice of this event is already on the slip.
    pub fn is_selected(&self, event_id: &str, label: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.market_id == event_id && e.selection == label)
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&SlipEntry> {
        self.entries.get(index)
    }

    /// All entries in slip order.
    pub fn entries(&self) -> &[SlipEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the slip is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take the oldest entry off the slip.
    pub fn pop_front(&mut self) -> Option<SlipEntry> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn check_index(&self, index: usize) -> Result<(), SlipError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(SlipError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}
