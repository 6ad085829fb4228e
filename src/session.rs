//! Betting session state.
//!
//! A [`Session`] owns everything the front end shows for one market: the
//! derived market views, the bet slip, the last known balance and the placed
//! bets. Every operation takes `&mut self`, so a response can only be applied
//! by the call that requested it.

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::betting::{liquidate_bet, place_slip, BetSlip, LiquidationResponse, PlacementReport, SlipEntry};
use crate::config::Config;
use crate::error::{AppError, Result, SlipError};
use crate::market::{BackendClient, PlacedBet, Sport};
use crate::odds::{build_market_views, MarketView};

/// State of one betting page.
#[derive(Debug)]
pub struct Session {
    client: BackendClient,
    sport: Sport,
    market_key: String,
    default_bookmaker: String,
    sport_title: Option<String>,
    views: Vec<MarketView>,
    slip: BetSlip,
    balance: Option<Decimal>,
    bets: Vec<PlacedBet>,
}

impl Session {
    /// New session for `market_key`; nothing is fetched yet.
    pub fn new(
        client: BackendClient,
        config: &Config,
        sport: Sport,
        market_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            sport,
            market_key: market_key.into(),
            default_bookmaker: config.default_bookmaker.clone(),
            sport_title: None,
            views: Vec::new(),
            slip: BetSlip::new(config.default_stake.clone()),
            balance: None,
            bets: Vec::new(),
        }
    }

    /// Fetch the market's events and rebuild the views.
    ///
    /// Errors are returned as-is: without events there is nothing to show.
    #[instrument(skip(self), fields(market = %self.market_key))]
    pub async fn load_events(&mut self) -> Result<usize> {
        let events = self.client.get_events(&self.market_key).await?;

        self.sport_title = events.iter().find_map(|e| e.sport_title.clone());
        self.views = build_market_views(&events, self.sport);

        info!(events = self.views.len(), "Market views loaded");
        Ok(self.views.len())
    }

    /// Re-read balance and placed bets.
    ///
    /// Failures keep the previous values and are only logged.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) {
        let (balance, bets) = tokio::join!(self.client.get_balance(), self.client.get_bets());

        match balance {
            Ok(balance) => self.balance = Some(balance),
            Err(e) => warn!(error = %e, "Balance refresh failed"),
        }

        match bets {
            Ok(bets) => self.bets = bets,
            Err(e) => warn!(error = %e, "Placed bets refresh failed"),
        }
    }

    /// Re-read the placed bets, failing when the backend cannot list them.
    #[instrument(skip(self))]
    pub async fn load_bets(&mut self) -> Result<usize> {
        self.bets = self.client.get_bets().await?;
        info!(count = self.bets.len(), "Placed bets loaded");
        Ok(self.bets.len())
    }

    /// Put choice `choice_index` of event `view_index` on the slip.
    pub fn select(&mut self, view_index: usize, choice_index: usize) -> Result<&SlipEntry> {
        let view = self
            .views
            .get(view_index)
            .ok_or(SlipError::UnknownEvent(view_index))?;
        let choice = view
            .choice(choice_index)
            .ok_or_else(|| SlipError::UnknownChoice {
                event_id: view.id.clone(),
                index: choice_index,
            })?;

        Ok(self.slip.select(view.id.clone(), view.title.clone(), choice))
    }

    /// Remove slip entry `index`.
    pub fn remove(&mut self, index: usize) -> Result<SlipEntry> {
        Ok(self.slip.remove(index)?)
    }

    /// Change the stake of slip entry `index`.
    pub fn set_stake(&mut self, index: usize, raw: &str) -> Result<&SlipEntry> {
        Ok(self.slip.set_stake(index, raw)?)
    }

    /// Deposit funds. Non-positive amounts are refused without a request.
    #[instrument(skip(self), fields(amount = %amount))]
    pub async fn deposit(&mut self, amount: Decimal) -> Result<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidAmount(amount));
        }

        let balance = self.client.deposit(amount).await?;
        self.balance = Some(balance);

        info!(balance = %balance, "Deposit completed");
        Ok(balance)
    }

    /// Submit the slip; see [`place_slip`].
    ///
    /// Placed bets are re-read when at least one bet was accepted.
    pub async fn place_slip(&mut self) -> PlacementReport {
        let report = place_slip(
            &self.client,
            &self.views,
            &mut self.slip,
            &self.market_key,
            &self.default_bookmaker,
        )
        .await;

        if let Some(balance) = report.latest_balance {
            self.balance = Some(balance);
        }

        if report.placed() > 0 {
            self.refresh().await;
        }

        report
    }

    /// Settle a pending bet by its displayed id.
    ///
    /// Balance and bets are re-read whether the backend accepts or refuses.
    #[instrument(skip(self))]
    pub async fn liquidate(&mut self, bet_id: &str) -> Result<LiquidationResponse> {
        let bet = self
            .bets
            .iter()
            .find(|b| b.id.to_string() == bet_id)
            .ok_or_else(|| AppError::BetNotFound(bet_id.to_string()))?;

        if !bet.status.is_pending() {
            return Err(AppError::BetNotPending {
                id: bet_id.to_string(),
                status: bet.status.to_string(),
            });
        }

        let id = bet.id.clone();
        let result = liquidate_bet(&self.client, &id).await;
        self.refresh().await;

        Ok(result?)
    }

    /// Page heading: the backend's sport title, or a generic one.
    pub fn heading(&self) -> String {
        self.sport_title
            .clone()
            .unwrap_or_else(|| format!("Eventos para {}", self.sport.display_name()))
    }

    /// Market key events are loaded from.
    pub fn market_key(&self) -> &str {
        &self.market_key
    }

    /// Current market views.
    pub fn views(&self) -> &[MarketView] {
        &self.views
    }

    /// The bet slip.
    pub fn slip(&self) -> &BetSlip {
        &self.slip
    }

    /// Last known balance.
    pub fn balance(&self) -> Option<Decimal> {
        self.balance
    }

    /// Last fetched placed bets.
    pub fn bets(&self) -> &[PlacedBet] {
        &self.bets
    }
}
