//! Interactive betting shell.
//!
//! Reads one command per line from stdin and runs it against a [`Session`].
//! Each command races Ctrl-C and an interrupted command is dropped. Requests
//! already sent may have reached the backend; slip entries leave the slip as
//! they are sent, so an interrupted `place` never resubmits them.

use std::io::Write as _;
use std::str::FromStr;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::betting::parse_amount;
use crate::error::Result;
use crate::odds::MarketView;
use crate::render;
use crate::session::Session;

/// Shell help text.
pub const HELP: &str = "\
Commands:
  events                 list events and numbered choices
  pick <event> <choice>  add a choice to the slip
  rm <entry>             remove a slip entry
  stake <entry> <value>  change an entry's stake
  slip                   show the slip
  place                  submit every slip entry
  balance                show the balance
  deposit <value>        add funds
  bets                   list placed bets
  settle <bet id>        liquidate a pending bet
  refresh                re-read balance and bets
  reload                 re-read events
  help                   this text
  quit                   leave";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Print help.
    Help,
    /// Render market views.
    Events,
    /// Select choice of an event.
    Pick {
        /// Event index.
        event: usize,
        /// Choice index within the event.
        choice: usize,
    },
    /// Remove a slip entry.
    Remove(usize),
    /// Edit a slip entry's stake.
    Stake {
        /// Slip entry index.
        entry: usize,
        /// Raw stake text, kept as typed.
        value: String,
    },
    /// Render the slip.
    Slip,
    /// Submit the slip.
    Place,
    /// Show the balance.
    Balance,
    /// Deposit raw amount text.
    Deposit(String),
    /// Render placed bets.
    Bets,
    /// Liquidate a bet by its displayed id.
    Settle(String),
    /// Re-read balance and bets.
    Refresh,
    /// Re-read events.
    Reload,
    /// Leave the shell.
    Quit,
}

/// Why a line is not a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    /// Blank line.
    #[error("empty command")]
    Empty,
    /// First word is not a command.
    #[error("unknown command '{0}', type 'help'")]
    Unknown(String),
    /// Known command with bad arguments.
    #[error("usage: {0}")]
    Usage(&'static str),
}

fn index(arg: Option<&str>, usage: &'static str) -> std::result::Result<usize, ParseCommandError> {
    arg.and_then(|a| a.parse().ok())
        .ok_or(ParseCommandError::Usage(usage))
}

impl FromStr for ShellCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(ParseCommandError::Empty);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "help" | "?" => ShellCommand::Help,
            "events" | "ls" => ShellCommand::Events,
            "pick" => {
                const USAGE: &str = "pick <event> <choice>";
                ShellCommand::Pick {
                    event: index(words.next(), USAGE)?,
                    choice: index(words.next(), USAGE)?,
                }
            }
            "rm" => ShellCommand::Remove(index(words.next(), "rm <entry>")?),
            "stake" => {
                const USAGE: &str = "stake <entry> <value>";
                let entry = index(words.next(), USAGE)?;
                // Stakes are free text; anything after the index is the value.
                let value = words.collect::<Vec<_>>().join(" ");
                ShellCommand::Stake { entry, value }
            }
            "slip" => ShellCommand::Slip,
            "place" => ShellCommand::Place,
            "balance" => ShellCommand::Balance,
            "deposit" => ShellCommand::Deposit(
                words
                    .next()
                    .ok_or(ParseCommandError::Usage("deposit <value>"))?
                    .to_string(),
            ),
            "bets" => ShellCommand::Bets,
            "settle" => ShellCommand::Settle(
                words
                    .next()
                    .ok_or(ParseCommandError::Usage("settle <bet id>"))?
                    .to_string(),
            ),
            "refresh" => ShellCommand::Refresh,
            "reload" => ShellCommand::Reload,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(ParseCommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

/// A selection given on the command line as `<event>/<choice>[=stake]`.
///
/// Event is an event id or its index; choice is a label or its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    /// Event id or index.
    pub event: String,
    /// Choice label or index.
    pub choice: String,
    /// Stake replacing the default one.
    pub stake: Option<String>,
}

impl FromStr for Pick {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let (selection, stake) = match raw.split_once('=') {
            Some((selection, stake)) => (selection, Some(stake.trim().to_string())),
            None => (raw, None),
        };
        let (event, choice) = selection
            .split_once('/')
            .map(|(e, c)| (e.trim(), c.trim()))
            .filter(|(e, c)| !e.is_empty() && !c.is_empty())
            .ok_or_else(|| format!("expected <event>/<choice>[=stake], got '{}'", raw))?;

        Ok(Self {
            event: event.to_string(),
            choice: choice.to_string(),
            stake,
        })
    }
}

impl Pick {
    /// Event and choice indices in `views`. Ids and labels win over indices.
    pub fn resolve(&self, views: &[MarketView]) -> Option<(usize, usize)> {
        let event = views.iter().position(|v| v.id == self.event).or_else(|| {
            self.event
                .parse::<usize>()
                .ok()
                .filter(|i| *i < views.len())
        })?;

        let view = &views[event];
        let choice = view
            .choices()
            .position(|c| c.label == self.choice)
            .or_else(|| {
                self.choice
                    .parse::<usize>()
                    .ok()
                    .filter(|i| view.choice(*i).is_some())
            })?;

        Some((event, choice))
    }
}

/// Run one command and return what to print.
pub async fn execute(session: &mut Session, command: ShellCommand) -> String {
    match command {
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Events => {
            render::render_views(&session.heading(), session.views(), session.slip())
        }
        ShellCommand::Pick { event, choice } => match session.select(event, choice) {
            Ok(entry) => format!(
                "Added {} ({}) @ {}, stake R$ {}",
                entry.selection, entry.market_name, entry.odds, entry.stake
            ),
            Err(e) => format!("Error: {}", e),
        },
        ShellCommand::Remove(index) => match session.remove(index) {
            Ok(entry) => format!("Removed {} ({})", entry.selection, entry.market_name),
            Err(e) => format!("Error: {}", e),
        },
        ShellCommand::Stake { entry, value } => match session.set_stake(entry, &value) {
            Ok(entry) => format!(
                "{}: stake R$ {}, potential win R$ {}",
                entry.selection,
                entry.stake,
                entry.potential_win()
            ),
            Err(e) => format!("Error: {}", e),
        },
        ShellCommand::Slip => render::render_slip(session.slip()),
        ShellCommand::Place => {
            if session.slip().is_empty() {
                return "Slip is empty.".to_string();
            }
            let report = session.place_slip().await;
            render::render_report(&report)
        }
        ShellCommand::Balance => {
            session.refresh().await;
            render::render_balance(session.balance())
        }
        ShellCommand::Deposit(raw) => {
            let Some(amount) = parse_amount(&raw) else {
                return format!("Error: '{}' is not an amount", raw);
            };
            match session.deposit(amount).await {
                Ok(balance) => render::render_balance(Some(balance)),
                Err(e) => format!("Error: {}", e),
            }
        }
        ShellCommand::Bets => render::render_bets(session.bets()),
        ShellCommand::Settle(id) => match session.liquidate(&id).await {
            Ok(response) if response.message.is_empty() => format!("Bet {} liquidated", id),
            Ok(response) => format!("Bet {}: {}", id, response.message),
            Err(e) => format!("Error: {}", e),
        },
        ShellCommand::Refresh => {
            session.refresh().await;
            format!(
                "{}\n{} placed bet(s)",
                render::render_balance(session.balance()),
                session.bets().len()
            )
        }
        ShellCommand::Reload => match session.load_events().await {
            Ok(n) => format!("{} event(s) loaded", n),
            Err(e) => format!("Error: {}", e),
        },
        ShellCommand::Quit => String::new(),
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Read and run commands until `quit`, end of input or Ctrl-C at the prompt.
pub async fn run(session: &mut Session) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    loop {
        prompt();

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let command = match line.parse::<ShellCommand>() {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => command,
            Err(ParseCommandError::Empty) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        debug!(?command, "Shell command");
        tokio::select! {
            output = execute(session, command) => println!("{}", output.trim_end()),
            _ = tokio::signal::ctrl_c() => {
                println!("\nInterrupted; requests already sent may have been applied.")
            }
        }
    }

    Ok(())
}
