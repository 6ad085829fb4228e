//! Betmaster betting client entry point.

use std::net::SocketAddr;

use anyhow::{anyhow, bail, Context};
use clap::{Args as ClapArgs, Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use betmaster::api;
use betmaster::betting::parse_amount;
use betmaster::config::Config;
use betmaster::market::{filter_markets, BackendClient, Sport};
use betmaster::metrics;
use betmaster::render;
use betmaster::session::Session;
use betmaster::shell::{self, Pick};

/// Betting client: best-odds market views, bet slip and bet placement.
#[derive(Parser, Debug)]
#[command(name = "betmaster")]
#[command(about = "Sports betting client for a betmaster backend")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

/// Market and sport selection shared by event-driven commands.
#[derive(ClapArgs, Debug, Clone)]
struct MarketArgs {
    /// Market key, as listed by `markets`.
    #[arg(short, long, env = "BETMASTER_MARKET")]
    market: String,

    /// Sport: futebol or basquete.
    #[arg(short, long, env = "BETMASTER_SPORT", default_value = "futebol")]
    sport: Sport,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List markets, optionally for one sport.
    Markets {
        /// Sport: futebol or basquete.
        #[arg(short, long)]
        sport: Option<Sport>,
    },

    /// Show a market's events with the best odds per choice.
    Events(MarketArgs),

    /// Show the account balance.
    Balance,

    /// Add funds.
    Deposit {
        /// Amount to deposit.
        amount: String,
    },

    /// List placed bets.
    Bets,

    /// Settle a pending bet.
    Liquidate {
        /// Bet id, as listed by `bets`.
        id: String,
    },

    /// Build a slip from picks and submit it.
    Place {
        #[command(flatten)]
        market: MarketArgs,

        /// Selection as <event>/<choice>[=stake]; repeatable.
        #[arg(short, long = "pick", required = true)]
        picks: Vec<Pick>,
    },

    /// Interactive betting session.
    Shell(MarketArgs),

    /// Check configuration validity.
    CheckConfig,

    /// Serve an in-memory sandbox backend with demo markets.
    Sandbox {
        /// Port to listen on; defaults to SANDBOX_PORT.
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging; stdout is reserved for command output
    let filter = if args.verbose || config.verbose {
        EnvFilter::new("betmaster=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if args.json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }

    // Initialize metrics
    metrics::init_metrics();

    match args.command {
        Command::CheckConfig => cmd_check_config(&config),
        Command::Sandbox { port } => cmd_sandbox(&config, port).await,
        Command::Markets { sport } => {
            let markets = connect(&config)?.get_markets().await?;
            print!("{}", render::render_markets(&filter_markets(&markets, sport)));
            Ok(())
        }
        Command::Events(m) => {
            let mut session = Session::new(connect(&config)?, &config, m.sport, m.market);
            session.load_events().await?;
            print!(
                "{}",
                render::render_views(&session.heading(), session.views(), session.slip())
            );
            Ok(())
        }
        Command::Balance => {
            let balance = connect(&config)?.get_balance().await?;
            println!("{}", render::render_balance(Some(balance)));
            Ok(())
        }
        Command::Deposit { amount } => {
            let value = parse_amount(&amount)
                .filter(|a| *a > Decimal::ZERO)
                .ok_or_else(|| anyhow!("'{}' is not a positive amount", amount))?;
            let balance = connect(&config)?.deposit(value).await?;
            println!("{}", render::render_balance(Some(balance)));
            Ok(())
        }
        Command::Bets => {
            let bets = connect(&config)?.get_bets().await?;
            print!("{}", render::render_bets(&bets));
            Ok(())
        }
        Command::Liquidate { id } => cmd_liquidate(&config, &id).await,
        Command::Place { market, picks } => cmd_place(&config, market, &picks).await,
        Command::Shell(m) => cmd_shell(&config, m).await,
    }
}

/// Validated config to backend client.
fn connect(config: &Config) -> anyhow::Result<BackendClient> {
    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {}", e))?;
    Ok(BackendClient::new(config)?)
}

/// Interactive session on one market.
async fn cmd_shell(config: &Config, market: MarketArgs) -> anyhow::Result<()> {
    let mut session = Session::new(connect(config)?, config, market.sport, market.market);
    session.load_events().await?;
    session.refresh().await;

    println!("{}", render::render_balance(session.balance()));
    print!(
        "{}",
        render::render_views(&session.heading(), session.views(), session.slip())
    );
    shell::run(&mut session).await?;

    Ok(())
}

/// Settle one bet; only bets listed as pending are sent.
async fn cmd_liquidate(config: &Config, id: &str) -> anyhow::Result<()> {
    // Liquidation does not depend on a market.
    let mut session = Session::new(connect(config)?, config, Sport::default(), String::new());
    session
        .load_bets()
        .await
        .context("failed to list placed bets")?;

    let response = session.liquidate(id).await?;
    if response.message.is_empty() {
        println!("Bet {} liquidated", id);
    } else {
        println!("Bet {}: {}", id, response.message);
    }
    println!("{}", render::render_balance(session.balance()));

    Ok(())
}

/// Put every pick on a fresh slip and submit it.
async fn cmd_place(config: &Config, market: MarketArgs, picks: &[Pick]) -> anyhow::Result<()> {
    let mut session = Session::new(connect(config)?, config, market.sport, market.market);
    session.load_events().await?;

    for pick in picks {
        let (event, choice) = pick
            .resolve(session.views())
            .ok_or_else(|| anyhow!("no choice '{}' on event '{}'", pick.choice, pick.event))?;
        let index = session.slip().len();
        session.select(event, choice)?;
        if let Some(stake) = &pick.stake {
            session.set_stake(index, stake)?;
        }
    }

    print!("{}", render::render_slip(session.slip()));

    let report = session.place_slip().await;
    print!("{}", render::render_report(&report));

    if report.placed() == 0 {
        bail!("no bet was placed");
    }
    if report.placed() < report.results.len() {
        warn!(
            placed = report.placed(),
            total = report.results.len(),
            "Some bets were not placed"
        );
    }

    Ok(())
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("BETMASTER - CONFIGURATION CHECK");
    println!("======================================================================");

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Backend URL: {}", config.betmaster_api_url);
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!("  Default Stake: R$ {}", config.default_stake);
    println!("  Default Bookmaker: {}", config.default_bookmaker);
    println!("  Sandbox Port: {}", config.sandbox_port);
    println!("  Sandbox Balance: R$ {}", config.sandbox_balance);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Serve the sandbox backend until Ctrl-C.
async fn cmd_sandbox(config: &Config, port: Option<u16>) -> anyhow::Result<()> {
    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {}", e))?;

    let addr = SocketAddr::from(([127, 0, 0, 1], port.unwrap_or(config.sandbox_port)));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    let state = api::with_demo_data(config.sandbox_balance).await;
    info!(balance = %config.sandbox_balance, "Sandbox demo data loaded");
    println!("Sandbox backend on http://{}", addr);

    api::serve(listener, state).await?;
    info!("Sandbox backend stopped");

    Ok(())
}
