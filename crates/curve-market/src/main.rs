use bonding_clock::SystemClock;
use bonding_ports::LedgerReader;
use curve_market::{BondingMarket, MarketConfig, MarketError};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

mod cli;

use cli::Command;

fn print_help() {
    eprintln!(
        r#"Curve Market - interactive bonding-curve token market

USAGE:
    curve-market [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Run with the default curve (0.01 initial price, scaling factor 1000)
    curve-market

    # Run with config file
    curve-market --config curve.json
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            MarketConfig::from_file(&path)?
        }
        None => {
            log::info!("Using default configuration");
            MarketConfig::default()
        }
    };

    let market = BondingMarket::from_config(&config, Arc::new(SystemClock::new()))?;
    let _refresher = market.start_sync();

    println!(
        "{} ({}) - type 'help' for commands",
        market.metadata().name,
        market.metadata().symbol
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match cli::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("error: {}", e);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(e) = run_command(&market, command).await {
            match e.as_curve_error() {
                Some(rejected) => println!("rejected: {}", rejected),
                None => println!("error: {}", e),
            }
            if e.is_fatal() {
                return Err(e.into());
            }
        }
    }

    log::info!(
        "Shutting down after {} trades",
        market.journal().entries().len()
    );
    Ok(())
}

fn print_supply(reader: &dyn LedgerReader, symbol: &str) {
    let snapshot = reader.snapshot();
    println!(
        "supply {} {}, reserve {} base, {} holders",
        snapshot.supply, symbol, snapshot.reserve, snapshot.holders
    );
}

async fn run_command(
    market: &BondingMarket<SystemClock>,
    command: Command,
) -> Result<(), MarketError> {
    let symbol = &market.metadata().symbol;
    match command {
        Command::QuoteBuy { base } => {
            let quote = market.quote_buy(base).await?;
            match quote.diagnostic {
                Some(diagnostic) => println!("no tokens: {:?}", diagnostic),
                None => println!(
                    "{} base -> {} {} (avg price {}, at supply {})",
                    base, quote.output_amount, symbol, quote.effective_price, quote.supply_snapshot
                ),
            }
        }
        Command::QuoteSell { tokens } => {
            let quote = market.quote_sell(tokens).await?;
            match quote.diagnostic {
                Some(diagnostic) => println!("no proceeds: {:?}", diagnostic),
                None => println!(
                    "{} {} -> {} base (avg price {}, at supply {})",
                    tokens, symbol, quote.output_amount, quote.effective_price, quote.supply_snapshot
                ),
            }
        }
        Command::Buy { holder, base } => {
            let quote = market.quote_buy(base).await?;
            let (receipt, slippage) = market.buy_quoted(&holder, &quote)?;
            println!(
                "{} bought {} {} for {} base (supply {} -> {})",
                holder,
                receipt.output_amount,
                symbol,
                receipt.input_amount,
                receipt.supply_before,
                receipt.supply_after
            );
            if let Some(warning) = slippage {
                println!("warning: {}", warning);
            }
            println!("balance: {} {}", market.balance_of(&holder), symbol);
        }
        Command::Sell { holder, tokens } => {
            let quote = market.quote_sell(tokens).await?;
            let (receipt, slippage) = market.sell_quoted(&holder, &quote)?;
            println!(
                "{} sold {} {} for {} base (supply {} -> {})",
                holder,
                receipt.input_amount,
                symbol,
                receipt.output_amount,
                receipt.supply_before,
                receipt.supply_after
            );
            if let Some(warning) = slippage {
                println!("warning: {}", warning);
            }
            println!("balance: {} {}", market.balance_of(&holder), symbol);
        }
        Command::Balance { holder } => {
            println!("{}: {} {}", holder, market.reader().balance_of(&holder), symbol);
        }
        Command::Supply => {
            print_supply(market.reader(), symbol);
            if let Some((cached, age)) = market.cache().get_cached_supply().await {
                println!("cached supply {} ({}s old)", cached, age.num_seconds());
            }
        }
        Command::Price => {
            println!("spot price: {} base", market.spot_price()?);
            match market.implied_unit_price().await? {
                Some(price) => println!("implied unit price: {} base", price),
                None => println!("implied unit price: unavailable (no supply yet)"),
            }
        }
        Command::Help => println!("{}", cli::HELP),
        Command::Quit => {}
    }
    Ok(())
}
