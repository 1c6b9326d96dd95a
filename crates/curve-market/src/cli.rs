//! Line commands for the interactive market shell

use bonding_core::{Amount, HolderId};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    QuoteBuy { base: Amount },
    QuoteSell { tokens: Amount },
    Buy { holder: HolderId, base: Amount },
    Sell { holder: HolderId, tokens: Amount },
    Balance { holder: HolderId },
    Supply,
    Price,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = r#"Commands:
    quote-buy <BASE>            Tokens obtainable for BASE at the cached supply
    quote-sell <TOKENS>         Base currency obtainable for TOKENS
    buy <HOLDER> <BASE>         Spend BASE on tokens for HOLDER
    sell <HOLDER> <TOKENS>      Redeem TOKENS held by HOLDER
    balance <HOLDER>            Token balance of HOLDER
    supply                      Live and cached supply, and the reserve
    price                       Spot price and implied unit price
    help                        Show this message
    quit                        Exit"#;

/// Parse one input line; `Ok(None)` for blank lines
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("quote-buy", [base]) => Command::QuoteBuy {
            base: amount(base)?,
        },
        ("quote-sell", [tokens]) => Command::QuoteSell {
            tokens: amount(tokens)?,
        },
        ("buy", [holder, base]) => Command::Buy {
            holder: HolderId::from(*holder),
            base: amount(base)?,
        },
        ("sell", [holder, tokens]) => Command::Sell {
            holder: HolderId::from(*holder),
            tokens: amount(tokens)?,
        },
        ("balance", [holder]) => Command::Balance {
            holder: HolderId::from(*holder),
        },
        ("supply", []) => Command::Supply,
        ("price", []) => Command::Price,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        ("quote-buy" | "quote-sell" | "buy" | "sell" | "balance" | "supply" | "price", _) => {
            return Err(ParseError(format!("wrong arguments for '{}'", name)));
        }
        _ => return Err(ParseError(format!("unknown command '{}'", name))),
    };
    Ok(Some(command))
}

fn amount(raw: &str) -> Result<Amount, ParseError> {
    raw.parse::<Amount>()
        .map_err(|e| ParseError(format!("bad amount '{}': {}", raw, e)))
}
