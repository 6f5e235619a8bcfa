mod cli;
mod config;
mod demo;
mod engine;
mod error;
mod session;
mod ui;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use rust_decimal::Decimal;

use cli::{Cli, Command};
use config::RedressConfig;
use engine::{StatusEngine, SystemClock, Ticket};
use error::RedressError;
use session::TicketSession;
use ui::TicketDisplay;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RedressConfig::load()?;
    let display = TicketDisplay::new();

    match cli.command {
        Command::New { file, kind, cod, amount } => {
            let amount: Decimal = amount
                .parse()
                .map_err(|_| RedressError::Config(format!("invalid amount: {amount}")))?;
            let ticket =
                Ticket::new(kind.into(), cod, amount, config.review_window(), Utc::now());
            save_ticket(&file, &ticket)?;
            display.summary(&ticket);
            if cli.verbose {
                println!("wrote {file}");
            }
        }

        Command::Apply { file, write, action } => {
            let mut ticket = load_ticket(&file)?;
            if cli.verbose {
                display.summary(&ticket);
            }
            let action = match action.into_action() {
                Ok(action) => action,
                Err(err) => {
                    display.engine_error(&err);
                    std::process::exit(1);
                }
            };
            let mut session = TicketSession::new(SystemClock);
            match session.apply(&mut ticket, action) {
                Ok(outcome) => {
                    display.transition(&outcome);
                    if write {
                        save_ticket(&file, &ticket)?;
                    } else {
                        println!("{}", serde_json::to_string_pretty(&ticket)?);
                    }
                }
                Err(err) => {
                    display.engine_error(&err);
                    std::process::exit(1);
                }
            }
        }

        Command::Actions { file } => {
            let ticket = load_ticket(&file)?;
            display.summary(&ticket);
            display.actions(&StatusEngine::available_actions(&ticket));
        }

        Command::Demo => demo::run(&config).await?,
    }

    Ok(())
}

fn load_ticket(path: &str) -> Result<Ticket, RedressError> {
    if !std::path::Path::new(path).exists() {
        return Err(RedressError::TicketNotFound(path.to_string()));
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn save_ticket(path: &str, ticket: &Ticket) -> Result<(), RedressError> {
    let json = serde_json::to_string_pretty(ticket)?;
    std::fs::write(path, json)?;
    Ok(())
}
