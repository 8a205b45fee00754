//! Interactive terminal front end.
//!
//! Each input line becomes one presentation event: a plain line is a
//! question, slash commands change the destination, search official sources
//! or re-render the transcript.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::agent::{AgentSessionManager, AskMode, HistoryEntry};
use crate::countries::{Country, CountryCatalog};
use crate::error::IntegreatError;

const HELP: &str = "\
Type a question and press Enter to ask InteGREAT.
  /country NAME   switch destination country
  /gov QUERY      search the destination's government sources
  /history        show the conversation so far
  /countries      list supported destinations
  /info           government website and currency of the destination
  /help           show this help
  /quit           leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    GovernmentSearch(String),
    Country(String),
    History,
    Countries,
    Info,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ReplCommand::Ask(line.to_string());
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((command, ""));

    match name.to_ascii_lowercase().as_str() {
        "country" => ReplCommand::Country(rest.to_string()),
        "gov" => ReplCommand::GovernmentSearch(rest.to_string()),
        "history" => ReplCommand::History,
        "countries" => ReplCommand::Countries,
        "info" => ReplCommand::Info,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => ReplCommand::Unknown(other.to_string()),
    }
}

pub fn render_entry(entry: &HistoryEntry) -> String {
    format!(
        "[{}] You: {}\n    InteGREAT ({}): {}",
        entry.sequence_index, entry.query, entry.country, entry.response
    )
}

pub fn render_country(country: &Country) -> String {
    let mut out = format!(
        "Selected Country: {}\nGovernment website: {}",
        country.name, country.government_website
    );
    if let (Some(ticker), Some(currency)) = (&country.currency_ticker, country.quote_currency()) {
        out.push_str(&format!("\nCurrency: {currency} (ticker {ticker})"));
    }
    out
}

pub fn render_catalog(catalog: &CountryCatalog, current: &str) -> String {
    catalog
        .iter()
        .map(|c| {
            let marker = if c.name.eq_ignore_ascii_case(current) { '*' } else { ' ' };
            format!("{marker} {:<16} {}", c.name, c.government_website)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_error(err: &IntegreatError) -> String {
    match err {
        IntegreatError::Validation(message) => message.clone(),
        other if other.is_retryable() => format!("Error: {other} (you can try again)"),
        other => format!("Error: {other}"),
    }
}

/// Run the interactive loop until `/quit` or end of input.
pub async fn run(session: &AgentSessionManager, catalog: &CountryCatalog) -> std::io::Result<()> {
    println!("InteGREAT: immigrant integration helper. Type /help for commands.");
    if let Some(country) = catalog.get(&session.country()) {
        println!("{}", render_country(country));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("[{}] > ", session.country());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            return Ok(());
        };

        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => return Ok(()),
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Unknown(name) => eprintln!("Unknown command /{name}. Type /help."),
            ReplCommand::Countries => println!("{}", render_catalog(catalog, &session.country())),
            ReplCommand::Info => match catalog.get(&session.country()) {
                Some(country) => println!("{}", render_country(country)),
                None => println!("No details on file for {}.", session.country()),
            },
            ReplCommand::History => {
                let history = session.history();
                if history.is_empty() {
                    println!("No questions asked yet.");
                }
                for entry in &history {
                    println!("{}", render_entry(entry));
                }
            }
            ReplCommand::Country(name) => on_country_change(session, catalog, &name).await,
            ReplCommand::Ask(query) => {
                eprintln!("Waiting for InteGREAT's response...");
                match session.ask(&query, AskMode::Direct).await {
                    Ok(_) => {
                        if let Some(entry) = session.history().last() {
                            println!("{}", render_entry(entry));
                        }
                    }
                    Err(e) => eprintln!("{}", render_error(&e)),
                }
            }
            ReplCommand::GovernmentSearch(query) => {
                eprintln!("Asking InteGREAT...");
                match session.ask(&query, AskMode::GovernmentSearch).await {
                    Ok(response) => println!("Response: {response}"),
                    Err(e) => eprintln!("{}", render_error(&e)),
                }
            }
        }
    }
}

async fn on_country_change(session: &AgentSessionManager, catalog: &CountryCatalog, name: &str) {
    let name = catalog.get(name).map_or(name, |c| c.name.as_str());
    if !name.trim().is_empty() && !catalog.contains(name) {
        eprintln!("Note: {name} is not in the country list; advice may be less specific.");
    }
    match session.reinitialize(name).await {
        Ok(()) => match catalog.get(name) {
            Some(country) => println!("{}", render_country(country)),
            None => println!("Selected Country: {}", session.country()),
        },
        Err(e) => {
            eprintln!("{}", render_error(&e));
            eprintln!("Still researching {}.", session.country());
        }
    }
}
