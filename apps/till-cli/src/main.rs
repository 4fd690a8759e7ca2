//! # Till CLI
//!
//! Line-oriented demo shell over the terminal core.
//!
//! ## Command Language
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input line            Effect                                           │
//! │  ──────────            ──────                                           │
//! │  042                   dispatch each digit into the pending buffer      │
//! │  x  *  s  m  d         dispatch that character key                      │
//! │  enter / (empty line)  dispatch Enter                                   │
//! │  back                  dispatch Backspace                               │
//! │  tab / esc             dispatch Tab / Escape                            │
//! │  /cola                 submit "cola" through the filter scheduler       │
//! │  :list                 list businesses                                  │
//! │  :switch <path>        switch business                                  │
//! │  :quit                 drain the scheduler and exit                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod source;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use till_terminal::{
    Key, KeyDispatch, PrinterError, ReceiptDocument, ReceiptPrinter, SessionSignal, Terminal,
};

use crate::source::DirSource;

/// Cashier terminal demo shell.
#[derive(Debug, Parser)]
#[command(name = "till", version, about)]
struct Args {
    /// Directory containing one subdirectory per business
    #[arg(long, default_value = "business")]
    business_dir: PathBuf,
}

/// Printer that writes receipt markup to stdout.
struct StdoutPrinter;

#[async_trait]
impl ReceiptPrinter for StdoutPrinter {
    async fn print(&self, document: &ReceiptDocument) -> Result<(), PrinterError> {
        println!("--- receipt ---------------------------------");
        println!("{document}");
        println!("---------------------------------------------");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();
    info!(dir = %args.business_dir.display(), "starting till");

    let source = Arc::new(DirSource::new(args.business_dir));
    let mut terminal = Terminal::start(source, Arc::new(StdoutPrinter)).await?;
    render_status(&terminal);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        match line.as_str() {
            ":quit" | ":q" => break,
            ":list" => {
                for business in terminal.businesses() {
                    println!("  {} ({})", business.name, business.path);
                }
                continue;
            }
            other if other.starts_with(":switch ") => {
                let path = other.trim_start_matches(":switch ").trim();
                match terminal.switch_business(path).await {
                    Ok(()) => println!("switched to {path}"),
                    Err(err) => println!("! {err}"),
                }
                terminal.drain_signals();
                render_status(&terminal);
                continue;
            }
            other if other.starts_with('/') => {
                terminal.submit_filter(other.trim_start_matches('/'));
                terminal.filters_settled().await;
                render_matches(&terminal);
                continue;
            }
            _ => {}
        }

        for key in parse_keys(&line) {
            let KeyDispatch { consumed, signals } = terminal.dispatch_key(key).await;
            if !consumed {
                println!("(key passed through)");
            }
            report_signals(&signals);
        }
        render_status(&terminal);
    }

    terminal.shutdown().await;
    Ok(())
}

/// Default: INFO, overridable with RUST_LOG.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

/// Maps one input line to key events.
fn parse_keys(line: &str) -> Vec<Key> {
    match line {
        "" | "enter" => return vec![Key::Enter],
        "back" => return vec![Key::Backspace],
        "tab" => return vec![Key::Tab],
        "esc" => return vec![Key::Escape],
        _ => {}
    }

    line.chars()
        .filter_map(|c| match c {
            '0'..='9' => Some(Key::Digit(c as u8 - b'0')),
            '*' => Some(Key::Char('*')),
            c if c.is_ascii_alphabetic() => Some(Key::Char(c)),
            _ => None,
        })
        .collect()
}

fn report_signals(signals: &[SessionSignal]) {
    for signal in signals {
        match signal {
            SessionSignal::PositionAdded { item_id, quantity } => {
                println!("+ {quantity} x {item_id}");
            }
            SessionSignal::ItemNotFound { id } => println!("! no item with id {id}"),
            SessionSignal::LedgerFinalized => println!("= receipt finalized"),
            SessionSignal::LedgerCleared => println!("= receipt cleared"),
            SessionSignal::PrintFailed { message } => println!("! print failed: {message}"),
            SessionSignal::MenuOpened => println!("(menu open - :list, :switch <path>)"),
            _ => {}
        }
    }
}

fn render_status(terminal: &Terminal) {
    let store = terminal.store();
    println!(
        "[{}] {} x {} | {} positions",
        terminal.current_mode().name(),
        store.quantity(),
        store.pending_input(),
        terminal.ledger().positions().len(),
    );
}

fn render_matches(terminal: &Terminal) {
    let view = terminal.store().filtered_view();
    for category in &view.categories {
        println!("{}", category.name);
        for item in &category.items {
            println!(
                "  {}  {:<24} {:>8.2}  [{}]",
                item.id,
                item.name,
                item.price,
                item.vat.map(|v| v.to_string()).unwrap_or_else(|| "A".to_string()),
            );
        }
    }
    println!("({} items)", view.item_count());
}
