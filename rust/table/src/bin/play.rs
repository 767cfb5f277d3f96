use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use holdem_engine::cards::Card;
use holdem_table::input::{parse_player_action, ParseResult};
use holdem_table::logging::{init_logging, LogFormat};
use holdem_table::{
    open_table, EventBus, InMemoryLedger, SeatedUser, TableEvent, TableNotice, TableSettings,
    TableSnapshot,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const USER_ID: &str = "local";

#[derive(Parser)]
#[command(name = "holdem-play")]
#[command(about = "Play no-limit Texas Hold'em against computer opponents")]
#[command(version)]
struct Cli {
    #[arg(short, long, env = "HOLDEM_CONFIG")]
    #[arg(help = "TOML settings file")]
    config: Option<PathBuf>,

    #[arg(short, long)]
    #[arg(help = "Number of computer opponents (1-9)")]
    opponents: Option<usize>,

    #[arg(long)]
    #[arg(help = "RNG seed for reproducible tables")]
    seed: Option<u64>,

    #[arg(short, long, default_value = "Player")]
    name: String,

    #[arg(short, long, default_value_t = 2_000)]
    #[arg(help = "Starting bankroll")]
    bankroll: u64,

    #[arg(long)]
    #[arg(help = "Emit logs as JSON lines on stderr")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    if let Err(e) = init_logging(format) {
        eprintln!("failed to initialise logging: {e}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = match &cli.config {
        Some(path) => TableSettings::from_file(path)?,
        None => TableSettings::load()?,
    };
    if let Some(opponents) = cli.opponents {
        settings.opponents = opponents;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }

    let ledger = Arc::new(InMemoryLedger::with_balance(USER_ID, cli.bankroll));
    let table = open_table(
        settings,
        SeatedUser::new(USER_ID, cli.name),
        Arc::clone(&ledger),
        EventBus::new(),
    )
    .await?;
    let mut events = table.subscribe();
    render(&table.snapshot().await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.receiver.recv() => match event {
                Some(TableEvent::StateChanged { snapshot, .. }) if snapshot.is_human_turn() => render(&snapshot),
                Some(TableEvent::ActionTaken { seat, action, timed_out, .. }) => {
                    let suffix = if timed_out { " (timed out)" } else { "" };
                    println!("  seat {seat}: {action:?}{suffix}");
                }
                Some(TableEvent::HandCompleted { result, .. }) => {
                    println!(
                        "Hand #{} over: pot {} to seats {:?}, you {:+}",
                        result.hand_number,
                        result.pot,
                        result.winners,
                        result.delta_for(0)
                    );
                    if let Some(showdown) = &result.showdown {
                        for shown in &showdown.hands {
                            println!("  seat {} shows {} ({})", shown.seat, cards(&shown.cards), shown.score.describe());
                        }
                    }
                }
                Some(TableEvent::Notice { notice: TableNotice::SettlementFailed { hand_number, message, .. }, .. }) => {
                    println!("! bankroll not updated for hand #{hand_number}: {message}");
                }
                Some(TableEvent::Notice { notice: TableNotice::HandAborted { message, .. }, .. }) => {
                    println!("! hand aborted: {message}");
                }
                Some(TableEvent::TableOver { reason, .. }) => {
                    println!("Table over: {reason}");
                    break;
                }
                Some(_) => {}
                None => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_player_action(&line) {
                    ParseResult::Action(action) => {
                        if let Err(e) = table.act(action).await {
                            println!("! {e}");
                        }
                    }
                    ParseResult::Show => render(&table.snapshot().await?),
                    ParseResult::Quit => break,
                    ParseResult::Invalid(msg) => println!("! {msg}"),
                }
            }
        }
    }

    table.close().await;
    if let Some(balance) = ledger.balance(USER_ID) {
        println!("Final bankroll: {balance}");
    }
    Ok(())
}

fn cards(cards: &[Card]) -> String {
    cards.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

fn render(snapshot: &TableSnapshot) {
    println!();
    println!(
        "Hand #{} {:?}  board [{}]  pot {}",
        snapshot.hand_number,
        snapshot.street,
        cards(&snapshot.board),
        snapshot.pot
    );
    for seat in &snapshot.seats {
        let marker = if snapshot.active_seat == Some(seat.seat) { ">" } else { " " };
        let dealer = if seat.is_dealer { "D" } else { " " };
        let hole = seat
            .hole_cards
            .as_deref()
            .map(cards)
            .unwrap_or_else(|| "?? ??".to_string());
        println!(
            "{marker}{dealer} {:<8} {:>6}  bet {:>5}  [{hole}] {}",
            seat.name, seat.chips, seat.current_street_bet, seat.status_label
        );
    }
    if let Some(legal) = &snapshot.legal_actions {
        let call = if legal.can_check {
            "check".to_string()
        } else {
            format!("call {}", legal.call_amount)
        };
        let raise = match (legal.min_raise_to, legal.max_raise_to) {
            (Some(min), Some(max)) => format!(", raise {min}-{max}"),
            _ => String::new(),
        };
        let secs = snapshot.turn_deadline_ms.unwrap_or(0) / 1_000;
        println!("Your move ({secs}s): fold, {call}{raise}, allin, show, quit");
    }
}
