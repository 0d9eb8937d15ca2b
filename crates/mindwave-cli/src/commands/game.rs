use std::io::BufRead;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use clap::Subcommand;
use mindwave_core::{
    Config, Event, GameInput, GameSession, MiniGame, PacerEngine, PcgRandom, RandomSource,
    ReflexEngine, SequenceEngine,
};

/// Poll interval for the clock-deadline games (sequence, reflex).
const POLL_INTERVAL_MS: u64 = 100;

#[derive(Subcommand)]
pub enum GameAction {
    /// Breathing pacer: follow the printed phase changes
    Pacer {
        /// How long to run, in milliseconds
        #[arg(long, default_value = "15000")]
        duration_ms: u64,
    },
    /// Color memory: type a pad index 0-3 and press Enter; "r" resets, "q" quits
    Sequence {
        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Reaction time: press Enter when the round arms; "r" resets, "q" quits
    Reflex {
        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Everything the event loop can receive: an engine event, a line of user
/// input, or end of input.
enum Msg {
    Game(Event),
    Line(String),
    Eof,
}

pub fn run(action: GameAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    match action {
        GameAction::Pacer { duration_ms } => {
            let engine = PacerEngine::new(&config.pacer);
            run_pacer(engine, config.pacer.tick_interval_ms, duration_ms)
        }
        GameAction::Sequence { seed } => {
            let engine = SequenceEngine::new(config.sequence.clone(), rng(seed));
            run_interactive(engine, parse_symbol)
        }
        GameAction::Reflex { seed } => {
            let engine = ReflexEngine::new(config.reflex.clone(), rng(seed));
            run_interactive(engine, parse_press)
        }
    }
}

fn rng(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(PcgRandom::seeded(seed)),
        None => Box::new(PcgRandom::from_entropy()),
    }
}

fn parse_symbol(line: &str) -> Option<GameInput> {
    let symbol: u8 = line.trim().parse().ok()?;
    Some(GameInput::Symbol(symbol))
}

fn parse_press(line: &str) -> Option<GameInput> {
    line.trim().is_empty().then_some(GameInput::Press)
}

/// Run the pacer for a bounded time, printing each event as a JSON line.
fn run_pacer(
    engine: PacerEngine,
    tick_interval_ms: u64,
    duration_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel();
    let mut session = GameSession::start(engine, tick_interval_ms, tx)?;

    let deadline = Instant::now() + Duration::from_millis(duration_ms);
    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        match rx.recv_timeout(remaining) {
            Ok(event) => print_event(&event)?,
            Err(mpsc::RecvTimeoutError::Timeout) => break,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    if let Some(event) = session.stop() {
        print_event(&event)?;
    }
    print_event(&session.snapshot())?;
    Ok(())
}

/// Run an input-driven game: engine events and stdin lines merge into one
/// channel so the loop stays single-threaded.
fn run_interactive<G>(
    engine: G,
    parse: fn(&str) -> Option<GameInput>,
) -> Result<(), Box<dyn std::error::Error>>
where
    G: MiniGame + 'static,
{
    let (tx, rx) = mpsc::channel();

    let (event_tx, event_rx) = mpsc::channel();
    let mut session = GameSession::start(engine, POLL_INTERVAL_MS, event_tx)?;

    let game_tx = tx.clone();
    std::thread::spawn(move || {
        for event in event_rx {
            if game_tx.send(Msg::Game(event)).is_err() {
                break;
            }
        }
    });
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Msg::Line(line)).is_err() {
                        return;
                    }
                }
                Err(_) => break,
            }
        }
        let _ = tx.send(Msg::Eof);
    });

    print_event(&session.snapshot())?;
    for msg in rx {
        match msg {
            Msg::Game(event) => print_event(&event)?,
            Msg::Line(line) => {
                let trimmed = line.trim();
                if trimmed.eq_ignore_ascii_case("q") {
                    break;
                }
                if trimmed.eq_ignore_ascii_case("r") {
                    if let Some(event) = session.reset() {
                        print_event(&event)?;
                    }
                    print_event(&session.snapshot())?;
                    continue;
                }
                if let Some(input) = parse(trimmed) {
                    if let Some(event) = session.input(input) {
                        print_event(&event)?;
                    }
                }
            }
            Msg::Eof => break,
        }
    }

    if let Some(event) = session.stop() {
        print_event(&event)?;
    }
    print_event(&session.snapshot())?;
    Ok(())
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
