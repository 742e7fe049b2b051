//! career-runner: headless driver for a touchline career.
//!
//! Usage:
//!   career-runner --seed 12345 --seasons 3 --clubs 20 --db career.db
//!   career-runner --seed 12345 --ipc-mode < commands.jsonl

use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};
use touchline_core::{
    career::Career,
    command::Command,
    domain::{OfferDecision, OfferDirection, SeasonStats},
    types::{ClubId, FixtureId, Money, SeasonIndex, Tick},
    CareerConfig, CareerEngine, CareerError, CareerStore,
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetState,
    Command { command: Command },
    Save { save_id: Option<String> },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    season:       SeasonIndex,
    matchday:     u32,
    tick:         Tick,
    club:         String,
    balance:      Money,
    position:     Option<u32>,
    unread:       usize,
    live_minute:  Option<u8>,
    next_fixture: Option<FixtureId>,
    standings:    Vec<SeasonStats>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let seasons = parse_arg(&args, "--seasons", 1u32);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = str_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = str_arg(&args, "--data-dir").unwrap_or("./data");

    let mut config = CareerConfig::load(data_dir)?;
    config.league.club_count = parse_arg(&args, "--clubs", config.league.club_count);
    let club_id = parse_arg(&args, "--club", (config.league.club_count / 2) as ClubId);

    if !ipc_mode {
        println!("touchline career-runner");
        println!("  seed:      {seed}");
        println!("  seasons:   {seasons}");
        println!("  clubs:     {}", config.league.club_count);
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let store = CareerStore::open(db)?;
    let mut engine = CareerEngine::new_career(config, store, "Player Manager", club_id, seed)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        let started = chrono::Utc::now();
        for n in 0..seasons {
            play_season(&mut engine)?;
            print_table(engine.career());
            if n + 1 < seasons {
                engine.advance_season()?;
            }
        }
        let save_id = engine.save(None)?;
        print_summary(engine.career(), &save_id, started)?;
    }

    Ok(())
}

/// Auto-play the rest of the season: every matchday simulated, every
/// incoming bid declined.
fn play_season(engine: &mut CareerEngine) -> Result<()> {
    loop {
        engine.simulate_matchday()?;
        let incoming: Vec<_> = engine
            .career()
            .offers()
            .iter()
            .filter(|o| o.is_active() && o.direction == OfferDirection::Incoming)
            .map(|o| o.id)
            .collect();
        for offer_id in incoming {
            engine.respond_to_offer(offer_id, OfferDecision::Reject)?;
        }
        match engine.advance_matchday() {
            Ok(_) => {}
            Err(CareerError::SeasonFinished) => return Ok(()),
            Err(e) => return Err(e.into()),
        }
    }
}

fn run_ipc_loop(engine: &mut CareerEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let reply = match request {
            IpcRequest::Quit => break,
            IpcRequest::GetState => serde_json::to_value(build_ui_state(engine.career()))?,
            IpcRequest::Command { command } => match engine.dispatch(command) {
                Ok(outcome) => serde_json::json!({
                    "outcome": outcome,
                    "state": build_ui_state(engine.career()),
                }),
                Err(e) => serde_json::json!({
                    "error": e.to_string(),
                    "kind": format!("{:?}", e.kind()),
                }),
            },
            IpcRequest::Save { save_id } => match engine.save(save_id.as_deref()) {
                Ok(id) => serde_json::json!({ "saved": id }),
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            },
        };
        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(career: &Career) -> UiState {
    UiState {
        season:       career.season(),
        matchday:     career.matchday(),
        tick:         career.calendar().tick,
        club:         career.managed_club().map(|c| c.name.clone()).unwrap_or_default(),
        balance:      career.finances(),
        position:     career
            .standings()
            .iter()
            .find(|row| row.club_id == career.club_id())
            .map(|row| row.position),
        unread:       career.unread_count(),
        live_minute:  career.live_match().map(|live| live.simulation.current_minute()),
        next_fixture: career.next_fixture().map(|f| f.id),
        standings:    career.standings().to_vec(),
    }
}

fn print_table(career: &Career) {
    let league = career.managed_club().map(|c| c.league.to_uppercase()).unwrap_or_default();
    println!("=== {league} {} ===", career.season());
    println!("  Pos Club                        P   W   D   L   GF  GA   Pts");
    for row in career.standings() {
        let marker = if row.club_id == career.club_id() { "*" } else { " " };
        println!(
            " {marker}{:>3} {:<26} {:>3} {:>3} {:>3} {:>3} {:>4} {:>3} {:>5}",
            row.position, row.club_name, row.played, row.won, row.drawn, row.lost,
            row.goals_for, row.goals_against, row.points,
        );
    }
    println!();
}

fn print_summary(career: &Career, save_id: &str, started: chrono::DateTime<chrono::Utc>) -> Result<()> {
    let club = career.managed_club()?;
    println!("=== CAREER SUMMARY ===");
    println!("  manager:     {} (reputation {})", career.manager().name, career.manager().reputation);
    println!("  club:        {}", club.name);
    println!("  balance:     €{}", club.balance);
    println!("  seasons:     {}", career.history().len() + 1);
    for record in career.history() {
        let title = if record.champion == Some(record.club_id) { " (champions)" } else { "" };
        println!("    {}: finished {}{title}", record.season, record.final_position);
    }
    let top_scorer = career.squad().into_iter().max_by_key(|p| p.career.goals);
    if let Some(p) = top_scorer {
        println!("  top scorer:  {} ({} goals)", p.name, p.career.goals);
    }
    println!("  unread mail: {}", career.unread_count());
    println!("  saved as:    {save_id}");
    println!("  elapsed:     {}ms", (chrono::Utc::now() - started).num_milliseconds());
    Ok(())
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
