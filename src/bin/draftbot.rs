//! Turin draft solver binary.
//!
//! Loads a tournament config and any number of draft states, solves each
//! state independently and prints the optimal line.
//!
//! ```text
//! draftbot --config tournament.json --state round2.json --top 3
//! ```

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use turin_draft::draft::{analyze, search_with, GameState, TournamentConfig, TournamentInfo};
use turin_draft::search::{Player, SearchConfig, SearchStats};

#[derive(Parser, Debug)]
#[command(name = "draftbot")]
#[command(version, about = "Optimal Turin draft lines from matchup odds", long_about = None)]
struct Cli {
    /// Tournament config (JSON). Defaults to three rounds on the V1.2 table.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Draft state file (JSON). Repeat to solve several states in parallel.
    /// Solves the empty draft when omitted.
    #[arg(short, long = "state")]
    states: Vec<PathBuf>,

    /// Also rank the best N decisions for the side to move.
    #[arg(short, long, default_value_t = 0)]
    top: usize,

    /// Walk the full tree without alpha-beta cutoffs.
    #[arg(long)]
    exhaustive: bool,

    /// Print results as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct StateReport {
    source: String,
    to_move: Option<Player>,
    value: f64,
    line: GameState,
    stats: SearchStats,
    top: Vec<ChoiceReport>,
}

#[derive(Debug, Serialize)]
struct ChoiceReport {
    value: f64,
    choice: GameState,
    line: GameState,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => {
            let config = TournamentConfig::from_json_file(path)?;
            info!("loaded config from {}", path.display());
            config
        }
        None => TournamentConfig::default(),
    };
    let info = config.to_tournament_info()?;
    info!(
        "tournament '{}': {} rounds, {} factions, {} odds entries",
        config.name,
        info.round_count(),
        info.roster().len(),
        info.odds().len()
    );

    let jobs: Vec<(String, GameState)> = if cli.states.is_empty() {
        vec![("<empty draft>".to_string(), GameState::new())]
    } else {
        cli.states
            .iter()
            .map(|path| load_state(path).map(|state| (path.display().to_string(), state)))
            .collect::<Result<_, _>>()?
    };
    if jobs.iter().any(|(_, state)| state.resolved_early_rounds() == 0 && info.round_count() > 2) {
        warn!("searching from the first round; this can take a long time");
    }

    let search_config = SearchConfig::default().with_pruning(!cli.exhaustive);
    let progress = ProgressBar::new(jobs.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} states")?
            .progress_chars("=>-"),
    );

    let start = Instant::now();
    let results: Vec<Result<StateReport, String>> = jobs
        .par_iter()
        .map(|(source, state)| {
            let report = solve(&info, source, state, &search_config, cli.top)
                .map_err(|e| format!("{}: {}", source, e));
            progress.inc(1);
            report
        })
        .collect();
    progress.finish_and_clear();

    let reports = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    let mut total = SearchStats::new();
    for report in &reports {
        total.absorb(&report.stats);
    }
    info!(
        "solved {} state(s) in {:.2}s: {} nodes, {} cutoffs",
        reports.len(),
        start.elapsed().as_secs_f64(),
        total.nodes_visited(),
        total.cutoffs
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    Ok(())
}

fn load_state(path: &Path) -> Result<GameState, Box<dyn Error>> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    let state =
        serde_json::from_str(&content).map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;
    Ok(state)
}

fn solve(
    info: &TournamentInfo,
    source: &str,
    state: &GameState,
    config: &SearchConfig,
    top: usize,
) -> Result<StateReport, Box<dyn Error + Send + Sync>> {
    let result = search_with(info, state, config.clone())?;

    let top = if top > 0 {
        analyze(info, state, top, config.clone())?
            .into_iter()
            .map(|ranked| ChoiceReport {
                value: ranked.value,
                choice: ranked.choice,
                line: ranked.line,
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(StateReport {
        source: source.to_string(),
        to_move: state.to_move(info),
        value: result.value,
        line: result.line,
        stats: result.stats,
        top,
    })
}

/// The round a single decision filled in.
fn decided_round(state: &GameState) -> String {
    if state.decisive.is_untouched() {
        state
            .early_rounds
            .last()
            .map(|round| round.to_string())
            .unwrap_or_default()
    } else {
        state.decisive.to_string()
    }
}

fn print_report(report: &StateReport) {
    println!("=== {} ===", report.source);
    match report.to_move {
        Some(player) => println!("{} to move", player),
        None => println!("Draft complete"),
    }
    println!("P1 win probability: {:.4}", report.value);
    println!("Recommended line:");
    for line in report.line.to_string().lines() {
        println!("  {}", line);
    }

    if !report.top.is_empty() {
        println!("Best decisions:");
        for (i, choice) in report.top.iter().enumerate() {
            println!("  {}. {:.4}  {}", i + 1, choice.value, decided_round(&choice.choice));
        }
    }

    println!(
        "Searched {} nodes ({} leaves, {} cutoffs) in {:.2}s",
        report.stats.nodes_visited(),
        report.stats.leaves_evaluated,
        report.stats.cutoffs,
        report.stats.elapsed_seconds
    );
    println!();
}
