use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use swap_analyzer::analyzer::{AnalysisResult, Analyzer, AnalyzerConfig};
use swap_analyzer::engine::PuzzleSnapshot;
use swap_analyzer::solver::SearchConfig;
use swap_analyzer::utils::snapshot_from_str_array;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of moves the player has made so far
    #[clap(short, long, default_value_t = 0)]
    moves: u32,

    /// Node expansion budget for the solver
    #[clap(long, default_value_t = 20_000)]
    max_expansions: usize,

    /// Optional wall-clock budget for the solver, in milliseconds
    #[clap(long)]
    time_budget_ms: Option<u64>,

    /// Print the analysis as JSON
    #[clap(long)]
    json: bool,

    /// Path to the board file (one row per line, whitespace-separated piece ids)
    board_file: PathBuf,
}

fn read_board_file(path: &PathBuf, moves: u32) -> Result<PuzzleSnapshot, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    let lines: Vec<&str> = content.lines().collect();
    snapshot_from_str_array(&lines, moves).map_err(|e| format!("Invalid board format: {}", e))
}

fn print_report(analyzer: &Analyzer, snapshot: &PuzzleSnapshot, result: &AnalysisResult) {
    let search = &analyzer.config().search;
    println!("Grid: {}, moves so far: {}", snapshot.shape, snapshot.moves_so_far);
    match search.time_budget {
        Some(budget) => println!(
            "Search budget: {} expansions, {} ms\n",
            search.max_expansions,
            budget.as_millis()
        ),
        None => println!("Search budget: {} expansions\n", search.max_expansions),
    }
    println!("Difficulty:        {:.1}", result.difficulty);
    println!("Progress:          {:.1}%", result.progress);
    println!("Stuck level:       {}", result.stuck_level);
    println!("Estimated seconds: {:.0}", result.estimated_seconds);
    match result.next_move {
        Some(mv) => println!("Next move:         {}", mv),
        None if result.is_solved() => println!("Next move:         none, puzzle is solved"),
        None => println!("Next move:         unknown, search budget exhausted"),
    }

    println!(
        "\nSolution ({} moves, lower bound {}, {} expansions{}):",
        result.solution.len(),
        result.search.lower_bound,
        result.search.expansions,
        if result.search.budget_exhausted { ", partial" } else { "" }
    );
    if result.solution.is_empty() {
        println!("  No moves.");
    } else {
        for (i, mv) in result.solution.iter().enumerate() {
            println!("  Move {}: {}", i + 1, mv);
        }
    }

    if !result.hints.is_empty() {
        println!("\nHints:");
        for hint in &result.hints {
            println!(
                "  [{:?}/{:?} {:.2}] {}",
                hint.priority, hint.kind, hint.confidence, hint.description
            );
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let snapshot = match read_board_file(&args.board_file, args.moves) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Failed to read board from {}: {}", args.board_file.display(), e);
            process::exit(1);
        }
    };

    let analyzer = Analyzer::new(AnalyzerConfig {
        search: SearchConfig {
            max_expansions: args.max_expansions,
            time_budget: args.time_budget_ms.map(Duration::from_millis),
            ..SearchConfig::default()
        },
        ..AnalyzerConfig::default()
    });

    let result = match analyzer.analyze(&snapshot) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Invalid puzzle: {}", e);
            process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&*result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialise analysis: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_report(&analyzer, &snapshot, &result);
    }
}
