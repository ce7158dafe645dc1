use clap::Parser;
use swap_analyzer::analyzer::{Analyzer, AnalyzerConfig};
use swap_analyzer::difficulty::DifficultyTier;
use swap_analyzer::engine::{scrambled_state, GridShape, PermutationState};

const GRID_SIZES: [(usize, usize); 5] = [(3, 3), (4, 4), (5, 5), (6, 6), (8, 8)];

#[derive(Parser, Debug)]
#[clap(author, version, about = "Scores seeded scrambles across several grid sizes")]
struct Args {
    /// Number of puzzles generated per grid size
    #[clap(short, long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first puzzle; later puzzles use consecutive seeds
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Scramble with this many random swaps instead of a uniform shuffle
    #[clap(long)]
    swaps: Option<usize>,
}

#[derive(Default)]
struct Totals {
    difficulty: f64,
    solution_len: usize,
    expansions: usize,
    exhausted: usize,
    tiers: [usize; 5],
}

fn tier_index(tier: DifficultyTier) -> usize {
    match tier {
        DifficultyTier::Trivial => 0,
        DifficultyTier::Easy => 1,
        DifficultyTier::Medium => 2,
        DifficultyTier::Hard => 3,
        DifficultyTier::Expert => 4,
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if args.boards == 0 {
        println!("Nothing to evaluate.");
        return;
    }

    // Seeds never repeat, so one cache slot is enough.
    let analyzer = Analyzer::new(AnalyzerConfig {
        cache_capacity: 1,
        ..AnalyzerConfig::default()
    });

    println!(
        "Evaluating {} puzzles per grid size (seeds {}..{})",
        args.boards,
        args.seed,
        args.seed + args.boards as u64
    );
    println!(
        "\n{:<6} {:>10} {:>10} {:>12} {:>10}   Trivial/Easy/Medium/Hard/Expert",
        "Grid", "Difficulty", "Moves", "Expansions", "Exhausted"
    );

    for (rows, cols) in GRID_SIZES {
        let shape = GridShape::new(rows, cols);
        let mut totals = Totals::default();

        for i in 0..args.boards {
            let seed = args.seed + i as u64;
            let state = match args.swaps {
                Some(swaps) => scrambled_state(shape.len(), swaps, seed),
                None => PermutationState::random(shape.len(), seed),
            };
            let result = match analyzer.analyze_state(shape, &state, 0) {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("Skipping seed {} on {}: {}", seed, shape, e);
                    continue;
                }
            };
            totals.difficulty += result.difficulty;
            totals.solution_len += result.solution.len();
            totals.expansions += result.search.expansions;
            if result.search.budget_exhausted {
                totals.exhausted += 1;
            }
            totals.tiers[tier_index(DifficultyTier::from_score(result.difficulty))] += 1;
        }

        let n = args.boards as f64;
        let tiers: Vec<String> = totals.tiers.iter().map(|c| c.to_string()).collect();
        println!(
            "{:<6} {:>10.1} {:>10.1} {:>12.0} {:>10}   {}",
            shape.to_string(),
            totals.difficulty / n,
            totals.solution_len as f64 / n,
            totals.expansions as f64 / n,
            totals.exhausted,
            tiers.join("/")
        );
    }
}
