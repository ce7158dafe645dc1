use clap::Parser;
use std::io::{self, Write};
use swap_analyzer::analyzer::Analyzer;
use swap_analyzer::engine::{scrambled_state, GridShape, Move, PermutationState};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play a swap puzzle in the terminal")]
struct Args {
    #[clap(long, default_value_t = 3)]
    rows: usize,

    #[clap(long, default_value_t = 3)]
    cols: usize,

    /// Seed for the scramble; random if omitted
    #[clap(short, long)]
    seed: Option<u64>,

    /// Scramble with this many random swaps instead of a uniform shuffle
    #[clap(long)]
    swaps: Option<usize>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let shape = GridShape::new(args.rows, args.cols);
    if let Err(e) = shape.validate() {
        eprintln!("Invalid grid: {}", e);
        std::process::exit(1);
    }
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut state = match args.swaps {
        Some(swaps) => scrambled_state(shape.len(), swaps, seed),
        None => PermutationState::random(shape.len(), seed),
    };
    let mut history: Vec<Move> = Vec::new();
    let mut highlight: Vec<usize> = Vec::new();
    let analyzer = Analyzer::default();

    println!("Welcome to Swap Puzzle! (seed {})", seed);
    println!("Put every number in its slot; slot numbers run left to right, top to bottom.");

    loop {
        println!("---------------------");
        println!("Moves: {}, Correct: {}/{}", history.len(), state.correct_count(), state.len());
        println!("{}", state.to_string_with_highlight(shape, &highlight));

        if state.is_solved() {
            println!();
            println!("---------------------");
            println!("🎉 SOLVED! 🎉");
            println!("Total moves: {}", history.len());
            println!("---------------------");
            break;
        }

        print!("Enter two slots to swap (a b), 'h' for a hint, 'u' to undo, 'q' to quit: ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }
        let trimmed_input = input.trim();
        highlight.clear();

        match trimmed_input {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "u" => {
                match history.pop() {
                    Some(mv) => {
                        state = state.apply(mv);
                        highlight = vec![mv.a, mv.b];
                        println!("Move undone.");
                    }
                    None => println!("Nothing to undo."),
                }
                continue;
            }
            "h" => {
                match analyzer.analyze_state(shape, &state, history.len() as u32) {
                    Ok(result) => {
                        println!(
                            "Difficulty {:.1}, progress {:.0}%, stuck level {}, about {:.0}s left.",
                            result.difficulty, result.progress, result.stuck_level, result.estimated_seconds
                        );
                        match result.hints.first() {
                            Some(hint) => {
                                println!("Hint: {}", hint.description);
                                if let Some(visual) = &hint.visual {
                                    highlight = visual.slots.clone();
                                }
                            }
                            None => println!("No hint available."),
                        }
                    }
                    Err(e) => println!("Could not analyse the puzzle: {}", e),
                }
                continue;
            }
            _ => {}
        }

        let parts: Vec<&str> = trimmed_input.split_whitespace().collect();
        if parts.len() != 2 {
            println!("Invalid input format. Use 'a b', 'h', 'u' or 'q'.");
            continue;
        }
        match (parts[0].parse::<usize>(), parts[1].parse::<usize>()) {
            (Ok(a), Ok(b)) if a < shape.len() && b < shape.len() && a != b => {
                let mv = Move::new(a, b);
                state = state.apply(mv);
                history.push(mv);
                highlight = vec![mv.a, mv.b];
            }
            (Ok(_), Ok(_)) => {
                println!(
                    "Invalid slots: choose two different slots between 0 and {}.",
                    shape.len() - 1
                );
            }
            _ => println!("Invalid input: Please enter slot numbers (e.g., '3 4'), 'h', 'u', or 'q'."),
        }
    }
}
