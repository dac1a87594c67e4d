//! # puzzle-sat
//!
//! `puzzle-sat` is a command-line front end for four classic
//! constraint-satisfaction puzzles, each encoded into CNF and decided by an
//! off-the-shelf SAT solver. No search happens in this crate; every puzzle
//! is reduced to clauses and the external solver's certificate is decoded
//! back into puzzle terms.
//!
//! ## Subcommands
//!
//! 1.  **`cryptarithm`**: Solve verbal arithmetic.
//!     ```sh
//!     puzzle-sat cryptarithm --puzzle "SEND+MORE=MONEY"
//!     ```
//!
//! 2.  **`coloring`**: Color the map of Australia.
//!     ```sh
//!     puzzle-sat coloring --colors 3
//!     ```
//!
//! 3.  **`queens`**: Place N mutually non-attacking queens.
//!     ```sh
//!     puzzle-sat queens --n 12
//!     ```
//!
//! 4.  **`sudoku`**: Solve the bundled 9x9 grid.
//!     ```sh
//!     puzzle-sat sudoku
//!     ```
//!
//! 5.  **`completions`**: Generate shell completion scripts.
//!     ```sh
//!     puzzle-sat completions zsh
//!     ```
//!
//! Run without a subcommand to solve all four demo instances in a row:
//!
//! ```sh
//! puzzle-sat
//! ```
//!
//! ## Common Options
//!
//! -   `-d, --debug`: Print clause counts and the raw outcome (default: `false`).
//! -   `-v, --verify`: Check the decoded solution against every constraint (default: `true`).
//! -   `-s, --stats`: Print the statistics table after solving (default: `true`).
//! -   `--dimacs`: Dump the generated CNF in DIMACS format before solving.
//!
//! Unsatisfiable instances are an answer, not an error: `queens --n 3`
//! reports `UNSATISFIABLE` and exits cleanly. Only a solver failure exits
//! nonzero.

use std::time::{Duration, Instant};

use clap::{Args, CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use tikv_jemalloc_ctl::{epoch, stats};

use puzzle_sat::coloring::solver::MapColoring;
use puzzle_sat::cryptarithm::solver::Cryptarithm;
use puzzle_sat::csp::cnf::Cnf;
use puzzle_sat::csp::encode::Encoding;
use puzzle_sat::csp::model::Model;
use puzzle_sat::csp::solver::{Assignment, Outcome, solve_encoded};
use puzzle_sat::queens::solver::Queens;
use puzzle_sat::sudoku::solver::{Board, EXAMPLE, Sudoku};

/// Global allocator using `tikv-jemallocator` for potentially better
/// performance and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Defines the command-line interface for the puzzle solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "puzzle-sat",
    version,
    about = "Classic constraint puzzles solved with an off-the-shelf SAT solver"
)]
struct Cli {
    /// Specifies the subcommand to execute. Without one, all four demo
    /// puzzles are solved in a row.
    #[clap(subcommand)]
    command: Option<Commands>,

    /// Common options applicable to the demo run.
    #[command(flatten)]
    common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve a verbal-arithmetic puzzle such as TWO+TWO=FOUR.
    Cryptarithm {
        /// The puzzle, written as ADDEND+ADDEND=TOTAL.
        #[arg(short, long, default_value = "TWO+TWO=FOUR")]
        puzzle: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Color the map of Australia so no bordering regions share a color.
    Coloring {
        /// Number of colors on offer. Three suffice; two do not.
        #[arg(short, long, default_value_t = 3)]
        colors: i32,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Place N mutually non-attacking queens on an N by N board.
    Queens {
        /// Board dimension.
        #[arg(short, long, default_value_t = 8)]
        n: usize,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve the bundled 9x9 Sudoku grid.
    Sudoku {
        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across the subcommands.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
struct CommonOptions {
    /// Enable debug output, printing clause counts and the raw solver
    /// outcome.
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Enable verification of the decoded solution against every domain
    /// bound and constraint of the model.
    #[arg(short, long, default_value_t = true)]
    verify: bool,

    /// Enable printing of problem and search statistics after solving.
    #[arg(short, long, default_value_t = true)]
    stats: bool,

    /// Print the generated CNF in DIMACS format before solving.
    #[arg(long, default_value_t = false)]
    dimacs: bool,
}

/// Main entry point. Parses command-line arguments and dispatches to the
/// appropriate puzzle runner.
fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Cryptarithm { puzzle, common }) => {
            run_cryptarithm(&puzzle, &common);
        }
        Some(Commands::Coloring { colors, common }) => {
            run_coloring(colors, &common);
        }
        Some(Commands::Queens { n, common }) => {
            run_queens(n, &common);
        }
        Some(Commands::Sudoku { common }) => {
            run_sudoku(&common);
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
        None => {
            // The demo instances are all satisfiable by construction, so a
            // missing solution here is a bug worth crashing over.
            let mut found = true;
            found &= run_cryptarithm("TWO+TWO=FOUR", &cli.common);
            found &= run_coloring(3, &cli.common);
            found &= run_queens(8, &cli.common);
            found &= run_sudoku(&cli.common);
            assert!(found, "every demo puzzle must be satisfiable");
        }
    }
}

/// Prints completion definitions for `shell` to stdout.
fn print_completions<G: clap_complete::Generator>(generator: G, cmd: &mut clap::Command) {
    clap_complete::generate(generator, cmd, cmd.get_name().to_string(), &mut std::io::stdout());
}

/// Solves a verbal-arithmetic puzzle and prints the worked sum.
///
/// Returns whether a solution was found.
fn run_cryptarithm(text: &str, common: &CommonOptions) -> bool {
    let time = Instant::now();
    let puzzle = Cryptarithm::parse(text);
    let (model, letter_vars) = puzzle.to_model();
    let build_time = time.elapsed();

    println!(
        "Puzzle: {} = {}",
        puzzle.addends().join(" + "),
        puzzle.total()
    );

    match solve_and_report(&model, common, build_time) {
        Some(assignment) => {
            let solution = puzzle.decode_solution(&letter_vars, &assignment);
            println!("Solution:\n{solution}");
            let letters = solution
                .digits()
                .map(|(letter, digit)| format!("{letter}={digit}"))
                .join(" ");
            println!("Letters: {letters}");
            true
        }
        None => {
            println!("No solution found");
            false
        }
    }
}

/// Colors the map of Australia and prints the color of every region.
///
/// Returns whether a coloring was found.
fn run_coloring(colors: i32, common: &CommonOptions) -> bool {
    let time = Instant::now();
    let map = MapColoring::australia(colors);
    let (model, vars) = map.to_model();
    let build_time = time.elapsed();

    println!("Coloring Australia with {colors} colors");

    match solve_and_report(&model, common, build_time) {
        Some(assignment) => {
            println!("Solution:\n{}", map.decode_solution(&vars, &assignment));
            true
        }
        None => {
            println!("No solution found");
            false
        }
    }
}

/// Places `n` queens and prints the board.
///
/// Returns whether a placement was found.
fn run_queens(n: usize, common: &CommonOptions) -> bool {
    let time = Instant::now();
    let queens = Queens::new(n);
    let (model, vars) = queens.to_model();
    let build_time = time.elapsed();

    println!("Placing {n} queens on a {n}x{n} board");

    match solve_and_report(&model, common, build_time) {
        Some(assignment) => {
            println!("Solution:\n{}", queens.decode_solution(&vars, &assignment));
            true
        }
        None => {
            println!("No solution found");
            false
        }
    }
}

/// Solves the bundled Sudoku grid and prints both boards.
///
/// Returns whether a solution was found.
fn run_sudoku(common: &CommonOptions) -> bool {
    let time = Instant::now();
    let sudoku = Sudoku::new(Board::from(EXAMPLE));
    let (model, vars) = sudoku.to_model();
    let build_time = time.elapsed();

    println!("Puzzle:\n{sudoku}");

    match solve_and_report(&model, common, build_time) {
        Some(assignment) => {
            println!("Solution:\n{}", sudoku.decode_solution(&vars, &assignment));
            true
        }
        None => {
            println!("No solution found");
            false
        }
    }
}

/// Encodes a model, hands it to the external solver, and reports
/// verification and statistics per the common options.
///
/// Returns the satisfying assignment, or `None` when the model is
/// unsatisfiable. A solver failure terminates the process; the absence of
/// an answer never masquerades as unsatisfiable.
fn solve_and_report(model: &Model, common: &CommonOptions, build_time: Duration) -> Option<Assignment> {
    let time = Instant::now();
    let encoding = Encoding::new(model);
    let encode_time = build_time + time.elapsed();

    if common.dimacs {
        print!("{}", encoding.cnf());
    }

    if common.debug {
        println!("Variables: {}", encoding.cnf().num_vars);
        println!("Clauses: {}", encoding.cnf().clauses.len());
        println!("Literals: {}", encoding.cnf().literal_count());
    }

    epoch::advance().unwrap();

    let time = Instant::now();
    let outcome = solve_encoded(&encoding).unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(2);
    });
    let elapsed = time.elapsed();

    if common.debug {
        println!("Outcome: {outcome:?}");
        println!("Time: {elapsed:?}");
    }

    epoch::advance().unwrap();
    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();

    #[allow(clippy::cast_precision_loss)]
    let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
    #[allow(clippy::cast_precision_loss)]
    let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

    let assignment = match outcome {
        Outcome::Satisfiable(assignment) => Some(assignment),
        Outcome::Unsatisfiable => None,
    };

    if common.verify {
        verify_solution(model, assignment.as_ref());
    }

    if common.stats {
        print_stats(
            encode_time,
            elapsed,
            encoding.cnf(),
            allocated_mib,
            resident_mib,
            assignment.as_ref(),
        );
    }

    assignment
}

/// Verifies a decoded assignment against the model it came from.
///
/// Prints whether the verification was successful and panics if it was not.
/// If `assignment` is `None` (indicating UNSAT), it prints "UNSAT".
fn verify_solution(model: &Model, assignment: Option<&Assignment>) {
    if let Some(values) = assignment {
        let ok = model.check_assignment(values);
        println!("Verified: {ok:?}");
        assert!(ok, "Solution failed verification!");
    } else {
        println!("UNSAT");
    }
}

/// Helper function to print a single statistic line in a formatted table
/// row.
fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Prints a summary of problem and search statistics.
fn print_stats(
    encode_time: Duration,
    elapsed: Duration,
    cnf: &Cnf,
    allocated: f64,
    resident: f64,
    assignment: Option<&Assignment>,
) {
    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Encode time (s)", format!("{:.3}", encode_time.as_secs_f64()));
    stat_line("Variables", cnf.num_vars);
    stat_line("Clauses", cnf.clauses.len());
    stat_line("Literals", cnf.literal_count());

    println!("========================[ Search Statistics ]========================");
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("Solve time (s)", format!("{:.3}", elapsed.as_secs_f64()));
    println!("=====================================================================");

    if assignment.is_some() {
        println!("\nSATISFIABLE");
    } else {
        println!("\nUNSATISFIABLE");
    }
}
