use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bees_rezone::balancer::{DEFAULT_ITERATIONS, DEFAULT_SEED, OPTIMALITY_TOL};
use bees_rezone::{rezone, Arrangement, BalancerConfigBuilder};
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;

/// Balance which zone each team plays in, keeping every match's teams fixed.
///
/// Reads one match per line (comma separated teams, one per zone), writes the
/// rebalanced matches in the same format and reports the achieved entropy on stderr.
#[derive(Parser, Debug)]
#[command(name = "rezone", version, about, long_about = None)]
struct Cli {
    /// Arrangement to balance (stdin if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the balanced arrangement (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of annealing iterations
    #[arg(short = 'n', long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Random seed
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Stop once within this many bits of the theoretical maximum
    #[arg(long, default_value_t = OPTIMALITY_TOL)]
    tolerance: f64,

    /// Suppress the progress bar and the summary
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let arrangement = match &cli.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            Arrangement::from_csv_reader(file)
        }
        None => Arrangement::from_csv_reader(io::stdin().lock()),
    }
    .context("Failed to read arrangement")?;

    let config = BalancerConfigBuilder::default()
        .iterations(cli.iterations)
        .seed(cli.seed)
        .tolerance(cli.tolerance)
        .build()?;

    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(config.iterations as u64)
    };
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40}] {pos}/{len} best {msg}")?
            .progress_chars("=> "),
    );

    let result = rezone(&arrangement, &config, |iteration, best_entropy| {
        progress.set_position(iteration as u64);
        progress.set_message(format!("{:.3}b", best_entropy));
    })?;
    progress.finish_and_clear();

    match &cli.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            result.best_arrangement.write_csv(file)
        }
        None => result.best_arrangement.write_csv(io::stdout().lock()),
    }
    .context("Failed to write arrangement")?;

    if !cli.quiet {
        eprintln!(
            "Got to {:.3}b of entropy (theoretical maximum is {:.3}b)",
            result.best_entropy, result.optimal_entropy
        );
        for (team, counts) in result.zone_summary() {
            eprintln!("{} {}", team, counts.iter().join(" / "));
        }
    }

    Ok(())
}
