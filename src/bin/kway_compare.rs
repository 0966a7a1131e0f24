use std::time::{Duration, Instant};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kway::workload::{Distribution, Pattern, Workload};
use kway::{CountingOrder, Merge, MergeOptions, NaturalOrder, Strategy};

#[derive(Parser, Debug)]
#[command(
    name = "kway-compare",
    version,
    about = "Run the merge engines over one workload and compare their cost"
)]
struct Args {
    /// Number of sources
    #[arg(short, long, default_value_t = 10)]
    k: usize,

    /// Total number of values across all sources
    #[arg(short, long, default_value_t = 100_000)]
    n: usize,

    /// uniform | skewed | power-law | single-dominant
    #[arg(short, long, default_value = "uniform")]
    distribution: Distribution,

    /// random | sequential | clustered
    #[arg(short, long, default_value = "random")]
    pattern: Pattern,

    /// Seed for the workload generator
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Engines to run, comma separated
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "linear,heap,loser-tree"
    )]
    engines: Vec<Strategy>,

    /// Print the first values of the merged output
    #[arg(long, default_value_t = 0)]
    show: usize,
}

struct EngineRun {
    strategy: Strategy,
    output: Vec<u32>,
    comparisons: u64,
    elapsed: Duration,
}

fn init_log() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn run_engine(strategy: Strategy, sources: &[Vec<u32>]) -> kway::Result<EngineRun> {
    let start = Instant::now();
    let mut merge = Merge::with_options(
        MergeOptions::with_strategy(strategy),
        sources.iter().map(|source| source.iter().copied()),
        CountingOrder::new(NaturalOrder),
    )?;
    let output: Vec<u32> = merge.by_ref().collect();
    let elapsed = start.elapsed();

    Ok(EngineRun {
        strategy,
        output,
        comparisons: merge.order().comparisons(),
        elapsed,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_log();
    let args = Args::parse();

    let sources = Workload::new(args.seed).generate(args.k, args.n, args.distribution, args.pattern)?;
    info!(
        k = args.k,
        n = args.n,
        distribution = %args.distribution,
        pattern = %args.pattern,
        "generated workload"
    );

    let mut runs = Vec::with_capacity(args.engines.len());
    for &strategy in &args.engines {
        runs.push(run_engine(strategy, &sources)?);
    }

    println!(
        "k={} n={} distribution={} pattern={} (auto-selection picks {})",
        args.k,
        args.n,
        args.distribution,
        args.pattern,
        MergeOptions::default().resolve(args.k)
    );
    println!(
        "{:<12} {:>14} {:>12} {:>12}",
        "engine", "comparisons", "per value", "time (ms)"
    );
    for run in &runs {
        let per_value = if run.output.is_empty() {
            0.0
        } else {
            run.comparisons as f64 / run.output.len() as f64
        };
        println!(
            "{:<12} {:>14} {:>12.2} {:>12.3}",
            run.strategy.name(),
            run.comparisons,
            per_value,
            run.elapsed.as_secs_f64() * 1000.0
        );
    }

    let Some(reference) = runs.first() else {
        return Ok(());
    };
    if !reference.output.is_sorted() {
        return Err(format!("{} produced unsorted output", reference.strategy).into());
    }
    if reference.output.len() != args.n {
        return Err(format!(
            "{} produced {} values, expected {}",
            reference.strategy,
            reference.output.len(),
            args.n
        )
        .into());
    }
    for run in &runs[1..] {
        if run.output != reference.output {
            return Err(format!(
                "{} and {} disagree on the merged output",
                reference.strategy, run.strategy
            )
            .into());
        }
    }
    println!("all engines produced identical sorted output");

    if args.show > 0 {
        let shown: Vec<String> = reference
            .output
            .iter()
            .take(args.show)
            .map(u32::to_string)
            .collect();
        println!("first values: {}", shown.join(" "));
    }

    Ok(())
}
