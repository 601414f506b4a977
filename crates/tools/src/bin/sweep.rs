use std::collections::BTreeMap;

use anyhow::{Result, bail};
use castlegen_core::mapgen::connectivity::unreachable_rooms;
use castlegen_core::{GeneratorConfig, MIN_DIMENSION, MapGenError, generate_level};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

/// Generates many levels from random seeds and sizes and tallies failures.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
    /// Largest width or height drawn for a run
    #[arg(long, default_value_t = 80)]
    max_dimension: usize,
}

fn draw_dimension(rng: &mut ChaCha8Rng, max_dimension: usize) -> usize {
    let span = max_dimension.saturating_sub(MIN_DIMENSION) + 1;
    MIN_DIMENSION + rng.next_u64() as usize % span
}

fn failure_kind(err: &MapGenError) -> String {
    match err {
        MapGenError::InvalidDimensions { .. } => "invalid dimensions".to_string(),
        MapGenError::RetryBudgetExhausted { stage, .. } => format!("{stage} exhausted"),
        MapGenError::NoDoorPlacement { .. } => "no door placement".to_string(),
    }
}

/// Runs `runs` generations and tallies outcomes by kind. Only sealed rooms and
/// splitter door failures count as defects.
fn sweep(seed: u64, runs: u32, max_dimension: usize) -> (BTreeMap<String, u32>, u32) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tally: BTreeMap<String, u32> = BTreeMap::new();
    let mut defects = 0;

    for _ in 0..runs {
        let config = GeneratorConfig {
            seed: rng.next_u64(),
            width: draw_dimension(&mut rng, max_dimension),
            height: draw_dimension(&mut rng, max_dimension),
            ..GeneratorConfig::default()
        };
        match generate_level(config.clone()) {
            Ok(level) => {
                let sealed = unreachable_rooms(&level.map);
                if !sealed.is_empty() {
                    println!(
                        "seed {} {}x{}: {} rooms unreachable",
                        config.seed,
                        config.width,
                        config.height,
                        sealed.len()
                    );
                    *tally.entry("unreachable rooms".to_string()).or_default() += 1;
                    defects += 1;
                }
            }
            Err(err) => {
                println!("seed {} {}x{}: {err}", config.seed, config.width, config.height);
                if !matches!(err, MapGenError::RetryBudgetExhausted { .. }) {
                    defects += 1;
                }
                *tally.entry(failure_kind(&err)).or_default() += 1;
            }
        }
    }
    (tally, defects)
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Sweeping {} levels from seed {}...", args.runs, args.seed);
    let (tally, defects) = sweep(args.seed, args.runs, args.max_dimension);
    if tally.is_empty() {
        println!("All {} levels generated cleanly.", args.runs);
        return Ok(());
    }
    for (kind, count) in &tally {
        println!("{kind}: {count}");
    }
    if defects > 0 {
        bail!("{defects} of {} runs broke a level invariant", args.runs);
    }
    Ok(())
}
