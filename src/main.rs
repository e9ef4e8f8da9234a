use std::path::PathBuf;

use anyhow::Result;

use mma_dataset::config::PipelineConfig;
use mma_dataset::dataset;

fn main() -> Result<()> {
    let mut config = PipelineConfig::from_env();
    apply_cli_overrides(&mut config);

    let summary = dataset::run(&config)?;

    println!("Dataset build complete");
    println!("Output: {}", config.output_path.display());
    println!("Events: {}", summary.events_seen);
    println!("Bouts: {}", summary.bouts_seen);
    println!("Rows: {}", summary.rows_built);
    println!("Checkpoints written: {}", summary.checkpoints_written);
    println!(
        "Degraded lookups: fetch={} parse={} anchor={}",
        summary.fetch_failures, summary.parse_misses, summary.anchor_misses
    );
    if !summary.errors.is_empty() {
        println!("  errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(6) {
            println!("   - {err}");
        }
    }

    Ok(())
}

fn apply_cli_overrides(config: &mut PipelineConfig) {
    if let Some(path) = flag_value("--out") {
        config.output_path = PathBuf::from(path);
    }
    if let Some(path) = flag_value("--checkpoint") {
        config.checkpoint_path = PathBuf::from(path);
    }
    if let Some(seed) = flag_value("--seed").and_then(|raw| raw.trim().parse::<u64>().ok()) {
        config.seed = Some(seed);
    }
    if let Some(interval) =
        flag_value("--checkpoint-interval").and_then(|raw| raw.trim().parse::<usize>().ok())
    {
        config.checkpoint_interval = interval.max(1);
    }
    if let Some(limit) =
        flag_value("--limit-events").and_then(|raw| raw.trim().parse::<usize>().ok())
    {
        config.event_limit = Some(limit);
    }
}

fn flag_value(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&format!("{flag}=")) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
