use std::env;
use std::fs;

use anyhow::Context;

use reelsmith::config::ConfigManager;
use reelsmith::engines::generation::WriterSink;
use reelsmith::{run_genetic_search, SearchOutcome};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config_path = args.get(1).map(|s| s.as_str()).unwrap_or("reelsmith.toml");
    let json_out = args.get(2).cloned();

    println!("=== reelsmith reel search ===");
    println!("Config: {}", config_path);

    let manager = ConfigManager::new();
    manager
        .load_from_file(config_path)
        .with_context(|| format!("loading {}", config_path))?;
    let config = manager.get();

    println!("  Population: {}", config.evolution.population_size);
    println!("  Generations: {}", config.evolution.generations);
    println!("  Spins per candidate: {}", config.simulation.spin_count);
    println!();

    let slot = config.slot.build()?;
    let classes = config.slot.symbol_classes();
    let layouts = config.reels.build()?;
    let targets = config.targets.build()?;

    let mut sink = WriterSink::stdout();
    let outcome = run_genetic_search(
        config.evolution.to_ga_config(),
        layouts,
        classes,
        targets,
        config.simulation.spin_count,
        slot,
        &mut sink,
    )?;

    print_summary(&outcome);

    if let Some(path) = json_out {
        fs::write(&path, outcome.summary_json()?)
            .with_context(|| format!("writing {}", path))?;
        println!("Summary written to {}", path);
    }

    Ok(())
}

fn print_summary(outcome: &SearchOutcome) {
    let fitness = &outcome.fitness;
    println!();
    println!("===============================================");
    println!("Search finished");
    println!("===============================================");
    println!("  Best fitness:    {:.6}", fitness.total);
    println!("  RTP:             {:.4} (delta {:.4})", fitness.rtp, fitness.rtp_delta);
    println!(
        "  Hit frequency:   {:.4} (delta {:.4})",
        fitness.hit_frequency, fitness.hit_delta
    );
    println!(
        "  Bonus frequency: {:.5} (delta {:.4})",
        fitness.bonus_frequency, fitness.bonus_delta
    );
    println!("  Symbol RTP err:  {:.4}", fitness.symbol_rtp_error);
    println!();
    for (reel, strip) in outcome.best.strips.iter().enumerate() {
        println!("  Reel {} ({} symbols): {:?}", reel, strip.len(), strip);
    }
}
