use std::path::Path;

use anyhow::Context;
use loadgrid_balancer::TracingSink;
use loadgrid_core::SimulationConfig;
use loadgrid_sim::Simulation;
use tracing::info;

pub fn run(
    path: &str,
    format: &str,
    seed: Option<u64>,
    cycles: Option<u64>,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let mut config = SimulationConfig::from_file(Path::new(path))
        .with_context(|| format!("loading config from {path}"))?;
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(cycles) = cycles {
        config.simulation_length = cycles;
    }
    info!(config = %path, "configuration loaded");

    let mut simulation = Simulation::with_sink(config, Box::new(TracingSink))?;
    let report = simulation.run()?;

    let rendered = match format {
        "json" => serde_json::to_string_pretty(&report)?,
        _ => report.to_string(),
    };
    println!("{rendered}");

    if let Some(output) = output {
        std::fs::write(output, format!("{rendered}\n"))
            .with_context(|| format!("writing summary to {output}"))?;
        println!("✓ Wrote {output}");
    }

    Ok(())
}
