use anyhow::{Context, Result};
use sim::Simulation;
use std::io::Write;

/// Run `ticks` ticks and write one JSON summary per line
pub fn run<W: Write>(sim: &mut Simulation, ticks: u64, mut out: W) -> Result<()> {
    tracing::info!("Running {} ticks headless", ticks);

    for _ in 0..ticks {
        let summary = sim.step().context("Tick failed")?;
        serde_json::to_writer(&mut out, &summary).context("Failed to encode tick summary")?;
        writeln!(out)?;

        if summary.prey == 0 && summary.predator == 0 {
            tracing::debug!("World is empty at tick {}", summary.tick);
        }
    }

    out.flush()?;

    let (prey, predator) = sim.population();
    tracing::info!(
        "Finished at tick {} with {} rabbits and {} foxes",
        sim.tick(),
        prey,
        predator
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{SimParams, TickSummary};

    #[test]
    fn test_one_line_per_tick() {
        let params = SimParams {
            world_size: 12,
            ..Default::default()
        };
        let mut sim = Simulation::with_seed(params, 3).unwrap();
        let mut out = Vec::new();
        run(&mut sim, 15, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let summaries: Vec<TickSummary> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(summaries.len(), 15);
        assert_eq!(summaries[0].tick, 1);
        assert_eq!(summaries[14].tick, 15);
        assert_eq!(
            (summaries[14].prey, summaries[14].predator),
            sim.population()
        );
    }

    #[test]
    fn test_zero_ticks_writes_nothing() {
        let mut sim = Simulation::with_seed(SimParams::default(), 1).unwrap();
        let mut out = Vec::new();
        run(&mut sim, 0, &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(sim.tick(), 0);
    }
}
