pub mod agent;
pub mod direction;
pub mod error;
pub mod grid;
pub mod simulation;
pub mod stats;
pub mod tick;

pub use direction::{Direction, DirectionSet};
pub use error::SimError;
pub use grid::{Grid, Position};
pub use simulation::Simulation;
pub use stats::PopulationHistory;
pub use tick::{run_tick, TickReport};

use shared::{SimParams, TickSummary};

/// Run a simulation for a fixed number of ticks without any front end
pub fn run_simulation(
    params: SimParams,
    ticks: u64,
    seed: Option<u64>,
) -> Result<Vec<TickSummary>, SimError> {
    let mut sim = match seed {
        Some(seed) => Simulation::with_seed(params, seed)?,
        None => Simulation::new(params)?,
    };

    (0..ticks).map(|_| sim.step()).collect()
}
