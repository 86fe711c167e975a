use crate::tick::{run_tick, TickReport};
use crate::{Grid, PopulationHistory, SimError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{
    CellState, GridSnapshot, ParamName, PhasePoint, PopulationSample, SimParams, TickSummary,
};
use std::time::Duration;

/// Owns the grid, the population history and the parameters.
///
/// All mutation goes through `&mut self`, so a tick can never overlap with
/// another tick or with a reader; renderers receive copies.
pub struct Simulation {
    params: SimParams,
    grid: Grid,
    history: PopulationHistory,
    tick: u64,
    rng: StdRng,
    last_report: TickReport,
}

impl Simulation {
    /// Create and seed a simulation with an entropy-seeded RNG
    pub fn new(params: SimParams) -> Result<Self, SimError> {
        Self::with_rng(params, StdRng::from_entropy())
    }

    /// Create a simulation whose random draws are reproducible
    pub fn with_seed(params: SimParams, seed: u64) -> Result<Self, SimError> {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: SimParams, rng: StdRng) -> Result<Self, SimError> {
        params.validate()?;

        let mut sim = Self {
            grid: Grid::new(params.world_size),
            history: PopulationHistory::default(),
            params,
            tick: 0,
            rng,
            last_report: TickReport::default(),
        };
        sim.reset()?;
        Ok(sim)
    }

    /// Re-seed the grid from the initial densities and clear the charts
    pub fn reset(&mut self) -> Result<(), SimError> {
        if self.grid.size() != self.params.world_size {
            self.grid = Grid::new(self.params.world_size);
        }
        self.grid.seed(
            &mut self.rng,
            self.params.initial_prey,
            self.params.initial_predator,
        )?;
        self.history.clear();
        self.tick = 0;
        self.last_report = TickReport::default();

        let (prey, predator) = self.population();
        tracing::info!(
            world_size = self.params.world_size,
            prey,
            predator,
            "Simulation reset"
        );
        Ok(())
    }

    /// Run exactly one tick and record the resulting populations
    pub fn step(&mut self) -> Result<TickSummary, SimError> {
        let report = match run_tick(&mut self.grid, &self.params, &mut self.rng) {
            Ok(report) => report,
            Err(err) => {
                tracing::error!("Tick {} failed: {}", self.tick + 1, err);
                debug_assert!(
                    !matches!(err, SimError::OutOfBounds { .. }),
                    "tick touched a cell outside the grid: {err}"
                );
                return Err(err);
            }
        };

        self.tick += 1;
        self.last_report = report;

        let (prey_percent, predator_percent) = self.percentages();
        self.history.record(prey_percent, predator_percent);

        let (prey, predator) = self.population();
        tracing::debug!(
            tick = self.tick,
            prey,
            predator,
            predations = report.predations,
            "Tick complete"
        );

        Ok(TickSummary {
            tick: self.tick,
            prey,
            predator,
            prey_percent,
            predator_percent,
            prey_births: report.prey_births,
            predator_births: report.predator_births,
            predations: report.predations,
            predator_deaths: report.predator_deaths,
        })
    }

    /// Validate and apply one parameter. Changing the world size or an
    /// initial density re-seeds the grid.
    pub fn set_parameter(&mut self, name: ParamName, value: f64) -> Result<(), SimError> {
        if let Err(err) = self.params.set(name, value) {
            tracing::warn!("Rejected {} = {}: {}", name, value, err);
            return Err(err.into());
        }
        tracing::info!("Set {} = {}", name, value);

        if name.requires_reseed() {
            self.reset()?;
        }
        Ok(())
    }

    /// Set an initial density, lowering the other one when the pair would
    /// reach 100%, then re-seed.
    pub fn set_initial_density(&mut self, name: ParamName, value: u32) -> Result<(), SimError> {
        self.params.set_initial_coupled(name, value)?;
        tracing::info!(
            "Initial densities now {}% rabbits, {}% foxes",
            self.params.initial_prey,
            self.params.initial_predator
        );
        self.reset()
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Ticks completed since the last reset
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Event counts of the most recent tick
    pub fn last_report(&self) -> TickReport {
        self.last_report
    }

    /// Delay between automatic ticks at the current speed
    pub fn tick_interval(&self) -> Duration {
        self.params.tick_interval()
    }

    /// (rabbits, foxes)
    pub fn population(&self) -> (usize, usize) {
        (
            self.grid.count_of(CellState::Prey),
            self.grid.count_of(CellState::Predator),
        )
    }

    /// (rabbit %, fox %) of all cells
    pub fn percentages(&self) -> (f64, f64) {
        let (prey, predator) = self.population();
        let cells = self.grid.cell_count() as f64;
        (
            prey as f64 / cells * 100.0,
            predator as f64 / cells * 100.0,
        )
    }

    pub fn grid_snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    pub fn time_series(&self) -> Vec<PopulationSample> {
        self.history.time_series().copied().collect()
    }

    pub fn phase_portrait(&self) -> Vec<PhasePoint> {
        self.history.phase_portrait().copied().collect()
    }
}
