//! One agent's turn within a tick.
//!
//! A turn runs through four stages: move search, breeding check, predation
//! check and mortality check. Each stage is a small function so it can be
//! driven on its own; [`step_agent`] composes them in the order that
//! consumes random draws.

use crate::{DirectionSet, Grid, Position, SimError};
use rand::Rng;
use shared::{CellState, SimParams, Species};

/// Result of looking at one candidate cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encounter {
    /// Empty cell, the agent moves in
    Free,
    /// A fox caught the rabbit in the cell
    Caught,
    /// A hunt was attempted and failed
    Escaped,
    /// Occupied by something the agent cannot displace
    Blocked,
}

impl Encounter {
    /// Whether the move search stops here
    pub fn is_terminal(self) -> bool {
        matches!(self, Encounter::Free | Encounter::Caught)
    }
}

/// What one turn did to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub origin: Position,
    /// Where the agent ended up (or would have, if it died)
    pub landing: Position,
    /// The agent is now on the grid at `landing`
    pub placed: bool,
    /// The agent was offspring appended during this pass, not yet on the grid
    pub newborn: bool,
    /// A hunt succeeded
    pub caught: bool,
    /// False when a fox died of mortality
    pub survived: bool,
    /// Survived but the landing cell was taken, so the agent was not placed
    pub crowded: bool,
    /// Offspring written straight to the origin cell
    pub births: u32,
    /// Offspring appended to the in-flight agent list
    pub deferred: u32,
}

impl StepReport {
    fn new(origin: Position, newborn: bool) -> Self {
        Self {
            origin,
            landing: origin,
            placed: false,
            newborn,
            caught: false,
            survived: false,
            crowded: false,
            births: 0,
            deferred: 0,
        }
    }

    /// A rabbit removed by this turn's hunt
    pub fn ate_prey(&self) -> bool {
        self.caught && self.placed
    }
}

/// Rabbit breeding check. Uses `<=`, so a rate of 1.0 always breeds.
pub fn prey_breeds<R: Rng + ?Sized>(params: &SimParams, rng: &mut R) -> bool {
    rng.gen::<f64>() <= params.breeding_prey
}

/// Fox breeding check after a successful hunt
pub fn predator_breeds<R: Rng + ?Sized>(params: &SimParams, rng: &mut R) -> bool {
    rng.gen::<f64>() < params.breeding_predator
}

/// Classify a candidate cell. Only a fox facing a rabbit draws a number.
pub fn encounter<R: Rng + ?Sized>(
    species: Species,
    target: CellState,
    params: &SimParams,
    rng: &mut R,
) -> Encounter {
    match (species, target) {
        (_, CellState::Empty) => Encounter::Free,
        (Species::Predator, CellState::Prey) => {
            if rng.gen::<f64>() < params.effectiveness_predator {
                Encounter::Caught
            } else {
                Encounter::Escaped
            }
        }
        _ => Encounter::Blocked,
    }
}

/// Mortality check. Rabbits only die by being eaten and draw nothing.
pub fn survives<R: Rng + ?Sized>(species: Species, params: &SimParams, rng: &mut R) -> bool {
    match species {
        Species::Prey => true,
        Species::Predator => rng.gen::<f64>() > params.mortality_predator,
    }
}

/// Resolve one agent's turn, mutating the grid.
///
/// A resident agent vacates its origin first, so it may step back into it.
/// A `newborn` agent was appended to `in_flight` earlier in the pass and is
/// not on the grid yet: its origin belongs to whoever sits there now and is
/// left untouched.
///
/// Each candidate direction is applied to the current candidate position:
/// the first draw of the search starts from the default move, later draws
/// start from the origin again because every failed candidate reverts there.
/// When the search runs out of directions the agent lands on its origin.
/// Agents are only ever placed on an empty cell or, after a hunt, on the
/// caught rabbit's cell.
///
/// A rabbit that finds a free cell may append a new agent at its origin to
/// `in_flight`; the scheduler processes it later in the same pass.
pub fn step_agent<R: Rng + ?Sized>(
    grid: &mut Grid,
    origin: Position,
    species: Species,
    newborn: bool,
    params: &SimParams,
    rng: &mut R,
    in_flight: &mut Vec<Position>,
) -> Result<StepReport, SimError> {
    let size = grid.size();
    let mut report = StepReport::new(origin, newborn);

    if newborn {
        grid.get(origin)?;
    } else {
        grid.set(origin, CellState::Empty)?;
    }

    let (first, _) = DirectionSet::full().sample(rng)?;
    let mut candidate = first.apply(origin, size);

    if species == Species::Prey && prey_breeds(params, rng) && grid.get(origin)?.is_empty() {
        grid.set(origin, CellState::Prey)?;
        report.births += 1;
    }

    let mut available = DirectionSet::full();
    loop {
        let (direction, rest) = match available.sample(rng) {
            Ok(drawn) => drawn,
            Err(SimError::EmptyDistribution) => break,
            Err(err) => return Err(err),
        };
        available = rest;
        candidate = direction.apply(candidate, size);

        let outcome = encounter(species, grid.get(candidate)?, params, rng);
        match outcome {
            Encounter::Free => {
                if species == Species::Prey && prey_breeds(params, rng) {
                    in_flight.push(origin);
                    report.deferred += 1;
                }
            }
            Encounter::Caught => {
                report.caught = true;
                if predator_breeds(params, rng) {
                    grid.set(origin, CellState::Predator)?;
                    report.births += 1;
                }
            }
            Encounter::Escaped | Encounter::Blocked => {}
        }

        if outcome.is_terminal() {
            break;
        }
        candidate = origin;
    }

    report.landing = candidate;
    report.survived = survives(species, params, rng);
    if report.survived {
        if report.caught || grid.get(candidate)?.is_empty() {
            grid.set(candidate, species.cell())?;
            report.placed = true;
        } else {
            report.crowded = true;
        }
    }

    Ok(report)
}
