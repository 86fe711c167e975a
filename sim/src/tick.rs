use crate::agent::{step_agent, StepReport};
use crate::{Grid, SimError};
use rand::Rng;
use shared::{SimParams, Species};

/// Event counts for one tick.
///
/// Population changes are fully accounted for: rabbits change by
/// `prey_births - prey_eaten - prey_crowded` and foxes by
/// `predator_births - predator_deaths`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Rabbits left behind at the origin plus newborn agents that found a cell
    pub prey_births: u32,
    /// Newborn rabbit agents placed during the pass
    pub newborns_placed: u32,
    /// Newborn rabbit agents with no free cell to go to
    pub newborns_dropped: u32,
    pub predator_births: u32,
    /// Successful hunts
    pub predations: u32,
    /// Rabbits removed by a fox that survived its hunt
    pub prey_eaten: u32,
    /// Rabbits whose landing cell was taken by their own offspring
    pub prey_crowded: u32,
    /// Foxes removed by the mortality check
    pub predator_deaths: u32,
    /// Agents processed across both passes, including newborn ones
    pub agents_processed: usize,
}

impl TickReport {
    fn absorb(&mut self, species: Species, step: &StepReport) {
        self.agents_processed += 1;
        match species {
            Species::Prey => {
                self.prey_births += step.births;
                if step.newborn {
                    if step.placed {
                        self.prey_births += 1;
                        self.newborns_placed += 1;
                    } else {
                        self.newborns_dropped += 1;
                    }
                } else if step.crowded {
                    self.prey_crowded += 1;
                }
            }
            Species::Predator => {
                self.predator_births += step.births;
                if step.caught {
                    self.predations += 1;
                }
                if step.ate_prey() {
                    self.prey_eaten += 1;
                }
                if !step.survived {
                    self.predator_deaths += 1;
                }
            }
        }
    }
}

/// Advance the grid by one tick.
///
/// Foxes go first, then rabbits. Each species' positions are captured when
/// its pass begins; agents appended during the pass are newborn and handled
/// once the index reaches them.
pub fn run_tick<R: Rng + ?Sized>(
    grid: &mut Grid,
    params: &SimParams,
    rng: &mut R,
) -> Result<TickReport, SimError> {
    let mut report = TickReport::default();

    for species in Species::TICK_ORDER {
        let mut agents = grid.positions_of(species.cell());
        let residents = agents.len();
        let mut index = 0;
        while index < agents.len() {
            let origin = agents[index];
            let newborn = index >= residents;
            let step = step_agent(grid, origin, species, newborn, params, rng, &mut agents)?;
            report.absorb(species, &step);
            index += 1;
        }
    }

    Ok(report)
}
