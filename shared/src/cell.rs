use serde::{Deserialize, Serialize};

/// State of a single grid cell. A cell holds at most one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    /// Rabbit
    Prey,
    /// Fox
    Predator,
}

/// The two species that live on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Prey,
    Predator,
}

impl Species {
    /// Order in which species are resolved within one tick.
    /// Predators move first, so prey can be eaten before they get to move.
    pub const TICK_ORDER: [Species; 2] = [Species::Predator, Species::Prey];

    pub fn cell(self) -> CellState {
        match self {
            Species::Prey => CellState::Prey,
            Species::Predator => CellState::Predator,
        }
    }
}

impl From<Species> for CellState {
    fn from(species: Species) -> Self {
        species.cell()
    }
}

impl CellState {
    pub fn is_empty(self) -> bool {
        matches!(self, CellState::Empty)
    }
}
