use crate::CellState;
use serde::{Deserialize, Serialize};

/// Immutable copy of the grid handed to renderers after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Side length
    pub size: usize,

    /// Row-major cells, `cells[x * size + y]`
    pub cells: Vec<CellState>,
}

impl GridSnapshot {
    /// Cell at row `x`, column `y`
    pub fn get(&self, x: usize, y: usize) -> Option<CellState> {
        if x < self.size && y < self.size {
            Some(self.cells[x * self.size + y])
        } else {
            None
        }
    }

    /// Iterate rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn count_of(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }
}

/// One point of the population trend chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationSample {
    pub prey_percent: f64,
    pub predator_percent: f64,

    /// Position inside the sliding window, always `0..len`
    pub tick_index: usize,
}

/// One point of the phase portrait (rabbits on x, foxes on y)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhasePoint {
    pub prey_percent: f64,
    pub predator_percent: f64,
}

/// Per-tick summary emitted by headless runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSummary {
    /// Ticks completed since the last reset
    pub tick: u64,

    pub prey: usize,
    pub predator: usize,
    pub prey_percent: f64,
    pub predator_percent: f64,

    /// Rabbits born this tick (left behind or deferred)
    pub prey_births: u32,

    /// Foxes born after a successful hunt
    pub predator_births: u32,

    /// Successful hunts
    pub predations: u32,

    /// Foxes that died of mortality
    pub predator_deaths: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> GridSnapshot {
        GridSnapshot {
            size: 2,
            cells: vec![
                CellState::Prey,
                CellState::Empty,
                CellState::Predator,
                CellState::Prey,
            ],
        }
    }

    #[test]
    fn test_snapshot_access() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.get(0, 0), Some(CellState::Prey));
        assert_eq!(snapshot.get(1, 0), Some(CellState::Predator));
        assert_eq!(snapshot.get(2, 0), None);
        assert_eq!(snapshot.count_of(CellState::Prey), 2);
        assert_eq!(snapshot.rows().count(), 2);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: GridSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn test_tick_summary_serialization() {
        let summary = TickSummary {
            tick: 3,
            prey: 30,
            predator: 10,
            prey_percent: 30.0,
            predator_percent: 10.0,
            prey_births: 4,
            predator_births: 1,
            predations: 2,
            predator_deaths: 0,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"predations\":2"));
        let decoded: TickSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, decoded);
    }
}
