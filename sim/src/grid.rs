use crate::SimError;
use rand::Rng;
use shared::{CellState, GridSnapshot, ParamError};

/// Grid coordinate. `x` is the row, `y` the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Square lattice of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create an empty grid with side length `size`
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![CellState::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn index(&self, pos: Position) -> Result<usize, SimError> {
        if pos.x < self.size && pos.y < self.size {
            Ok(pos.x * self.size + pos.y)
        } else {
            Err(SimError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                size: self.size,
            })
        }
    }

    pub fn get(&self, pos: Position) -> Result<CellState, SimError> {
        let index = self.index(pos)?;
        Ok(self.cells[index])
    }

    pub fn set(&mut self, pos: Position, state: CellState) -> Result<(), SimError> {
        let index = self.index(pos)?;
        self.cells[index] = state;
        Ok(())
    }

    /// Count cells in the given state (full scan)
    pub fn count_of(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }

    /// Positions holding `state`, in row-major order
    pub fn positions_of(&self, state: CellState) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell == state)
            .map(|(index, _)| Position::new(index / self.size, index % self.size))
            .collect()
    }

    pub fn clear(&mut self) {
        self.cells.fill(CellState::Empty);
    }

    /// Clear the grid and scatter rabbits and foxes over distinct random cells.
    ///
    /// `prey_percent` and `predator_percent` are whole percentages of the cell
    /// count; the number placed is `floor(percent / 100 * cells)`. Foxes are
    /// drawn from the cells not already chosen for rabbits, so the two never
    /// overlap.
    pub fn seed<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        prey_percent: u32,
        predator_percent: u32,
    ) -> Result<(), SimError> {
        if prey_percent.saturating_add(predator_percent) >= 100 {
            return Err(ParamError::DensityOverflow {
                prey: prey_percent,
                predator: predator_percent,
            }
            .into());
        }

        self.clear();

        let total = self.cells.len();
        let prey_count = prey_percent as usize * total / 100;
        let predator_count = predator_percent as usize * total / 100;

        let chosen = rand::seq::index::sample(rng, total, prey_count + predator_count);
        for (order, index) in chosen.iter().enumerate() {
            self.cells[index] = if order < prey_count {
                CellState::Prey
            } else {
                CellState::Predator
            };
        }

        Ok(())
    }

    /// Immutable copy for renderers
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            size: self.size,
            cells: self.cells.clone(),
        }
    }
}
