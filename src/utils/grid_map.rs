// Grid map of Normal and ice (Obstructed) cells
// Cells are stored row-major in an nalgebra matrix indexed (row, column).

use std::fmt;
use std::str::FromStr;

use nalgebra as na;

use crate::common::{PlanningError, PlanningResult, Position, Direction};

/// Terrain kind of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Normal,
    /// Traversable at a higher cost; reverts to Normal once entered
    Obstructed,
}

impl CellKind {
    fn symbol(&self) -> char {
        match self {
            CellKind::Normal => '.',
            CellKind::Obstructed => '#',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: na::DMatrix<CellKind>,
}

impl Grid {
    /// All-Normal grid of the given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: na::DMatrix::from_element(height, width, CellKind::Normal),
        }
    }

    /// Grid with the listed cells set to Obstructed
    pub fn with_obstructed<I>(width: usize, height: usize, obstructed: I) -> PlanningResult<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        let mut grid = Self::new(width, height);
        for position in obstructed {
            let index = grid.index(position)?;
            grid.cells[index] = CellKind::Obstructed;
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as usize) < self.width()
            && (position.y as usize) < self.height()
    }

    fn index(&self, position: Position) -> PlanningResult<(usize, usize)> {
        if !self.contains(position) {
            return Err(PlanningError::OutOfBounds {
                position,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok((position.y as usize, position.x as usize))
    }

    pub fn kind_at(&self, position: Position) -> PlanningResult<CellKind> {
        let index = self.index(position)?;
        Ok(self.cells[index])
    }

    pub fn is_obstructed(&self, position: Position) -> bool {
        matches!(self.kind_at(position), Ok(CellKind::Obstructed))
    }

    /// Turn the cell Normal. Returns whether ice was actually broken.
    pub fn clear(&mut self, position: Position) -> PlanningResult<bool> {
        let index = self.index(position)?;
        let was_obstructed = self.cells[index] == CellKind::Obstructed;
        self.cells[index] = CellKind::Normal;
        Ok(was_obstructed)
    }

    /// In-bounds orthogonal neighbours, in `Direction::ALL` order
    pub fn neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        let directions: &'static [Direction; 4] = &Direction::ALL;
        directions
            .iter()
            .map(move |&d| position.step(d))
            .filter(move |p| self.contains(*p))
    }

    pub fn obstructed_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == CellKind::Obstructed).count()
    }
}

impl FromStr for Grid {
    type Err = PlanningError;

    /// Parse an ASCII map: `.` is Normal, `#` is Obstructed, one row per line
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();

        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(PlanningError::InvalidMap("map is empty".to_string()));
        }

        let mut obstructed = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(PlanningError::InvalidMap(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for (x, c) in row.chars().enumerate() {
                match c {
                    '.' => {}
                    '#' => obstructed.push(Position::new(x as i32, y as i32)),
                    other => {
                        return Err(PlanningError::InvalidMap(format!(
                            "unknown cell '{}' at ({}, {})",
                            other, x, y
                        )))
                    }
                }
            }
        }

        Grid::with_obstructed(width, height, obstructed)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height() {
            let line: String = (0..self.width())
                .map(|col| self.cells[(row, col)].symbol())
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
