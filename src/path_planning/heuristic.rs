//! Admissible distance estimate for four-connected grids

use crate::common::{Cost, Position};

/// Manhattan distance: the number of unit steps between `a` and `b`.
/// Never exceeds the true cost when every step costs at least 1.
pub fn estimate(a: Position, b: Position) -> Cost {
    a.manhattan(&b)
}
