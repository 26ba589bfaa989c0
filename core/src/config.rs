use serde::{Deserialize, Serialize};

use crate::*;

/// Difficulty tier, each mapping to a fixed mine density.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Mine density in whole percent.
    pub const fn density_percent(self) -> CellCount {
        match self {
            Self::Easy => 10,
            Self::Medium => 20,
            Self::Hard => 30,
        }
    }

    /// Fraction of cells that are mines.
    pub fn density(self) -> f64 {
        f64::from(self.density_percent()) / 100.0
    }

    /// `floor(cells * density)`, computed without floating point.
    pub const fn mine_count(self, total_cells: CellCount) -> CellCount {
        // u64 keeps the product exact for every board that fits `CellCount`
        ((total_cells as u64 * self.density_percent() as u64) / 100) as CellCount
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl GameConfig {
    pub const fn new(rows: Coord, cols: Coord, difficulty: Difficulty) -> Self {
        Self {
            rows,
            cols,
            difficulty,
        }
    }

    pub fn validate(&self) -> Result<Self> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::InvalidDimensions);
        }
        Ok(*self)
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn mine_count(&self) -> CellCount {
        self.difficulty.mine_count(self.total_cells())
    }
}
