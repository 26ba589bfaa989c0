use super::*;

/// Places mines at an explicit list of positions, ignoring difficulty.
///
/// Used to replay a known layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedPlacement {
    mines: Vec<Coord2>,
}

impl FixedPlacement {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }

    pub fn mines(&self) -> &[Coord2] {
        &self.mines
    }
}

impl MinePlacement for FixedPlacement {
    fn place(&mut self, config: &GameConfig) -> Result<Vec<CellCount>> {
        let config = config.validate()?;
        self.mines
            .iter()
            .map(|&(row, col)| {
                if row < config.rows && col < config.cols {
                    Ok(to_flat_index((row, col), config.cols))
                } else {
                    Err(GameError::InvalidPosition)
                }
            })
            .collect()
    }
}
