use rand::Rng;
use rand::rngs::SmallRng;

use super::*;

/// Purely random placement, mine count taken from the difficulty density.
///
/// No cell is kept safe for the first click.
#[derive(Clone, Debug)]
pub struct RandomPlacement<R = SmallRng> {
    sampler: RandomSampler<R>,
}

impl RandomPlacement<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(RandomSampler::from_seed(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(RandomSampler::from_os_rng())
    }
}

impl<R: Rng> RandomPlacement<R> {
    pub fn new(sampler: RandomSampler<R>) -> Self {
        Self { sampler }
    }
}

impl<R: Rng> MinePlacement for RandomPlacement<R> {
    fn place(&mut self, config: &GameConfig) -> Result<Vec<CellCount>> {
        let config = config.validate()?;
        let total_cells = config.total_cells();
        let mines = config.mine_count();

        if mines >= total_cells {
            log::warn!(
                "Refusing to fill the board, requested {} mines but only {} cells",
                mines,
                total_cells
            );
            return Err(GameError::TooManyMines);
        }

        self.sampler.sample(mines, 0, total_cells - 1)
    }
}
