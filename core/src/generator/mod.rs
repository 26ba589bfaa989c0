use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Strategy deciding where the mines of a new board go.
///
/// Returns row-major flat indices into a `config.rows x config.cols` board.
/// Duplicates are tolerated and collapse into a single mine.
pub trait MinePlacement {
    fn place(&mut self, config: &GameConfig) -> Result<Vec<CellCount>>;
}

impl<P: MinePlacement + ?Sized> MinePlacement for Box<P> {
    fn place(&mut self, config: &GameConfig) -> Result<Vec<CellCount>> {
        (**self).place(config)
    }
}

impl<P: MinePlacement + ?Sized> MinePlacement for &mut P {
    fn place(&mut self, config: &GameConfig) -> Result<Vec<CellCount>> {
        (**self).place(config)
    }
}
