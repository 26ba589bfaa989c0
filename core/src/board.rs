use core::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular grid of tiles with its mine layout and hints.
///
/// A board is built once per game and replaced, never regenerated in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    tiles: Array2<Tile>,
    mine_count: CellCount,
    open_safe_count: CellCount,
    flagged_count: CellCount,
}

impl Board {
    /// Runs `placement` for `config`, then computes hints.
    pub fn generate<P>(config: GameConfig, placement: &mut P) -> Result<Self>
    where
        P: MinePlacement + ?Sized,
    {
        let config = config.validate()?;
        let mines = placement.place(&config)?;

        let mut board = Self::empty(config.size());
        board.place_mines(&mines)?;
        board.place_hints();

        log::debug!(
            "Generated {}x{} board with {} mines",
            config.rows,
            config.cols,
            board.mine_count
        );
        Ok(board)
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let config = GameConfig::new(size.0, size.1, Difficulty::default());
        Self::generate(config, &mut FixedPlacement::new(mine_coords))
    }

    fn empty(size: Coord2) -> Self {
        Self {
            tiles: Array2::default(size.to_nd_index()),
            mine_count: 0,
            open_safe_count: 0,
            flagged_count: 0,
        }
    }

    fn place_mines(&mut self, indices: &[CellCount]) -> Result<()> {
        let total_cells = self.total_cells();
        let cols = self.cols();

        for &index in indices {
            if index >= total_cells {
                return Err(GameError::InvalidPosition);
            }
            let tile = &mut self.tiles[from_flat_index(index, cols).to_nd_index()];
            if !tile.is_mine() {
                *tile = Tile::mine();
                self.mine_count += 1;
            }
        }

        if self.mine_count >= total_cells {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    fn place_hints(&mut self) {
        // hints read a frozen copy of the layout
        let mine_mask = self.tiles.map(Tile::is_mine);

        for ((row, col), tile) in self.tiles.indexed_iter_mut() {
            if tile.is_mine() {
                continue;
            }
            let adjacent = mine_mask
                .iter_neighbors((row as Coord, col as Coord))
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count();
            tile.set_adjacent(adjacent as u8);
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.tiles.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        self.tiles.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn validate_position(&self, pos: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if pos.0 < rows && pos.1 < cols {
            Ok(pos)
        } else {
            Err(GameError::InvalidPosition)
        }
    }

    pub fn tile(&self, pos: Coord2) -> Result<&Tile> {
        let pos = self.validate_position(pos)?;
        Ok(&self[pos])
    }

    /// True iff every non-mine tile is open.
    pub fn all_safe_open(&self) -> bool {
        self.open_safe_count == self.safe_cell_count()
    }

    pub fn iter_neighbors(&self, pos: Coord2) -> NeighborIter {
        self.tiles.iter_neighbors(pos)
    }

    pub fn count_neighbors(&self, pos: Coord2, visibility: Visibility) -> u8 {
        self.iter_neighbors(pos)
            .filter(|&n| self[n].visibility() == visibility)
            .count() as u8
    }

    /// Iterates tiles with their positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Tile)> {
        self.tiles
            .indexed_iter()
            .map(|((row, col), tile)| ((row as Coord, col as Coord), tile))
    }

    /// Opens a closed tile, returns whether anything changed.
    pub(crate) fn open(&mut self, pos: Coord2) -> bool {
        let tile = &mut self.tiles[pos.to_nd_index()];
        if !tile.is_closed() {
            return false;
        }
        tile.set_visibility(Visibility::Open);
        if !tile.is_mine() {
            self.open_safe_count += 1;
        }
        true
    }

    /// Toggles `Closed <-> Flagged`, returns whether anything changed.
    pub(crate) fn toggle_flag(&mut self, pos: Coord2) -> bool {
        let tile = &mut self.tiles[pos.to_nd_index()];
        match tile.visibility() {
            Visibility::Closed => {
                tile.set_visibility(Visibility::Flagged);
                self.flagged_count += 1;
                true
            }
            Visibility::Flagged => {
                tile.set_visibility(Visibility::Closed);
                self.flagged_count -= 1;
                true
            }
            Visibility::Open => false,
        }
    }

    /// Closes every tile and drops every flag, keeping the layout.
    pub(crate) fn close_all(&mut self) {
        for tile in self.tiles.iter_mut() {
            tile.set_visibility(Visibility::Closed);
        }
        self.open_safe_count = 0;
        self.flagged_count = 0;
    }

    /// Closes opened mines, leaves flags and safe tiles alone.
    pub(crate) fn close_open_mines(&mut self) -> CellCount {
        let mut closed = 0;
        for tile in self.tiles.iter_mut() {
            if tile.is_mine() && tile.is_open() {
                tile.set_visibility(Visibility::Closed);
                closed += 1;
            }
        }
        closed
    }
}

impl Index<Coord2> for Board {
    type Output = Tile;

    fn index(&self, pos: Coord2) -> &Self::Output {
        &self.tiles[pos.to_nd_index()]
    }
}
