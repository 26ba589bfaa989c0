use alloc::vec::Vec;

use crate::*;

/// Opens tiles on a board, expanding zero regions.
///
/// The engine only touches tile visibility, game state transitions are left
/// to the caller based on the returned [`RevealOutcome`].
pub struct RevealEngine<'a> {
    board: &'a mut Board,
}

impl<'a> RevealEngine<'a> {
    pub fn new(board: &'a mut Board) -> Self {
        Self { board }
    }

    /// Opens a closed tile, or chords an already open one.
    ///
    /// Flagged tiles are never opened.
    pub fn open(&mut self, pos: Coord2) -> Result<RevealOutcome> {
        let pos = self.board.validate_position(pos)?;

        Ok(match self.board[pos].visibility() {
            Visibility::Closed => self.open_closed(pos),
            Visibility::Open => self.chord(pos),
            Visibility::Flagged => RevealOutcome::NoChange,
        })
    }

    /// Opens every closed neighbor of an open tile whose flag count matches
    /// its hint.
    ///
    /// Stops at the first neighbor that ends the game, so the end state is
    /// the same as opening the neighbors one by one.
    pub fn fast_open(&mut self, pos: Coord2) -> Result<RevealOutcome> {
        let pos = self.board.validate_position(pos)?;
        Ok(self.chord(pos))
    }

    fn chord(&mut self, pos: Coord2) -> RevealOutcome {
        let tile = self.board[pos];
        if !tile.is_open() || tile.is_mine() {
            return RevealOutcome::NoChange;
        }

        if self.board.count_neighbors(pos, Visibility::Flagged) != tile.adjacent_mines() {
            return RevealOutcome::NoChange;
        }

        let mut outcome = RevealOutcome::NoChange;
        for neighbor in self.board.iter_neighbors(pos) {
            if !self.board[neighbor].is_closed() {
                continue;
            }
            outcome = outcome | self.open_closed(neighbor);
            if outcome.is_final() {
                break;
            }
        }
        outcome
    }

    pub(crate) fn open_closed(&mut self, pos: Coord2) -> RevealOutcome {
        if !self.board.open(pos) {
            return RevealOutcome::NoChange;
        }

        let tile = self.board[pos];
        if tile.is_mine() {
            return RevealOutcome::HitMine;
        }

        if tile.adjacent_mines() == 0 {
            let opened = self.flood(pos);
            log::trace!("Flood fill from {:?} opened {} tiles", pos, opened);
        }

        if self.board.all_safe_open() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// Expands from an opened zero tile using an explicit stack, tile
    /// visibility doubles as the visited set.
    fn flood(&mut self, start: Coord2) -> CellCount {
        let mut opened = 0;
        let mut to_visit = Vec::from([start]);

        while let Some(pos) = to_visit.pop() {
            for neighbor in self.board.iter_neighbors(pos) {
                if !self.board.open(neighbor) {
                    continue;
                }
                opened += 1;

                let tile = self.board[neighbor];
                debug_assert!(!tile.is_mine(), "zero tiles never border a mine");
                if tile.adjacent_mines() == 0 {
                    to_visit.push(neighbor);
                }
            }
        }

        opened
    }
}
