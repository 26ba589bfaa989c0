use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SolveReport {
    /// Tiles flagged as certain mines.
    pub flagged: CellCount,
    /// Tiles opened as certainly safe, not counting flood fill.
    pub opened: CellCount,
    pub outcome: RevealOutcome,
}

impl SolveReport {
    pub const fn none() -> Self {
        Self {
            flagged: 0,
            opened: 0,
            outcome: RevealOutcome::NoChange,
        }
    }

    pub const fn has_update(&self) -> bool {
        self.flagged > 0 || self.outcome.has_update()
    }

    fn merge(&mut self, other: SolveReport) {
        self.flagged += other.flagged;
        self.opened += other.opened;
        self.outcome = self.outcome | other.outcome;
    }
}

/// Deterministic single-pass constraint solver.
///
/// Looks at each open tile in row-major order and applies the two trivial
/// rules against the live board:
/// - as many unrevealed neighbors as the hint: the closed ones are mines;
/// - as many flagged neighbors as the hint: the closed ones are safe.
///
/// One [`sweep`](Self::sweep) is exactly one pass, tiles uncovered late in the
/// pass are not revisited until the next call.
pub struct Solver<'a> {
    board: &'a mut Board,
}

impl<'a> Solver<'a> {
    pub fn new(board: &'a mut Board) -> Self {
        Self { board }
    }

    pub fn sweep(&mut self) -> SolveReport {
        let mut report = SolveReport::none();
        let (rows, cols) = self.board.size();

        for row in 0..rows {
            for col in 0..cols {
                let pos = (row, col);
                let tile = self.board[pos];
                if !tile.is_open() || tile.is_mine() {
                    continue;
                }

                let neighbors: SmallVec<[Coord2; 8]> = self.board.iter_neighbors(pos).collect();
                let hint = tile.adjacent_mines();
                let unrevealed = neighbors
                    .iter()
                    .filter(|&&n| self.board[n].visibility().is_unrevealed())
                    .count() as u8;
                let flagged = neighbors
                    .iter()
                    .filter(|&&n| self.board[n].is_flagged())
                    .count() as u8;

                if unrevealed == hint {
                    for &n in &neighbors {
                        if self.board[n].is_closed() && self.board.toggle_flag(n) {
                            report.flagged += 1;
                        }
                    }
                }

                if flagged == hint {
                    for &n in &neighbors {
                        if !self.board[n].is_closed() {
                            continue;
                        }
                        let outcome = RevealEngine::new(self.board).open_closed(n);
                        report.opened += 1;
                        report.outcome = report.outcome | outcome;
                        if outcome.is_final() {
                            log::trace!("Solver sweep ended the game at {:?}", n);
                            return report;
                        }
                    }
                }
            }
        }

        log::trace!(
            "Solver sweep flagged {} and opened {} tiles",
            report.flagged,
            report.opened
        );
        report
    }

    /// Repeats [`sweep`](Self::sweep) until one changes nothing or the game
    /// ends.
    pub fn solve_to_completion(&mut self) -> SolveReport {
        let mut total = SolveReport::none();
        loop {
            let report = self.sweep();
            total.merge(report);
            if !report.has_update() || report.outcome.is_final() {
                return total;
            }
        }
    }
}
