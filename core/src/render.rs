//! Plain-text dump of a board, handy for logs and terminal hosts.

use core::fmt;

use crate::*;

impl fmt::Display for TileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileView::Closed => f.write_str("O"),
            TileView::Flagged => f.write_str(">"),
            TileView::Open(count) => write!(f, "{}", count),
            TileView::Mine => f.write_str("X"),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.size();
        for row in 0..rows {
            f.write_str("[")?;
            for col in 0..cols {
                write!(f, " {}", self[(row, col)].view())?;
            }
            f.write_str(" ]\n")?;
        }
        Ok(())
    }
}

impl<P: MinePlacement> fmt::Display for GameSession<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(board) = self.board() else {
            return f.write_str("No game started\n");
        };
        writeln!(f, "Mines left: {}", self.remaining_flags())?;
        write!(f, "{}", board)
    }
}
