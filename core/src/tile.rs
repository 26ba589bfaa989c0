use serde::{Deserialize, Serialize};

/// Authoritative visibility of a tile.
///
/// `Closed -> Open` is one-way, `Closed <-> Flagged` toggles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Closed,
    Open,
    Flagged,
}

impl Visibility {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Closed | Self::Flagged)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    mine: bool,
    adjacent: u8,
    visibility: Visibility,
}

impl Tile {
    pub(crate) const fn mine() -> Self {
        Self {
            mine: true,
            adjacent: 0,
            visibility: Visibility::Closed,
        }
    }

    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    /// Mines in the Moore-neighborhood, always 0 for mine tiles.
    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent
    }

    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.visibility, Visibility::Open)
    }

    pub const fn is_closed(&self) -> bool {
        matches!(self.visibility, Visibility::Closed)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.visibility, Visibility::Flagged)
    }

    pub const fn view(&self) -> TileView {
        match (self.visibility, self.mine) {
            (Visibility::Closed, _) => TileView::Closed,
            (Visibility::Flagged, _) => TileView::Flagged,
            (Visibility::Open, true) => TileView::Mine,
            (Visibility::Open, false) => TileView::Open(self.adjacent),
        }
    }

    pub(crate) fn set_adjacent(&mut self, adjacent: u8) {
        debug_assert!(!self.mine, "mines never carry a hint");
        self.adjacent = adjacent;
    }

    pub(crate) fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }
}

/// What a player is allowed to see of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileView {
    Closed,
    Flagged,
    Open(u8),
    /// An opened mine, only reachable by losing.
    Mine,
}
