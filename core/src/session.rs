use core::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Valid transitions:
/// - NotStarted -> Ongoing (start)
/// - Ongoing -> Won
/// - Ongoing -> Lost
/// - Lost -> Ongoing (continue after loss)
/// - any started state -> Ongoing (reset or new game)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    NotStarted,
    Ongoing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_ongoing(self) -> bool {
        matches!(self, Self::Ongoing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One player's game from start to finish, owning its board.
///
/// All mutations run to completion before returning; the session does no
/// locking, so hosts sharing it between threads must serialize access.
#[derive(Clone, Debug)]
pub struct GameSession<P = RandomPlacement> {
    placement: P,
    config: Option<GameConfig>,
    board: Option<Board>,
    state: GameState,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    triggered_mine: Option<Coord2>,
}

impl GameSession<RandomPlacement> {
    /// Session placing mines from OS entropy.
    pub fn new() -> Self {
        Self::with_placement(RandomPlacement::from_os_rng())
    }

    /// Session whose boards are reproducible from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_placement(RandomPlacement::from_seed(seed))
    }
}

impl Default for GameSession<RandomPlacement> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: MinePlacement> GameSession<P> {
    pub fn with_placement(placement: P) -> Self {
        Self {
            placement,
            config: None,
            board: None,
            state: GameState::NotStarted,
            started_at: None,
            ended_at: None,
            triggered_mine: None,
        }
    }

    /// Builds a fresh board and resets the session.
    ///
    /// On error the previous game, if any, is left untouched.
    pub fn start_game(&mut self, rows: Coord, cols: Coord, difficulty: Difficulty) -> Result<()> {
        let config = GameConfig::new(rows, cols, difficulty);
        let board = Board::generate(config, &mut self.placement)?;

        log::debug!(
            "Starting {:?} game on {}x{} with {} mines",
            difficulty,
            rows,
            cols,
            board.mine_count()
        );
        self.config = Some(config);
        self.board = Some(board);
        self.restart_clock();
        Ok(())
    }

    /// Closes every tile and clears flags and timestamps, keeping the layout.
    pub fn reset_game(&mut self) -> Result<()> {
        self.board_mut()?.close_all();
        log::debug!("Game reset with the same layout");
        self.restart_clock();
        Ok(())
    }

    fn restart_clock(&mut self) {
        self.state = GameState::Ongoing;
        self.started_at = Some(Instant::now());
        self.ended_at = None;
        self.triggered_mine = None;
    }

    pub fn open_tile(&mut self, row: Coord, col: Coord) -> Result<RevealOutcome> {
        let pos = self.board()?.validate_position((row, col))?;
        if !self.state.is_ongoing() {
            return Ok(RevealOutcome::NoChange);
        }

        let outcome = RevealEngine::new(self.board_mut()?).open(pos)?;
        self.apply_reveal(outcome);
        Ok(outcome)
    }

    pub fn fast_open(&mut self, row: Coord, col: Coord) -> Result<RevealOutcome> {
        let pos = self.board()?.validate_position((row, col))?;
        if !self.state.is_ongoing() {
            return Ok(RevealOutcome::NoChange);
        }

        let outcome = RevealEngine::new(self.board_mut()?).fast_open(pos)?;
        self.apply_reveal(outcome);
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, row: Coord, col: Coord) -> Result<MarkOutcome> {
        let pos = self.board()?.validate_position((row, col))?;
        if !self.state.is_ongoing() {
            return Ok(MarkOutcome::NoChange);
        }

        Ok(if self.board_mut()?.toggle_flag(pos) {
            MarkOutcome::Changed
        } else {
            MarkOutcome::NoChange
        })
    }

    /// Runs one solver sweep.
    pub fn solve_step(&mut self) -> Result<SolveReport> {
        self.solve_with(|solver| solver.sweep())
    }

    /// Runs solver sweeps until nothing changes or the game ends.
    pub fn solve_to_completion(&mut self) -> Result<SolveReport> {
        self.solve_with(|solver| solver.solve_to_completion())
    }

    fn solve_with<F>(&mut self, run: F) -> Result<SolveReport>
    where
        F: FnOnce(&mut Solver<'_>) -> SolveReport,
    {
        let board = self.board.as_mut().ok_or(GameError::NotStarted)?;
        if !self.state.is_ongoing() {
            return Ok(SolveReport::none());
        }

        let report = run(&mut Solver::new(board));
        self.apply_reveal(report.outcome);
        Ok(report)
    }

    /// Re-closes opened mines and resumes play, keeping flags and opened
    /// safe tiles.
    ///
    /// The clock is not paused, it keeps counting from the game start.
    pub fn continue_after_loss(&mut self) -> Result<MarkOutcome> {
        if self.state != GameState::Lost {
            self.board()?;
            return Ok(MarkOutcome::NoChange);
        }

        let closed = self.board_mut()?.close_open_mines();
        log::debug!("Continuing after loss, re-closed {} mines", closed);
        self.state = GameState::Ongoing;
        self.ended_at = None;
        self.triggered_mine = None;
        Ok(MarkOutcome::Changed)
    }

    fn apply_reveal(&mut self, outcome: RevealOutcome) {
        if outcome == RevealOutcome::HitMine {
            // opened mines are re-closed before play resumes, so there is one
            self.triggered_mine = self.board.as_ref().and_then(|board| {
                board
                    .iter()
                    .find(|(_, tile)| tile.is_mine() && tile.is_open())
                    .map(|(pos, _)| pos)
            });
        }
        self.apply_state(outcome);
    }

    fn apply_state(&mut self, outcome: RevealOutcome) {
        let next = match outcome {
            RevealOutcome::HitMine => GameState::Lost,
            RevealOutcome::Won => GameState::Won,
            RevealOutcome::Revealed | RevealOutcome::NoChange => return,
        };

        self.state = next;
        self.ended_at = Some(Instant::now());
        if let Some(elapsed) = self.elapsed() {
            log::info!("Game {:?} after {:?}", next, elapsed);
        }
    }

    /// True iff every non-mine tile is open.
    pub fn check_win(&self) -> bool {
        self.board.as_ref().is_some_and(Board::all_safe_open)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn config(&self) -> Option<GameConfig> {
        self.config
    }

    pub fn board(&self) -> Result<&Board> {
        self.board.as_ref().ok_or(GameError::NotStarted)
    }

    fn board_mut(&mut self) -> Result<&mut Board> {
        self.board.as_mut().ok_or(GameError::NotStarted)
    }

    pub fn tile_at(&self, row: Coord, col: Coord) -> Result<TileView> {
        Ok(self.board()?.tile((row, col))?.view())
    }

    /// Mines minus flags, negative when the player over-flags.
    pub fn remaining_flags(&self) -> i64 {
        self.board.as_ref().map_or(0, |board| {
            i64::from(board.mine_count()) - i64::from(board.flagged_count())
        })
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Time from start to the end of the game, only known once it ended.
    pub fn elapsed(&self) -> Option<Duration> {
        if !self.state.is_finished() {
            return None;
        }
        let (started_at, ended_at) = (self.started_at?, self.ended_at?);
        Some(ended_at.saturating_duration_since(started_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession<FixedPlacement> {
        let mut session = GameSession::with_placement(FixedPlacement::new(mines));
        session.start_game(size.0, size.1, Difficulty::Easy).unwrap();
        session
    }

    fn views(session: &GameSession<FixedPlacement>) -> Vec<TileView> {
        session
            .board()
            .unwrap()
            .iter()
            .map(|(_, tile)| tile.view())
            .collect()
    }

    #[test]
    fn actions_before_start_are_rejected() {
        let mut session = GameSession::with_seed(1);
        assert_eq!(session.state(), GameState::NotStarted);
        assert_eq!(session.toggle_flag(0, 0), Err(GameError::NotStarted));
        assert_eq!(session.open_tile(0, 0), Err(GameError::NotStarted));
        assert_eq!(session.fast_open(0, 0), Err(GameError::NotStarted));
        assert_eq!(session.solve_step(), Err(GameError::NotStarted));
        assert_eq!(session.reset_game(), Err(GameError::NotStarted));
        assert_eq!(session.continue_after_loss(), Err(GameError::NotStarted));
        assert_eq!(session.remaining_flags(), 0);
    }

    #[test]
    fn start_game_generates_density_board() {
        let mut session = GameSession::with_seed(3);
        session.start_game(16, 30, Difficulty::Medium).unwrap();

        assert_eq!(session.state(), GameState::Ongoing);
        assert_eq!(session.board().unwrap().mine_count(), 96);
        assert_eq!(session.remaining_flags(), 96);
        assert_eq!(session.elapsed(), None);
    }

    #[test]
    fn failed_start_keeps_previous_game() {
        let mut session = session((2, 2), &[(0, 0)]);
        session.toggle_flag(0, 0).unwrap();

        assert_eq!(
            session.start_game(0, 3, Difficulty::Easy),
            Err(GameError::InvalidDimensions)
        );
        assert_eq!(session.tile_at(0, 0), Ok(TileView::Flagged));
        assert_eq!(session.config(), Some(GameConfig::new(2, 2, Difficulty::Easy)));
    }

    #[test]
    fn invalid_position_does_not_mutate() {
        let mut session = session((3, 3), &[(0, 0)]);
        let before = views(&session);

        assert_eq!(session.open_tile(3, 0), Err(GameError::InvalidPosition));
        assert_eq!(session.toggle_flag(0, 3), Err(GameError::InvalidPosition));
        assert_eq!(session.fast_open(9, 9), Err(GameError::InvalidPosition));
        assert_eq!(session.tile_at(3, 3), Err(GameError::InvalidPosition));
        assert_eq!(views(&session), before);
    }

    #[test]
    fn opening_mine_loses_without_touching_other_tiles() {
        let mut session = session((3, 3), &[(1, 1), (2, 2)]);
        session.open_tile(0, 2).unwrap();
        session.toggle_flag(2, 2).unwrap();
        let mut expected = views(&session);
        expected[4] = TileView::Mine;

        assert_eq!(session.open_tile(1, 1), Ok(RevealOutcome::HitMine));
        assert_eq!(session.state(), GameState::Lost);
        assert_eq!(session.triggered_mine(), Some((1, 1)));
        assert_eq!(views(&session), expected);
        assert!(session.elapsed().is_some());
    }

    #[test]
    fn win_needs_every_safe_tile_open() {
        // every safe tile borders the mine, so nothing floods
        let mut session = session((2, 3), &[(0, 1)]);
        session.open_tile(0, 0).unwrap();
        session.open_tile(0, 2).unwrap();
        session.open_tile(1, 0).unwrap();
        session.open_tile(1, 1).unwrap();

        assert_eq!(session.tile_at(1, 2), Ok(TileView::Closed));
        assert!(!session.check_win());
        assert_eq!(session.state(), GameState::Ongoing);

        assert_eq!(session.open_tile(1, 2), Ok(RevealOutcome::Won));
        assert!(session.check_win());
        assert_eq!(session.state(), GameState::Won);
        assert!(session.elapsed().is_some());
    }

    #[test]
    fn actions_after_end_are_no_ops() {
        let mut session = session((2, 2), &[(0, 0)]);
        session.open_tile(0, 0).unwrap();
        let before = views(&session);

        assert_eq!(session.open_tile(1, 1), Ok(RevealOutcome::NoChange));
        assert_eq!(session.toggle_flag(1, 1), Ok(MarkOutcome::NoChange));
        assert_eq!(session.fast_open(0, 1), Ok(RevealOutcome::NoChange));
        assert_eq!(session.solve_step(), Ok(SolveReport::none()));
        assert_eq!(views(&session), before);
        assert_eq!(session.state(), GameState::Lost);
    }

    #[test]
    fn illegal_tile_transitions_are_no_ops() {
        let mut session = session((3, 3), &[(2, 2)]);
        session.toggle_flag(0, 0).unwrap();

        assert_eq!(session.open_tile(0, 0), Ok(RevealOutcome::NoChange));
        assert_eq!(session.tile_at(0, 0), Ok(TileView::Flagged));

        session.open_tile(1, 1).unwrap();
        assert_eq!(session.toggle_flag(1, 1), Ok(MarkOutcome::NoChange));
        assert_eq!(session.tile_at(1, 1), Ok(TileView::Open(1)));
    }

    #[test]
    fn flag_counter_tracks_every_toggle() {
        let mut session = session((4, 4), &[(0, 0), (3, 3)]);
        let toggles = [(0, 0), (1, 1), (0, 0), (2, 3), (3, 3), (1, 1), (0, 1), (0, 2)];

        for (row, col) in toggles {
            session.toggle_flag(row, col).unwrap();
            let flagged = session
                .board()
                .unwrap()
                .iter()
                .filter(|(_, tile)| tile.is_flagged())
                .count() as i64;
            assert_eq!(session.remaining_flags(), 2 - flagged);
        }
        // more flags than mines
        assert_eq!(session.remaining_flags(), -2);
    }

    #[test]
    fn fast_open_loss_records_exploded_neighbor() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.open_tile(1, 1).unwrap();
        session.toggle_flag(2, 2).unwrap();

        assert_eq!(session.fast_open(1, 1), Ok(RevealOutcome::HitMine));
        assert_eq!(session.triggered_mine(), Some((0, 0)));
        assert_eq!(session.state(), GameState::Lost);
    }

    #[test]
    fn continue_after_loss_recloses_unflagged_mines() {
        let mut session = session((3, 3), &[(0, 0), (2, 2)]);
        session.toggle_flag(2, 2).unwrap();
        session.open_tile(1, 1).unwrap();
        session.open_tile(0, 0).unwrap();
        assert_eq!(session.state(), GameState::Lost);

        assert_eq!(session.continue_after_loss(), Ok(MarkOutcome::Changed));

        assert_eq!(session.state(), GameState::Ongoing);
        assert_eq!(session.tile_at(0, 0), Ok(TileView::Closed));
        assert_eq!(session.tile_at(2, 2), Ok(TileView::Flagged));
        assert_eq!(session.tile_at(1, 1), Ok(TileView::Open(2)));
        assert_eq!(session.triggered_mine(), None);
        assert_eq!(session.elapsed(), None);
        assert_eq!(session.remaining_flags(), 1);
    }

    #[test]
    fn continue_only_applies_after_loss() {
        let mut session = session((2, 2), &[(0, 0)]);
        assert_eq!(session.continue_after_loss(), Ok(MarkOutcome::NoChange));
        assert_eq!(session.state(), GameState::Ongoing);
    }

    #[test]
    fn reset_keeps_layout_and_clears_progress() {
        let mut session = session((3, 3), &[(1, 1)]);
        session.toggle_flag(0, 0).unwrap();
        session.open_tile(1, 1).unwrap();
        let layout: Vec<_> = session
            .board()
            .unwrap()
            .iter()
            .map(|(_, tile)| (tile.is_mine(), tile.adjacent_mines()))
            .collect();

        session.reset_game().unwrap();

        assert_eq!(session.state(), GameState::Ongoing);
        assert_eq!(session.remaining_flags(), 1);
        assert_eq!(session.triggered_mine(), None);
        assert_eq!(session.elapsed(), None);
        assert!(views(&session).iter().all(|&view| view == TileView::Closed));
        let after: Vec<_> = session
            .board()
            .unwrap()
            .iter()
            .map(|(_, tile)| (tile.is_mine(), tile.adjacent_mines()))
            .collect();
        assert_eq!(after, layout);
    }

    #[test]
    fn solver_moves_update_session() {
        let mut session = session((3, 3), &[(1, 1)]);
        session.open_tile(1, 2).unwrap();
        session.open_tile(2, 1).unwrap();
        session.open_tile(2, 2).unwrap();

        let report = session.solve_step().unwrap();
        assert_eq!(report.flagged, 1);
        assert_eq!(session.remaining_flags(), 0);
        assert_eq!(session.state(), GameState::Ongoing);

        let report = session.solve_to_completion().unwrap();
        assert_eq!(report.outcome, RevealOutcome::Won);
        assert_eq!(session.state(), GameState::Won);
    }

    #[test]
    fn solver_loss_records_triggered_mine() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.open_tile(1, 1).unwrap();
        session.toggle_flag(2, 2).unwrap();

        let report = session.solve_step().unwrap();

        assert_eq!(report.outcome, RevealOutcome::HitMine);
        assert_eq!(session.state(), GameState::Lost);
        assert_eq!(session.triggered_mine(), Some((0, 0)));
    }

    #[test]
    fn new_game_replaces_board() {
        let mut session = GameSession::with_seed(8);
        session.start_game(9, 9, Difficulty::Easy).unwrap();
        session.open_tile(4, 4).unwrap();

        session.start_game(5, 7, Difficulty::Hard).unwrap();

        let board = session.board().unwrap();
        assert_eq!(board.size(), (5, 7));
        assert_eq!(board.mine_count(), 10);
        assert!(board.iter().all(|(_, tile)| tile.is_closed()));
        assert_eq!(session.state(), GameState::Ongoing);
    }
}
