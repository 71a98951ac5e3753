use alloc::collections::VecDeque;
use alloc::vec::Vec;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;
use crate::types::count;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Won,
    Lost,
}

/// Valid transitions:
/// - Active -> Over(Won)
/// - Active -> Over(Lost), only under [`MineRevealPolicy::ImmediateLoss`]
///
/// Only [`Board::reset_reveals_and_flags`] leaves `Over`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Active,
    Over(GameResult),
}

impl Phase {
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Over(_))
    }

    pub const fn is_won(self) -> bool {
        matches!(self, Self::Over(GameResult::Won))
    }

    pub const fn is_lost(self) -> bool {
        matches!(self, Self::Over(GameResult::Lost))
    }
}

/// Tallies rebuilt from a full tile scan after every mutation. Blocked tiles
/// are never counted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub total_cells: CellCount,
    pub total_mines: CellCount,
    pub flag_count: CellCount,
    pub revealed_safe_count: CellCount,
    pub mines_left: CellCount,
}

impl Counters {
    fn scan(tiles: &[Tile]) -> Self {
        let mut counters = Self::default();
        for tile in tiles.iter().filter(|tile| !tile.is_blocked()) {
            counters.total_cells += 1;
            if tile.is_mine {
                counters.total_mines += 1;
            }
            match tile.state {
                TileState::Flagged => counters.flag_count += 1,
                TileState::Revealed if !tile.is_mine => counters.revealed_safe_count += 1,
                _ => {}
            }
        }
        counters.mines_left = counters.total_mines.saturating_sub(counters.flag_count);
        counters
    }
}

/// One game on one grid. The board is the only writer of its tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    grid: Grid,
    config: BoardConfig,
    tiles: Vec<Tile>,
    initial_states: Vec<TileState>,
    mines_placed: bool,
    started: bool,
    phase: Phase,
    counters: Counters,
    mistakes: CellCount,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// Builds a board. A stage is applied right away; a first-click-safe
    /// layout waits for the first reveal but is rejected here already when it
    /// cannot fit on the grid at all.
    pub fn new(grid: Grid, config: BoardConfig) -> Result<Self> {
        let tiles = alloc::vec![Tile::default(); grid.len()];
        let mut board = Self {
            grid,
            config,
            initial_states: Vec::new(),
            tiles,
            mines_placed: false,
            started: false,
            phase: Phase::Active,
            counters: Counters::default(),
            mistakes: 0,
            triggered_mine: None,
        };

        match board.config.placement.clone() {
            PlacementPolicy::Stage(stage) => board.apply_stage(&stage),
            PlacementPolicy::FirstClickSafe { mines, .. } => {
                // the start tile itself is always kept clear
                let available = count(board.grid.len().saturating_sub(1));
                if mines > available {
                    return Err(BoardError::TooManyMines {
                        requested: mines,
                        available,
                    });
                }
            }
        }

        board.initial_states = board.tiles.iter().map(|tile| tile.state).collect();
        board.refresh();
        Ok(board)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn mistakes(&self) -> CellCount {
        self.mistakes
    }

    /// Whether a reveal has been accepted since construction or the last reset.
    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    /// The mine that ended an immediate-loss game.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn tile(&self, coords: Coord2) -> Option<&Tile> {
        self.grid.index_of(coords).map(|index| &self.tiles[index])
    }

    pub fn tiles(&self) -> impl Iterator<Item = (Coord2, &Tile)> + '_ {
        self.grid.cells().iter().copied().zip(self.tiles.iter())
    }

    pub fn can_chord_at(&self, coords: Coord2) -> bool {
        if self.phase.is_over() {
            return false;
        }
        let Some(index) = self.grid.index_of(coords) else {
            return false;
        };
        let tile = self.tiles[index];
        tile.state == TileState::Revealed
            && tile.number > 0
            && self.count_neighbors(index, |t| t.state == TileState::Flagged) == tile.number
            && self.count_neighbors(index, |t| t.state == TileState::Covered && !t.tripped) > 0
    }

    /// Opens one tile, flooding outward from zeros. Errors only when a deferred
    /// layout does not fit around the first click, in which case nothing
    /// changed.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        if self.phase.is_over() {
            return Ok(RevealOutcome::NoChange);
        }
        let Some(index) = self.grid.index_of(coords) else {
            return Ok(RevealOutcome::NoChange);
        };
        let tile = self.tiles[index];
        if tile.state != TileState::Covered || tile.tripped {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.mines_placed {
            self.place_mines_around(coords)?;
        }
        self.started = true;

        let outcome = self.reveal_index(index);
        Ok(self.finish(outcome))
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        if self.phase.is_over() {
            return MarkOutcome::NoChange;
        }
        let Some(index) = self.grid.index_of(coords) else {
            return MarkOutcome::NoChange;
        };

        let outcome = match self.tiles[index].state {
            TileState::Covered => {
                self.flag_index(index);
                MarkOutcome::Flagged
            }
            TileState::Flagged => {
                self.tiles[index].state = TileState::Covered;
                MarkOutcome::Unflagged
            }
            TileState::Revealed | TileState::Blocked => return MarkOutcome::NoChange,
        };

        self.refresh();
        outcome
    }

    /// Opens every covered neighbor of a revealed number once as many flags as
    /// the number surround it.
    pub fn chord(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.can_chord_at(coords) {
            return RevealOutcome::NoChange;
        }
        let Some(index) = self.grid.index_of(coords) else {
            return RevealOutcome::NoChange;
        };

        let mut outcome = RevealOutcome::NoChange;
        for neighbor in self.grid.neighbor_indices(index) {
            let tile = self.tiles[neighbor];
            if tile.state != TileState::Covered || tile.tripped {
                continue;
            }
            outcome = outcome | self.reveal_index(neighbor);
            if self.phase.is_over() {
                break;
            }
        }
        self.finish(outcome)
    }

    /// Flags every unrevealed neighbor of a revealed number when the number
    /// leaves no other choice.
    pub fn chord_flag(&mut self, coords: Coord2) -> MarkOutcome {
        if self.phase.is_over() {
            return MarkOutcome::NoChange;
        }
        let Some(index) = self.grid.index_of(coords) else {
            return MarkOutcome::NoChange;
        };
        let tile = self.tiles[index];
        if tile.state != TileState::Revealed || tile.number <= 0 {
            return MarkOutcome::NoChange;
        }
        if self.count_neighbors(index, |t| t.state.is_unrevealed()) != tile.number {
            return MarkOutcome::NoChange;
        }

        let mut updated = false;
        for neighbor in self.grid.neighbor_indices(index) {
            if self.tiles[neighbor].state == TileState::Covered {
                self.flag_index(neighbor);
                updated = true;
            }
        }

        if !updated {
            return MarkOutcome::NoChange;
        }
        self.refresh();
        MarkOutcome::Flagged
    }

    /// Soft restart: every tile goes back to its state right after
    /// construction while mines and blocked cells stay where they are.
    ///
    /// Stage pre-reveals and pre-flags come back too, instead of every
    /// non-blocked tile being covered again.
    pub fn reset_reveals_and_flags(&mut self) {
        for (tile, &state) in self.tiles.iter_mut().zip(self.initial_states.iter()) {
            tile.state = state;
            tile.tripped = false;
        }
        self.started = false;
        self.phase = Phase::Active;
        self.mistakes = 0;
        self.triggered_mine = None;
        log::debug!("Board reset, mines stay in place");
        self.refresh();
    }

    fn apply_stage(&mut self, stage: &Stage) {
        for &coords in &stage.blocked {
            match self.grid.index_of(coords) {
                Some(index) => self.tiles[index].state = TileState::Blocked,
                None => log::warn!("Stage blocked cell {:?} is outside the grid", coords),
            }
        }

        for &coords in &stage.mines {
            match self.grid.index_of(coords) {
                Some(index) if self.tiles[index].is_blocked() => {
                    log::warn!("Stage mine {:?} dropped, the cell is blocked", coords);
                }
                Some(index) => self.tiles[index].is_mine = true,
                None => log::warn!("Stage mine {:?} is outside the grid", coords),
            }
        }
        self.mines_placed = true;
        self.compute_numbers();

        for &coords in &stage.start_revealed {
            if let Some(index) = self.grid.index_of(coords) {
                if self.tiles[index].is_safe_cell() {
                    self.tiles[index].state = TileState::Revealed;
                }
            }
        }

        for &coords in &stage.start_flagged {
            if let Some(index) = self.grid.index_of(coords) {
                if !self.tiles[index].is_blocked() {
                    self.tiles[index].state = TileState::Flagged;
                }
            }
        }
    }

    fn place_mines_around(&mut self, start: Coord2) -> Result<()> {
        let PlacementPolicy::FirstClickSafe {
            mines,
            seed,
            start_tile,
        } = self.config.placement
        else {
            return Ok(());
        };

        let layout = RandomMineGenerator::new(seed, mines, start, start_tile).generate(&self.grid)?;
        for index in layout {
            self.tiles[index].is_mine = true;
        }
        self.mines_placed = true;
        self.compute_numbers();

        // flags placed before the layout existed are judged now
        if self.config.flag_mistakes {
            let wrong_flags = self
                .tiles
                .iter()
                .filter(|tile| tile.state == TileState::Flagged && !tile.is_mine)
                .count();
            self.mistakes += count(wrong_flags);
        }
        Ok(())
    }

    fn compute_numbers(&mut self) {
        for index in 0..self.tiles.len() {
            let number = if self.tiles[index].is_blocked() {
                0
            } else if self.tiles[index].is_mine {
                Tile::MINE
            } else {
                self.count_neighbors(index, |tile| tile.is_mine)
            };
            self.tiles[index].number = number;
        }
    }

    /// Applies the mine policy or floods; does not refresh counters.
    fn reveal_index(&mut self, index: usize) -> RevealOutcome {
        if self.tiles[index].is_mine {
            self.hit_mine(index);
            return RevealOutcome::HitMine;
        }
        self.flood_reveal(index);
        RevealOutcome::Revealed
    }

    fn hit_mine(&mut self, index: usize) {
        let coords = self.grid.coord_at(index);
        match self.config.mine_reveal {
            MineRevealPolicy::ImmediateLoss => {
                self.tiles[index].state = TileState::Revealed;
                self.triggered_mine = Some(coords);
                self.end_game(GameResult::Lost);
            }
            MineRevealPolicy::AccumulateMistakes => {
                self.tiles[index].tripped = true;
                self.mistakes += 1;
                log::debug!("Mine at {:?} tripped, {} mistakes", coords, self.mistakes);
            }
        }
    }

    fn flood_reveal(&mut self, start: usize) {
        let mut queued = HashSet::new();
        queued.insert(start);
        let mut to_visit = VecDeque::from([start]);
        let mut opened = 0usize;

        while let Some(index) = to_visit.pop_front() {
            let tile = &mut self.tiles[index];
            if tile.state != TileState::Covered {
                continue;
            }
            tile.state = TileState::Revealed;
            opened += 1;

            if tile.number == 0 {
                for neighbor in self.grid.neighbor_indices(index) {
                    let next = self.tiles[neighbor];
                    if next.state == TileState::Covered && !next.is_mine && queued.insert(neighbor) {
                        to_visit.push_back(neighbor);
                    }
                }
            }
        }

        log::trace!("Flood from {:?} opened {} tiles", self.grid.coord_at(start), opened);
    }

    fn flag_index(&mut self, index: usize) {
        let tile = &mut self.tiles[index];
        tile.state = TileState::Flagged;
        if self.config.flag_mistakes && self.mines_placed && !tile.is_mine {
            self.mistakes += 1;
        }
    }

    /// Refreshes counters and the win check, upgrading the outcome on a win.
    fn finish(&mut self, outcome: RevealOutcome) -> RevealOutcome {
        let was_active = !self.phase.is_over();
        self.refresh();
        if was_active && self.phase.is_won() {
            outcome | RevealOutcome::Won
        } else {
            outcome
        }
    }

    fn refresh(&mut self) {
        self.counters = Counters::scan(&self.tiles);
        if !self.phase.is_over() && self.mines_placed && self.is_cleared() {
            self.end_game(GameResult::Won);
        }
    }

    fn is_cleared(&self) -> bool {
        let all_safe_revealed = self
            .tiles
            .iter()
            .filter(|tile| tile.is_safe_cell())
            .all(|tile| tile.state == TileState::Revealed);

        match self.config.mine_reveal {
            MineRevealPolicy::ImmediateLoss => all_safe_revealed,
            MineRevealPolicy::AccumulateMistakes => {
                all_safe_revealed
                    && self
                        .tiles
                        .iter()
                        .filter(|tile| tile.is_mine && !tile.is_blocked())
                        .all(|tile| tile.state == TileState::Flagged)
            }
        }
    }

    fn end_game(&mut self, result: GameResult) {
        if self.phase.is_over() {
            return;
        }
        self.phase = Phase::Over(result);
        if result == GameResult::Won {
            self.triggered_mine = None;
        }
        log::debug!("Game over: {:?}", result);
    }

    fn count_neighbors(&self, index: usize, pred: impl Fn(&Tile) -> bool) -> i8 {
        self.grid
            .neighbor_indices(index)
            .into_iter()
            .filter(|&neighbor| pred(&self.tiles[neighbor]))
            .count() as i8
    }
}
