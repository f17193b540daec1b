use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::GameError;
use crate::player::Player;
use crate::territory;
use crate::tracer::RegionPolygon;

/// State of one grid intersection.
///
/// `Dead` is terminal: no later move returns a dead cell to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Active(Player),
    Captured(Player),
    Dead,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn active_player(self) -> Option<Player> {
        match self {
            Cell::Active(p) => Some(p),
            _ => None,
        }
    }
}

/// Capture totals indexed by player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scores {
    pub blue: u32,
    pub red: u32,
}

impl Scores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::Blue => self.blue,
            Player::Red => self.red,
        }
    }

    pub(crate) fn add(&mut self, player: Player, count: u32) {
        match player {
            Player::Blue => self.blue += count,
            Player::Red => self.red += count,
        }
    }

    /// Every subtraction matches an earlier capture increment.
    pub(crate) fn sub(&mut self, player: Player, count: u32) {
        match player {
            Player::Blue => self.blue -= count,
            Player::Red => self.red -= count,
        }
    }
}

/// The board stored as a flat cell grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cells: Vec<Cell>,
    cols: u8,
    rows: u8,
    turn: Player,
    score: Scores,
    polygons: Vec<RegionPolygon>,
}

impl Board {
    /// Create a board from an existing cell matrix (rows x cols).
    /// The score is derived from the captured cells already present.
    pub fn new(cells: Vec<Vec<Cell>>) -> Self {
        let rows = cells.len() as u8;
        let cols = if rows == 0 { 0 } else { cells[0].len() as u8 };

        assert!(
            cells.iter().all(|row| row.len() == cols as usize),
            "malformed cell matrix"
        );

        let cells: Vec<Cell> = cells.into_iter().flatten().collect();
        let mut score = Scores::new();
        for &cell in &cells {
            if let Cell::Captured(owner) = cell {
                score.add(owner.opp(), 1);
            }
        }

        Board {
            cells,
            cols,
            rows,
            turn: Player::Blue,
            score,
            polygons: Vec::new(),
        }
    }

    /// Restore a board from serialized state.
    pub fn from_state(
        cells: Vec<Cell>,
        cols: u8,
        rows: u8,
        turn: Player,
        score: Scores,
        polygons: Vec<RegionPolygon>,
    ) -> Self {
        Board {
            cells,
            cols,
            rows,
            turn,
            score,
            polygons,
        }
    }

    /// Create an empty board with the given dimensions.
    pub fn with_dimensions(cols: u8, rows: u8) -> Self {
        Board {
            cells: vec![Cell::Empty; cols as usize * rows as usize],
            cols,
            rows,
            turn: Player::Blue,
            score: Scores::new(),
            polygons: Vec::new(),
        }
    }

    // -- Accessors --

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn score(&self) -> &Scores {
        &self.score
    }

    pub fn polygons(&self) -> &[RegionPolygon] {
        &self.polygons
    }

    pub fn on_board(&self, (x, y): Point) -> bool {
        x < self.cols && y < self.rows
    }

    pub fn cell_at(&self, point: Point) -> Option<Cell> {
        if self.on_board(point) {
            Some(self.cells[self.idx(point.0, point.1)])
        } else {
            None
        }
    }

    /// True only if the cell exists and is empty.
    pub fn is_playable(&self, point: Point) -> bool {
        self.cell_at(point).is_some_and(Cell::is_empty)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    pub fn is_full(&self) -> bool {
        !self.cells.iter().any(|c| c.is_empty())
    }

    // -- Game actions --

    /// Place a point and resolve enclosures, first for the mover and then
    /// for the opponent. A single placement can close the mover's own
    /// encirclement and change the opponent's enclosure at the same time,
    /// so both passes run after every move.
    ///
    /// Does not flip the turn or touch history; those belong to `Game`.
    pub fn try_place(&mut self, player: Player, point: Point) -> Result<(), GameError> {
        if !self.is_playable(point) {
            return Err(GameError::InvalidMove);
        }

        let i = self.idx(point.0, point.1);
        self.cells[i] = Cell::Active(player);

        territory::resolve_regions(self, player);
        territory::resolve_regions(self, player.opp());

        Ok(())
    }

    // -- Graph helpers --

    /// The 4-connected neighbors that are on the board.
    pub fn neighbors(&self, (x, y): Point) -> ArrayVec<Point, 4> {
        let mut result = ArrayVec::new();
        if x > 0 {
            result.push((x - 1, y));
        }
        if x + 1 < self.cols {
            result.push((x + 1, y));
        }
        if y > 0 {
            result.push((x, y - 1));
        }
        if y + 1 < self.rows {
            result.push((x, y + 1));
        }
        result
    }

    // -- Internal helpers --

    #[inline]
    pub(crate) fn idx(&self, x: u8, y: u8) -> usize {
        y as usize * self.cols as usize + x as usize
    }

    pub(crate) fn set_cell_idx(&mut self, i: usize, cell: Cell) {
        self.cells[i] = cell;
    }

    pub(crate) fn set_turn(&mut self, player: Player) {
        self.turn = player;
    }

    pub(crate) fn score_mut(&mut self) -> &mut Scores {
        &mut self.score
    }

    pub(crate) fn push_polygon(&mut self, polygon: RegionPolygon) {
        self.polygons.push(polygon);
    }
}
