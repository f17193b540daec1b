use serde::{Deserialize, Serialize};

use crate::Point;
use crate::board::{Board, Cell, Scores};
use crate::error::GameError;
use crate::history::History;
use crate::player::Player;
use crate::tracer::RegionPolygon;
use crate::turn::PlacedMove;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    TwoPlayer,
    VsComputer,
    Sandbox,
    Network,
}

impl Mode {
    /// Local rewind is off when the remote peer's state is authoritative.
    pub fn allows_history(self) -> bool {
        !matches!(self, Mode::Network)
    }

    /// Sandbox places points for either side without passing the turn.
    pub fn alternates_turns(self) -> bool {
        !matches!(self, Mode::Sandbox)
    }
}

/// Serialized game snapshot for frontend and persistence consumers.
#[derive(Debug, Serialize, Deserialize)]
pub struct GameState {
    pub cells: Vec<Cell>,
    pub cols: u8,
    pub rows: u8,
    pub turn: Player,
    pub score: Scores,
    pub polygons: Vec<RegionPolygon>,
}

/// One game: a board plus the mode, move log, and undo/redo history.
#[derive(Debug, Clone)]
pub struct Game {
    mode: Mode,
    board: Board,
    history: History,
    moves: Vec<PlacedMove>,
    undone: Vec<PlacedMove>,
}

impl Game {
    pub fn new(cols: u8, rows: u8, mode: Mode) -> Self {
        let board = Board::with_dimensions(cols, rows);
        let history = History::new(board.clone(), mode.allows_history());
        Game {
            mode,
            board,
            history,
            moves: Vec::new(),
            undone: Vec::new(),
        }
    }

    // -- Accessors --

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cols(&self) -> u8 {
        self.board.cols()
    }

    pub fn rows(&self) -> u8 {
        self.board.rows()
    }

    pub fn turn(&self) -> Player {
        self.board.turn()
    }

    pub fn score(&self) -> &Scores {
        self.board.score()
    }

    pub fn polygons(&self) -> &[RegionPolygon] {
        self.board.polygons()
    }

    pub fn moves(&self) -> &[PlacedMove] {
        &self.moves
    }

    pub fn is_playable(&self, point: Point) -> bool {
        self.board.is_playable(point)
    }

    // -- Game actions --

    /// Place a point for the player whose turn it is.
    pub fn try_place(&mut self, point: Point) -> Result<(), GameError> {
        self.apply(self.board.turn(), point, true)
    }

    /// Place a point for an explicit player (sandbox play, simulated turns).
    pub fn try_place_as(&mut self, player: Player, point: Point) -> Result<(), GameError> {
        self.apply(player, point, true)
    }

    /// Full move semantics without a history commit.
    pub fn place_unrecorded(&mut self, player: Player, point: Point) -> Result<(), GameError> {
        self.apply(player, point, false)
    }

    fn apply(&mut self, player: Player, point: Point, commit: bool) -> Result<(), GameError> {
        self.board.try_place(player, point)?;
        if self.mode.alternates_turns() {
            self.board.set_turn(player.opp());
        }
        self.moves.push(PlacedMove::new(player, point));
        if commit {
            self.undone.clear();
            self.history.commit(&self.board);
        }
        Ok(())
    }

    /// Step back one committed move. No-op in networked play and at the
    /// start of the game.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.board = snapshot;
                if let Some(m) = self.moves.pop() {
                    self.undone.push(m);
                }
                true
            }
            None => false,
        }
    }

    /// Reapply the most recently undone move. No-op in networked play.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.board = snapshot;
                if let Some(m) = self.undone.pop() {
                    self.moves.push(m);
                }
                true
            }
            None => false,
        }
    }

    // -- Serialization --

    pub fn game_state(&self) -> GameState {
        GameState {
            cells: self.board.cells().to_vec(),
            cols: self.board.cols(),
            rows: self.board.rows(),
            turn: self.board.turn(),
            score: *self.board.score(),
            polygons: self.board.polygons().to_vec(),
        }
    }

    pub fn from_game_state(mode: Mode, state: GameState, moves: Vec<PlacedMove>) -> Self {
        let board = Board::from_state(
            state.cells,
            state.cols,
            state.rows,
            state.turn,
            state.score,
            state.polygons,
        );
        let history = History::new(board.clone(), mode.allows_history());
        Game {
            mode,
            board,
            history,
            moves,
            undone: Vec::new(),
        }
    }
}
