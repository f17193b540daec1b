pub mod ai;
pub mod board;
pub mod error;
pub mod game;
pub mod history;
pub mod net;
pub mod player;
pub mod territory;
pub mod tracer;
pub mod turn;

pub type Point = (u8, u8);

pub use ai::{Computer, Difficulty, SearchConfig};
pub use board::{Board, Cell, Scores};
pub use error::GameError;
pub use game::{Game, GameState, Mode};
pub use history::History;
pub use net::{PeerEvent, PeerTransport};
pub use player::Player;
pub use tracer::RegionPolygon;
pub use turn::PlacedMove;
