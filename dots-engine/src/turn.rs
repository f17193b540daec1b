use serde::{Deserialize, Serialize};

use crate::Point;
use crate::player::Player;

/// One committed placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedMove {
    pub player: Player,
    pub pos: Point,
}

impl PlacedMove {
    pub fn new(player: Player, pos: Point) -> Self {
        PlacedMove { player, pos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality() {
        let a = PlacedMove::new(Player::Blue, (1, 1));
        let b = PlacedMove::new(Player::Blue, (1, 1));
        let c = PlacedMove::new(Player::Red, (1, 1));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn json_shape() {
        let m = PlacedMove::new(Player::Red, (3, 4));
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json["player"], 1);
        assert_eq!(json["pos"], serde_json::json!([3, 4]));
    }
}
