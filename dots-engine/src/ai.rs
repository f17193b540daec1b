use crate::Point;
use crate::board::{Board, Cell};
use crate::error::GameError;
use crate::player::Player;

// ---------------------------------------------------------------------------
// Xorshift128 PRNG (deterministic, no external crate)
// ---------------------------------------------------------------------------

struct Rng {
    s: [u32; 4],
}

impl Rng {
    fn new(seed: u64) -> Self {
        // Split seed into four nonzero 32-bit words
        let mut s = [
            (seed & 0xFFFF_FFFF) as u32,
            (seed >> 32) as u32,
            seed.wrapping_mul(6364136223846793005) as u32,
            (seed.wrapping_mul(6364136223846793005) >> 32) as u32,
        ];
        // Ensure no zero state
        for v in &mut s {
            if *v == 0 {
                *v = 0xDEAD_BEEF;
            }
        }
        Self { s }
    }

    fn next(&mut self) -> u32 {
        let t = self.s[3];
        let mut s = self.s[0];
        self.s[3] = self.s[2];
        self.s[2] = self.s[1];
        self.s[1] = s;
        s ^= s << 11;
        s ^= s >> 8;
        self.s[0] = s ^ t ^ (t >> 19);
        self.s[0]
    }

    fn range(&mut self, n: usize) -> usize {
        (self.next() as usize) % n
    }
}

// ---------------------------------------------------------------------------
// Computer opponent
// ---------------------------------------------------------------------------

const DEFAULT_SEED: u64 = 0x0D07_5EED;

const MOVES8: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    /// A uniform-random legal move next to the opponent.
    Weak,
    /// The full speculative search.
    Strong,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Starting Chebyshev radius around the opponent's last point.
    pub base_radius: u8,
    /// Weight on score the opponent would gain if left unblocked.
    pub defense_priority: i32,
    /// Weight on score gained by completing an own enclosure.
    pub attack_priority: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            base_radius: 3,
            defense_priority: 2,
            attack_priority: 1,
        }
    }
}

pub struct Computer {
    difficulty: Difficulty,
    config: SearchConfig,
    rng: Rng,
}

impl Computer {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_seed(difficulty, DEFAULT_SEED)
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_config(difficulty, SearchConfig::default(), seed)
    }

    pub fn with_config(difficulty: Difficulty, config: SearchConfig, seed: u64) -> Self {
        Computer {
            difficulty,
            config,
            rng: Rng::new(seed),
        }
    }

    /// Pick a move for the player whose turn it is on `board`.
    ///
    /// `Ok(None)` means no empty cell borders an opponent point, so there
    /// is no move worth making. Randomness is consumed only when no trial
    /// produced a positive score, so the choice is reproducible whenever a
    /// scoring option exists.
    pub fn choose_move(
        &mut self,
        board: &Board,
        last_opponent_pos: Point,
    ) -> Result<Option<Point>, GameError> {
        let player = board.turn();
        let opponent = player.opp();

        let candidates = candidate_points(board, opponent);
        if candidates.is_empty() {
            return Ok(None);
        }

        if self.difficulty == Difficulty::Weak {
            let i = self.rng.range(candidates.len());
            return Ok(Some(candidates[i]));
        }

        let near = self.narrow_candidates(board, &candidates, last_opponent_pos)?;
        let mut options: Vec<(i32, Point)> = Vec::new();

        // Defensive trials: what would the opponent gain by playing here?
        let opponent_before = board.score().get(opponent) as i32;
        for &p in &near {
            let mut trial = board.clone();
            if trial.try_place(opponent, p).is_ok() {
                let gain = trial.score().get(opponent) as i32 - opponent_before;
                if gain > 0 {
                    options.push((gain * self.config.defense_priority, p));
                }
            }
        }

        // Offensive trials: what do we gain by playing here?
        let own_before = board.score().get(player) as i32;
        for &p in &near {
            let mut trial = board.clone();
            if trial.try_place(player, p).is_ok() {
                let gain = trial.score().get(player) as i32 - own_before;
                if gain > 0 {
                    options.push((gain * self.config.attack_priority, p));
                }
            }
        }

        match options.into_iter().max() {
            Some((_, p)) => Ok(Some(p)),
            None => {
                let i = self.rng.range(near.len());
                Ok(Some(near[i]))
            }
        }
    }

    /// Keep candidates within a growing Chebyshev radius of the opponent's
    /// last point. The cap is unreachable when `candidates` is non-empty on
    /// a sane board; hitting it means the caller skipped the availability
    /// pre-check.
    fn narrow_candidates(
        &self,
        board: &Board,
        candidates: &[Point],
        origin: Point,
    ) -> Result<Vec<Point>, GameError> {
        let limit = 2 * board.cols().max(board.rows()) as i32;
        let mut radius = self.config.base_radius as i32;
        loop {
            let near: Vec<Point> = candidates
                .iter()
                .copied()
                .filter(|&(x, y)| {
                    let dx = (x as i32 - origin.0 as i32).abs();
                    let dy = (y as i32 - origin.1 as i32).abs();
                    dx.max(dy) <= radius
                })
                .collect();
            if !near.is_empty() {
                return Ok(near);
            }
            radius += 1;
            if radius > limit {
                return Err(GameError::SearchAreaExhausted);
            }
        }
    }
}

/// Empty cells bordering any of `opponent`'s active points in the
/// 8-neighborhood. The flood fill's diagonal-jump seal removes nothing
/// here: a sealed diagonal's two flanking walls are themselves opponent
/// points, so the cell is already their orthogonal neighbor. Scan order
/// is row-major, so the result is deterministic for a given board.
fn candidate_points(board: &Board, opponent: Player) -> Vec<Point> {
    let cols = board.cols() as i32;
    let rows = board.rows() as i32;
    let mut seen = vec![false; (cols * rows) as usize];
    let mut result = Vec::new();

    for y in 0..rows {
        for x in 0..cols {
            let cell = board.cell_at((x as u8, y as u8));
            if cell.and_then(Cell::active_player) != Some(opponent) {
                continue;
            }
            for (dx, dy) in MOVES8 {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || nx >= cols || ny < 0 || ny >= rows {
                    continue;
                }
                let ni = (ny * cols + nx) as usize;
                if seen[ni] {
                    continue;
                }
                seen[ni] = true;
                if board.cell_at((nx as u8, ny as u8)) == Some(Cell::Empty) {
                    result.push((nx as u8, ny as u8));
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test helper: build a board from an ASCII layout.
    /// 'B'/'R' = active point, 'b'/'r' = captured point, 'x' = dead, '+' = empty.
    fn board_from_layout(layout: &[&str]) -> Board {
        let cells: Vec<Vec<Cell>> = layout
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| match c {
                        'B' => Cell::Active(Player::Blue),
                        'R' => Cell::Active(Player::Red),
                        'b' => Cell::Captured(Player::Blue),
                        'r' => Cell::Captured(Player::Red),
                        'x' => Cell::Dead,
                        _ => Cell::Empty,
                    })
                    .collect()
            })
            .collect();
        Board::new(cells)
    }

    fn red_to_move(layout: &[&str]) -> Board {
        let mut board = board_from_layout(layout);
        board.set_turn(Player::Red);
        board
    }

    // -- Candidate generation --

    #[test]
    fn candidates_surround_opponent_points() {
        let board = board_from_layout(&[
            "+++++",
            "+++++",
            "++R++",
            "+++++",
            "+++++",
        ]);
        // Blue to move; candidates ring the lone red point.
        let candidates = candidate_points(&board, Player::Red);
        assert_eq!(candidates.len(), 8);
        assert!(candidates.contains(&(1, 1)));
        assert!(candidates.contains(&(3, 3)));
        assert!(!candidates.contains(&(2, 2)));
    }

    #[test]
    fn candidates_skip_occupied_and_dead_cells() {
        let board = board_from_layout(&[
            "+++++",
            "+Bx++",
            "+BR++",
            "+++++",
            "+++++",
        ]);
        let candidates = candidate_points(&board, Player::Red);
        assert!(!candidates.contains(&(1, 1)));
        assert!(!candidates.contains(&(2, 1)));
        assert!(!candidates.contains(&(1, 2)));
        assert!(candidates.contains(&(3, 2)));
        assert!(candidates.contains(&(2, 3)));
    }

    #[test]
    fn candidates_are_listed_once() {
        // (2,1) borders both red points but appears a single time.
        let board = board_from_layout(&[
            "+++++",
            "+R+R+",
            "+++++",
        ]);
        let candidates = candidate_points(&board, Player::Red);
        assert_eq!(
            candidates.iter().filter(|&&p| p == (2, 1)).count(),
            1
        );
        assert_eq!(candidates.len(), 13);
    }

    #[test]
    fn no_candidates_when_no_opponent_points() {
        let board = board_from_layout(&["+++", "+B+", "+++"]);
        assert!(candidate_points(&board, Player::Red).is_empty());
    }

    // -- Move choice --

    #[test]
    fn returns_none_without_a_legal_move() {
        // Full board: nothing playable.
        let board = red_to_move(&["BR", "RB"]);
        let mut computer = Computer::new(Difficulty::Strong);
        assert_eq!(computer.choose_move(&board, (0, 0)), Ok(None));
    }

    #[test]
    fn strong_ai_completes_a_capture() {
        // Red can capture the blue point by closing the diamond at (2,3).
        let board = red_to_move(&[
            "+++++",
            "++R++",
            "+RBR+",
            "+++++",
            "+++++",
        ]);
        let mut computer = Computer::new(Difficulty::Strong);
        let choice = computer.choose_move(&board, (2, 2)).unwrap();
        assert_eq!(choice, Some((2, 3)));
    }

    #[test]
    fn strong_ai_blocks_an_opponent_capture() {
        // Blue threatens to capture red's point at (2,2) by playing (2,3);
        // with no capture of its own available, red must block there.
        let board = red_to_move(&[
            "+++++",
            "++B++",
            "+BRB+",
            "+++++",
            "+++++",
        ]);
        let mut computer = Computer::new(Difficulty::Strong);
        let choice = computer.choose_move(&board, (3, 2)).unwrap();
        assert_eq!(choice, Some((2, 3)));
    }

    #[test]
    fn defense_outweighs_equal_attack() {
        // Both sides have a one-point capture pending: red can close at
        // (2,3), blue at (7,3). Equal deltas, but defense is weighted
        // higher, so red blocks blue's diamond instead of completing its own.
        let board = red_to_move(&[
            "++++++++++",
            "++R++++B++",
            "+RBR++BRB+",
            "++++++++++",
            "++++++++++",
        ]);
        let mut computer = Computer::new(Difficulty::Strong);
        let choice = computer.choose_move(&board, (5, 2)).unwrap();
        assert_eq!(choice, Some((7, 3)));
    }

    #[test]
    fn strong_ai_is_deterministic_with_scoring_options() {
        let layout = &[
            "+++++",
            "++R++",
            "+RBR+",
            "+++++",
            "+++++",
        ];
        let mut first = Computer::with_seed(Difficulty::Strong, 7);
        let mut second = Computer::with_seed(Difficulty::Strong, 7);
        for _ in 0..3 {
            let board = red_to_move(layout);
            assert_eq!(
                first.choose_move(&board, (2, 2)).unwrap(),
                second.choose_move(&board, (2, 2)).unwrap()
            );
        }
    }

    #[test]
    fn weak_ai_is_reproducible_for_a_seed() {
        let layout = &[
            "+++++",
            "++B++",
            "+++++",
            "+++++",
            "+++++",
        ];
        let board = red_to_move(layout);
        let expected = Computer::with_seed(Difficulty::Weak, 42)
            .choose_move(&board, (2, 1))
            .unwrap()
            .unwrap();

        let board2 = red_to_move(layout);
        let got = Computer::with_seed(Difficulty::Weak, 42)
            .choose_move(&board2, (2, 1))
            .unwrap()
            .unwrap();
        assert_eq!(expected, got);
        assert!(candidate_points(&board, Player::Blue).contains(&got));
    }

    #[test]
    fn fallback_pick_is_a_near_candidate() {
        // No capture on the board for either side: the pick falls back to
        // a random candidate within the base radius of the last move.
        let board = red_to_move(&[
            "+++++",
            "++B++",
            "+++++",
            "+++++",
            "+++++",
        ]);
        let mut computer = Computer::with_seed(Difficulty::Strong, 99);
        let choice = computer.choose_move(&board, (2, 1)).unwrap().unwrap();
        let dx = (choice.0 as i32 - 2).abs();
        let dy = (choice.1 as i32 - 1).abs();
        assert!(dx.max(dy) <= 3);
        assert!(board.is_playable(choice));
    }

    #[test]
    fn radius_grows_until_a_candidate_qualifies() {
        // The only empty cells near blue are far from the last move; the
        // filter must widen until it reaches them.
        let board = red_to_move(&[
            "B+++++++++",
            "++++++++++",
            "++++++++++",
            "++++++++++",
            "++++++++++",
            "++++++++++",
            "++++++++++",
            "++++++++++",
            "++++++++++",
            "++++++++++",
        ]);
        let mut computer = Computer::with_seed(Difficulty::Strong, 1);
        let choice = computer.choose_move(&board, (9, 9)).unwrap().unwrap();
        assert!(board.is_playable(choice));
        // All candidates hug the blue corner point.
        assert!(choice.0 <= 1 && choice.1 <= 1);
    }
}
