use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::board::{Board, Cell};
use crate::player::Player;
use crate::tracer;

// Occupancy values used by the enclosure check.
const WALL: i8 = 1;
const UNKNOWN: i8 = -1;
const OUTSIDE: i8 = 0;

const ORTHO: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
const DIAG: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Run the enclosure check for one player after a placement.
///
/// Builds an occupancy grid where only `for_player`'s active points are
/// walls, floods the border-connected area, and resolves everything the
/// flood could not reach: opponent points are captured, the player's own
/// captured points are liberated, empty cells swept into a captured
/// component die, and each captured component gets a boundary polygon.
pub(crate) fn resolve_regions(board: &mut Board, for_player: Player) {
    let cols = board.cols() as usize;
    let rows = board.rows() as usize;
    if cols == 0 || rows == 0 {
        return;
    }
    let size = cols * rows;

    let mut table = vec![UNKNOWN; size];
    for (i, &cell) in board.cells().iter().enumerate() {
        if cell == Cell::Active(for_player) {
            table[i] = WALL;
        }
    }

    mark_outside(&mut table, cols, rows);

    // Cells still unknown are enclosed by the player's wall.
    let opponent = for_player.opp();
    let mut seeds = Vec::new();
    let mut freed = Vec::new();
    for i in 0..size {
        if table[i] != UNKNOWN {
            continue;
        }
        let cell = board.cells()[i];
        match cell {
            Cell::Active(p) if p == opponent => {
                board.set_cell_idx(i, Cell::Captured(opponent));
                board.score_mut().add(for_player, 1);
                seeds.push(i);
            }
            Cell::Captured(p) if p == for_player => freed.push(i),
            _ => {}
        }
    }

    // Label each captured component (4-connected, grown from the fill
    // seeds). Enclosed empty cells swept into a component die; enclosed
    // empties with no captured neighbor component stay playable.
    let mut labels = vec![0u32; size];
    let mut next_label = 0u32;
    for &seed in &seeds {
        if labels[seed] != 0 {
            continue;
        }
        next_label += 1;
        let mut stack = vec![seed];
        while let Some(i) = stack.pop() {
            if labels[i] != 0 {
                continue;
            }
            labels[i] = next_label;
            if board.cells()[i] == Cell::Empty {
                board.set_cell_idx(i, Cell::Dead);
            }
            let x = (i % cols) as i32;
            let y = (i / cols) as i32;
            for (dx, dy) in ORTHO {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || nx >= cols as i32 || ny < 0 || ny >= rows as i32 {
                    continue;
                }
                let ni = ny as usize * cols + nx as usize;
                if table[ni] == UNKNOWN && labels[ni] == 0 {
                    stack.push(ni);
                }
            }
        }
        let polygon = tracer::trace_region(&table, &labels, next_label, cols, rows, for_player);
        board.push_polygon(polygon);
    }

    // Liberation: the player's own captured points enclosed by their own
    // wall go back to play, unless they were swept into a component newly
    // captured by the same move.
    for &i in &freed {
        if labels[i] == 0 {
            board.set_cell_idx(i, Cell::Active(for_player));
            board.score_mut().sub(opponent, 1);
        }
    }
}

/// Flood the border-connected area, marking every reached cell `OUTSIDE`.
fn mark_outside(table: &mut [i8], cols: usize, rows: usize) {
    let mut queue = VecDeque::new();
    for x in 0..cols {
        if table[x] == UNKNOWN {
            queue.push_back((x, 0));
        }
        if table[(rows - 1) * cols + x] == UNKNOWN {
            queue.push_back((x, rows - 1));
        }
    }
    for y in 0..rows {
        if table[y * cols] == UNKNOWN {
            queue.push_back((0, y));
        }
        if table[y * cols + cols - 1] == UNKNOWN {
            queue.push_back((cols - 1, y));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        if table[y * cols + x] != UNKNOWN {
            continue;
        }
        table[y * cols + x] = OUTSIDE;
        for n in flood_neighbors(table, cols, rows, x, y) {
            queue.push_back(n);
        }
    }
}

/// Cells the flood may spread to from (x, y): unknown orthogonal
/// neighbors, plus unknown diagonal neighbors whose two flanking
/// orthogonals are not both walls; a sealed diagonal cannot be jumped.
fn flood_neighbors(
    table: &[i8],
    cols: usize,
    rows: usize,
    x: usize,
    y: usize,
) -> ArrayVec<(usize, usize), 8> {
    let mut result = ArrayVec::new();
    let (x, y) = (x as i32, y as i32);
    for (dx, dy) in ORTHO {
        let nx = x + dx;
        let ny = y + dy;
        if nx < 0 || nx >= cols as i32 || ny < 0 || ny >= rows as i32 {
            continue;
        }
        if table[ny as usize * cols + nx as usize] != UNKNOWN {
            continue;
        }
        result.push((nx as usize, ny as usize));
    }
    for (dx, dy) in DIAG {
        let nx = x + dx;
        let ny = y + dy;
        if nx < 0 || nx >= cols as i32 || ny < 0 || ny >= rows as i32 {
            continue;
        }
        if table[ny as usize * cols + nx as usize] != UNKNOWN {
            continue;
        }
        let first = table[y as usize * cols + nx as usize] == WALL;
        let second = table[ny as usize * cols + x as usize] == WALL;
        if first && second {
            continue;
        }
        result.push((nx as usize, ny as usize));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

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

    // -- Captures --

    #[test]
    fn diamond_captures_single_point() {
        // Blue closes a diamond around a red point by playing (2,3).
        let mut board = board_from_layout(&[
            "+++++",
            "++B++",
            "+BRB+",
            "+++++",
            "+++++",
        ]);
        board.try_place(Player::Blue, (2, 3)).unwrap();

        assert_eq!(board.cell_at((2, 2)), Some(Cell::Captured(Player::Red)));
        assert_eq!(board.score().get(Player::Blue), 1);
        assert_eq!(board.score().get(Player::Red), 0);
        assert_eq!(board.polygons().len(), 1);
    }

    #[test]
    fn diamond_polygon_outline() {
        let mut board = board_from_layout(&[
            "+++++",
            "++B++",
            "+BRB+",
            "+++++",
            "+++++",
        ]);
        board.try_place(Player::Blue, (2, 3)).unwrap();

        let polygon = &board.polygons()[0];
        assert_eq!(polygon.owner, Player::Blue);
        assert_eq!(polygon.points, vec![(1, 2), (2, 1), (3, 2), (2, 3)]);
    }

    #[test]
    fn border_points_cannot_be_enclosed() {
        // The red point sits on the edge; blue "surrounds" it from inside.
        let mut board = board_from_layout(&[
            "+R+++",
            "B+B++",
            "+++++",
        ]);
        board.try_place(Player::Blue, (1, 1)).unwrap();

        assert_eq!(board.cell_at((1, 0)), Some(Cell::Active(Player::Red)));
        assert_eq!(board.score().get(Player::Blue), 0);
        assert!(board.polygons().is_empty());
    }

    #[test]
    fn diagonal_wall_seals_region() {
        // Blue's wall closes the pocket corners only diagonally; the
        // outside flood must not jump through the sealed gaps.
        let mut board = board_from_layout(&[
            "+BB++",
            "BRR++",
            "+BB++",
        ]);
        // Close the right end of the pocket.
        board.try_place(Player::Blue, (3, 1)).unwrap();

        assert_eq!(board.cell_at((1, 1)), Some(Cell::Captured(Player::Red)));
        assert_eq!(board.cell_at((2, 1)), Some(Cell::Captured(Player::Red)));
        assert_eq!(board.score().get(Player::Blue), 2);
        assert_eq!(board.polygons().len(), 1);
    }

    #[test]
    fn immediate_capture_of_suicidal_placement() {
        // The second per-move pass resolves a point placed into a ready trap.
        let mut board = board_from_layout(&[
            "+R+",
            "R+R",
            "+R+",
        ]);
        board.try_place(Player::Blue, (1, 1)).unwrap();

        assert_eq!(board.cell_at((1, 1)), Some(Cell::Captured(Player::Blue)));
        assert_eq!(board.score().get(Player::Red), 1);
        assert_eq!(board.polygons().len(), 1);
        assert_eq!(board.polygons()[0].owner, Player::Red);
    }

    #[test]
    fn one_move_closes_two_regions() {
        // (2,2) completes two diamonds at once; each region scores and
        // gets its own polygon.
        let mut board = board_from_layout(&[
            "++B++",
            "+BRB+",
            "+++++",
            "+BRB+",
            "++B++",
        ]);
        board.try_place(Player::Blue, (2, 2)).unwrap();

        assert_eq!(board.cell_at((2, 1)), Some(Cell::Captured(Player::Red)));
        assert_eq!(board.cell_at((2, 3)), Some(Cell::Captured(Player::Red)));
        assert_eq!(board.score().get(Player::Blue), 2);
        assert_eq!(board.polygons().len(), 2);
    }

    #[test]
    fn capture_symmetry_no_unreached_opponent_point_stays_active() {
        let mut board = board_from_layout(&[
            "++B+++",
            "+BRB++",
            "+BRB++",
            "++++++",
        ]);
        board.try_place(Player::Blue, (2, 3)).unwrap();

        assert_eq!(board.cell_at((2, 1)), Some(Cell::Captured(Player::Red)));
        assert_eq!(board.cell_at((2, 2)), Some(Cell::Captured(Player::Red)));
        assert_eq!(board.score().get(Player::Blue), 2);
    }

    // -- Dead cells --

    #[test]
    fn enclosed_empty_cell_in_captured_component_dies() {
        // Region holds a red point and an empty cell; both are swept.
        let mut board = board_from_layout(&[
            "++B++",
            "+BRB+",
            "+B+B+",
            "+++++",
            "+++++",
        ]);
        board.try_place(Player::Blue, (2, 3)).unwrap();

        assert_eq!(board.cell_at((2, 1)), Some(Cell::Captured(Player::Red)));
        assert_eq!(board.cell_at((2, 2)), Some(Cell::Dead));
        assert_eq!(board.score().get(Player::Blue), 1);
        assert_eq!(board.polygons().len(), 1);
        assert_eq!(board.polygons()[0].points.len(), 6);
    }

    #[test]
    fn enclosed_empty_region_without_captures_stays_playable() {
        // A wall around nothing scores nothing, kills nothing.
        let mut board = board_from_layout(&[
            "++B++",
            "+B+B+",
            "+++++",
            "+++++",
            "+++++",
        ]);
        board.try_place(Player::Blue, (2, 2)).unwrap();

        assert_eq!(board.cell_at((2, 1)), Some(Cell::Empty));
        assert!(board.is_playable((2, 1)));
        assert_eq!(board.score().get(Player::Blue), 0);
        assert!(board.polygons().is_empty());
    }

    #[test]
    fn dead_cells_never_come_back() {
        let mut board = board_from_layout(&[
            "++B++",
            "+BRB+",
            "+B+B+",
            "+++++",
            "+++++",
        ]);
        board.try_place(Player::Blue, (2, 3)).unwrap();
        assert_eq!(board.cell_at((2, 2)), Some(Cell::Dead));

        assert_eq!(
            board.try_place(Player::Red, (2, 2)),
            Err(GameError::InvalidMove)
        );

        // Unrelated play elsewhere leaves the dead cell alone.
        board.try_place(Player::Red, (0, 4)).unwrap();
        board.try_place(Player::Blue, (4, 4)).unwrap();
        assert_eq!(board.cell_at((2, 2)), Some(Cell::Dead));
    }

    // -- Liberation --

    #[test]
    fn own_captured_point_is_freed_when_re_enclosed() {
        // The captured red point at (2,2) is enclosed by red's own wall.
        let mut board = board_from_layout(&[
            "+++++",
            "++R++",
            "+RrR+",
            "+++++",
            "+++++",
        ]);
        assert_eq!(board.score().get(Player::Blue), 1);

        board.try_place(Player::Red, (2, 3)).unwrap();

        assert_eq!(board.cell_at((2, 2)), Some(Cell::Active(Player::Red)));
        assert_eq!(board.score().get(Player::Blue), 0);
        assert_eq!(board.score().get(Player::Red), 0);
        assert!(board.polygons().is_empty());
    }

    #[test]
    fn counter_enclosure_keeps_swept_captive() {
        // Red rings blue's diamond from outside. The blue wall is captured,
        // but red's old captive at (2,2) joins the newly captured component
        // and stays captured; the passes are independent per player.
        let mut board = board_from_layout(&[
            "++R++",
            "+RBR+",
            "RBrBR",
            "+RBR+",
            "+++++",
        ]);
        assert_eq!(board.score().get(Player::Blue), 1);

        board.try_place(Player::Red, (2, 4)).unwrap();

        assert_eq!(board.cell_at((2, 2)), Some(Cell::Captured(Player::Red)));
        assert_eq!(board.cell_at((2, 1)), Some(Cell::Captured(Player::Blue)));
        assert_eq!(board.cell_at((1, 2)), Some(Cell::Captured(Player::Blue)));
        assert_eq!(board.cell_at((3, 2)), Some(Cell::Captured(Player::Blue)));
        assert_eq!(board.cell_at((2, 3)), Some(Cell::Captured(Player::Blue)));
        assert_eq!(board.score().get(Player::Red), 4);
        assert_eq!(board.score().get(Player::Blue), 1);
    }

    // -- Polygon accumulation --

    #[test]
    fn polygons_accumulate_and_are_never_pruned() {
        let mut board = board_from_layout(&[
            "++B++++",
            "+BRB+++",
            "+++++++",
            "+++++++",
            "+++++++",
        ]);
        board.try_place(Player::Blue, (2, 2)).unwrap();
        assert_eq!(board.polygons().len(), 1);
        let first = board.polygons()[0].clone();

        // A later capture appends a second polygon; the first is kept as-is.
        board.try_place(Player::Red, (4, 3)).unwrap();
        board.try_place(Player::Blue, (3, 3)).unwrap();
        board.try_place(Player::Blue, (5, 3)).unwrap();
        board.try_place(Player::Blue, (4, 2)).unwrap();
        board.try_place(Player::Blue, (4, 4)).unwrap();
        assert_eq!(board.polygons().len(), 2);
        assert_eq!(board.polygons()[0], first);
        assert_eq!(board.score().get(Player::Blue), 2);
    }
}
