use serde::{Deserialize, Serialize};

use crate::Point;
use crate::player::Player;

const WALL: i8 = 1;

const ORTHO: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
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

/// The ordered outline of one enclosed, captured area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPolygon {
    pub points: Vec<Point>,
    pub owner: Player,
}

/// Build the outline polygon for one labeled component.
///
/// `table` is the occupancy grid of the enclosure check (walls are `1`)
/// and `labels` the component labeling produced from its fill seeds.
pub(crate) fn trace_region(
    table: &[i8],
    labels: &[u32],
    label: u32,
    cols: usize,
    rows: usize,
    owner: Player,
) -> RegionPolygon {
    let outline = collect_outline(table, labels, label, cols, rows);
    RegionPolygon {
        points: chain_points(outline),
        owner,
    }
}

/// Wall cells bordering the component, minus the interior ones.
fn collect_outline(
    table: &[i8],
    labels: &[u32],
    label: u32,
    cols: usize,
    rows: usize,
) -> Vec<Point> {
    let mut seen = vec![false; cols * rows];
    let mut outline = Vec::new();

    for i in 0..cols * rows {
        if labels[i] != label {
            continue;
        }
        let x = (i % cols) as i32;
        let y = (i / cols) as i32;
        for (dx, dy) in MOVES8 {
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || nx >= cols as i32 || ny < 0 || ny >= rows as i32 {
                continue;
            }
            let ni = ny as usize * cols + nx as usize;
            if table[ni] != WALL || seen[ni] {
                continue;
            }
            seen[ni] = true;
            if !is_interior_wall(table, labels, label, cols, rows, nx, ny) {
                outline.push((nx as u8, ny as u8));
            }
        }
    }

    outline
}

/// A wall cell is left out of the outline when wall and component cover it
/// on every side, or on three sides with the one open side not touching
/// the component at all. Straight wall runs reduce to their corners.
fn is_interior_wall(
    table: &[i8],
    labels: &[u32],
    label: u32,
    cols: usize,
    rows: usize,
    x: i32,
    y: i32,
) -> bool {
    let mut open = None;
    let mut open_count = 0;
    for (dx, dy) in ORTHO {
        let nx = x + dx;
        let ny = y + dy;
        if nx < 0 || nx >= cols as i32 || ny < 0 || ny >= rows as i32 {
            continue;
        }
        let ni = ny as usize * cols + nx as usize;
        if table[ni] == WALL || labels[ni] == label {
            continue;
        }
        open_count += 1;
        open = Some((nx, ny));
    }

    match (open_count, open) {
        (0, _) => true,
        (1, Some((ox, oy))) => !touches_component(labels, label, cols, rows, ox, oy),
        _ => false,
    }
}

fn touches_component(labels: &[u32], label: u32, cols: usize, rows: usize, x: i32, y: i32) -> bool {
    ORTHO.iter().any(|(dx, dy)| {
        let nx = x + dx;
        let ny = y + dy;
        nx >= 0
            && nx < cols as i32
            && ny >= 0
            && ny < rows as i32
            && labels[ny as usize * cols + nx as usize] == label
    })
}

/// Order outline points by greedy nearest-neighbor chaining. Deterministic,
/// but not a correct geometric sort: a sufficiently concave region can
/// produce a self-intersecting loop, and that output is kept as-is.
fn chain_points(mut points: Vec<Point>) -> Vec<Point> {
    if points.is_empty() {
        return points;
    }

    let mut ordered = Vec::with_capacity(points.len());
    ordered.push(points.remove(0));
    while !points.is_empty() {
        let last = ordered[ordered.len() - 1];
        let mut best = 0;
        let mut best_d = dist2(last, points[0]);
        for (i, &p) in points.iter().enumerate().skip(1) {
            let d = dist2(last, p);
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        ordered.push(points.remove(best));
    }
    ordered
}

fn dist2(a: Point, b: Point) -> i32 {
    let dx = a.0 as i32 - b.0 as i32;
    let dy = a.1 as i32 - b.1 as i32;
    dx * dx + dy * dy
}
