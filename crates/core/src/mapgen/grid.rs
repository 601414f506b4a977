//! Coordinate-space primitives shared by every generator.

use crate::types::Pos;

use super::rng::GenRng;

pub fn in_bounds(width: usize, height: usize, pos: Pos) -> bool {
    pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < width && (pos.y as usize) < height
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// The four axis-adjacent cells, in `+x, -x, +y, -y` order.
pub fn neighbors(pos: Pos) -> [Pos; 4] {
    [
        Pos { y: pos.y, x: pos.x + 1 },
        Pos { y: pos.y, x: pos.x - 1 },
        Pos { y: pos.y + 1, x: pos.x },
        Pos { y: pos.y - 1, x: pos.x },
    ]
}

/// Cells whose distance from `center` is at most `distance`, or exactly `distance`
/// when `exact` is set. Results are unclipped.
pub fn cells_in_range(center: Pos, distance: u32, exact: bool) -> Vec<Pos> {
    let reach = distance as i32;
    let mut cells = Vec::new();
    for dx in -reach..=reach {
        for dy in -reach..=reach {
            let step = dx.unsigned_abs() + dy.unsigned_abs();
            if step == distance || (!exact && step < distance) {
                cells.push(center.offset(dx, dy));
            }
        }
    }
    cells
}

/// Uniform integer between `ceil(extent * min_pct)` and `floor(extent * max_pct)`,
/// with `max_pct` held just under 1 so the result stays on the map.
pub fn random_axis_value(rng: &mut GenRng, extent: usize, min_pct: f64, max_pct: f64) -> i32 {
    let low = (extent as f64 * min_pct).ceil() as i32;
    let high = (extent as f64 * max_pct.min(0.99999)).floor() as i32;
    rng.range_inclusive(low, high)
}
