//! Interpolation for tabulated curves and 3D lookup tables
//!
//! - Linear interpolation over a uniformly spaced 1D table
//! - Trilinear interpolation over a uniformly spaced 3D lattice

/// Linear interpolation between two values
///
/// Returns a + t * (b - a) for t in [0, 1]
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Evaluate a table sampled at `i / (len - 1)` for i in `0..len`
///
/// Input is clamped to [0, 1]. Tables with fewer than two entries return
/// their only value (or 0 when empty).
pub fn interp_table(table: &[f64], x: f64) -> f64 {
    match table.len() {
        0 => 0.0,
        1 => table[0],
        n => {
            let max_idx = (n - 1) as f64;
            let pos = x.clamp(0.0, 1.0) * max_idx;
            let i0 = (pos.floor() as usize).min(n - 2);
            lerp(table[i0], table[i0 + 1], pos - i0 as f64)
        }
    }
}

/// Trilinear interpolation of 8 cube corners
///
/// Corners are ordered [000, 001, 010, 011, 100, 101, 110, 111] where the
/// index bits are (x, y, z) with z varying fastest.
#[inline]
pub fn trilinear(c: [f64; 8], tx: f64, ty: f64, tz: f64) -> f64 {
    let c00 = lerp(c[0], c[1], tz);
    let c01 = lerp(c[2], c[3], tz);
    let c10 = lerp(c[4], c[5], tz);
    let c11 = lerp(c[6], c[7], tz);

    let c0 = lerp(c00, c01, ty);
    let c1 = lerp(c10, c11, ty);

    lerp(c0, c1, tx)
}

/// Trilinear interpolation over a cubic lattice of side `grid_size`
///
/// `t` holds normalized lattice coordinates in [0, 1] per axis; `node`
/// fetches the 3-channel value at integer lattice position (i, j, k).
pub fn trilinear_lattice<F>(grid_size: usize, t: [f64; 3], node: F) -> [f64; 3]
where
    F: Fn(usize, usize, usize) -> [f64; 3],
{
    if grid_size < 2 {
        return node(0, 0, 0);
    }
    let max_idx = (grid_size - 1) as f64;

    let mut lo = [0usize; 3];
    let mut frac = [0.0f64; 3];
    for axis in 0..3 {
        let pos = t[axis].clamp(0.0, 1.0) * max_idx;
        lo[axis] = (pos.floor() as usize).min(grid_size - 2);
        frac[axis] = pos - lo[axis] as f64;
    }
    let [i, j, k] = lo;

    let corners = [
        node(i, j, k),
        node(i, j, k + 1),
        node(i, j + 1, k),
        node(i, j + 1, k + 1),
        node(i + 1, j, k),
        node(i + 1, j, k + 1),
        node(i + 1, j + 1, k),
        node(i + 1, j + 1, k + 1),
    ];

    std::array::from_fn(|c| trilinear(corners.map(|v| v[c]), frac[0], frac[1], frac[2]))
}
