use crate::error::{LassoError, Result};
use crate::geometry::polygon::Polygon;
use crate::geometry::simplify::simplify;
use crate::model::{Mask, Point};

fn check_columns(xs: &[f64], ys: &[f64]) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(LassoError::LengthMismatch { expected: xs.len(), got: ys.len() });
    }
    Ok(())
}

/// Rows whose `(xs[i], ys[i])` lies inside `polygon`, ascending.
///
/// Points on the polygon's first edge are left out so they belong to
/// whichever lasso drew that edge first.
pub fn indices_within(polygon: &Polygon, xs: &[f64], ys: &[f64]) -> Result<Vec<usize>> {
    check_columns(xs, ys)?;
    Ok(xs
        .iter()
        .zip(ys)
        .enumerate()
        .filter(|(_, (x, y))| polygon.contains(Point::new(**x, **y), true))
        .map(|(i, _)| i)
        .collect())
}

/// Rows strictly inside the open box `x.0 < x < x.1`, `y.0 < y < y.1`.
pub fn indices_within_rectangle(
    x_range: (f64, f64),
    y_range: (f64, f64),
    xs: &[f64],
    ys: &[f64],
) -> Result<Vec<usize>> {
    check_columns(xs, ys)?;
    Ok(xs
        .iter()
        .zip(ys)
        .enumerate()
        .filter(|(_, (x, y))| in_open_box(x_range, y_range, **x, **y))
        .map(|(i, _)| i)
        .collect())
}

#[inline]
fn in_open_box(x_range: (f64, f64), y_range: (f64, f64), x: f64, y: f64) -> bool {
    x > x_range.0 && x < x_range.1 && y > y_range.0 && y < y_range.1
}

/// Boolean mask of `len` rows with `indices` set. Out-of-range indices are ignored.
pub fn mask_from_indices(indices: &[usize], len: usize) -> Vec<bool> {
    let mut mask = vec![false; len];
    for &i in indices {
        if let Some(m) = mask.get_mut(i) {
            *m = true;
        }
    }
    mask
}

/// Row indices set in `mask`, ascending.
pub fn indices_from_mask(mask: &[bool]) -> Vec<usize> {
    mask.iter().enumerate().filter(|(_, m)| **m).map(|(i, _)| i).collect()
}

pub fn mask_within(polygon: &Polygon, xs: &[f64], ys: &[f64]) -> Result<Mask> {
    check_columns(xs, ys)?;
    Ok(xs
        .iter()
        .zip(ys)
        .map(|(x, y)| polygon.contains(Point::new(*x, *y), true))
        .collect())
}

pub fn mask_within_rectangle(
    x_range: (f64, f64),
    y_range: (f64, f64),
    xs: &[f64],
    ys: &[f64],
) -> Result<Mask> {
    check_columns(xs, ys)?;
    Ok(xs.iter().zip(ys).map(|(x, y)| in_open_box(x_range, y_range, *x, *y)).collect())
}

/// Full lasso pipeline over a raw drag path: simplify, close, index.
pub fn select_lasso(path: &[Point], tolerance: f64, xs: &[f64], ys: &[f64]) -> Result<Vec<usize>> {
    let polygon = Polygon::new(&simplify(path, tolerance))?;
    indices_within(&polygon, xs, ys)
}
