//! Lasso path simplification.
//!
//! Reduces a raw pointer-drag path to the fewest points that keep every
//! dropped sample within `tolerance` of the straight run replacing it.
//! Runs are grown greedily from the last kept point, so the result for a
//! prefix of the path never changes once a later point has been kept; the
//! streaming [`PathSimplifier`] relies on that to stay amortised.
//!
//! A single greedy pass is not a fixed point: dropping a sample can let a
//! longer run through on the next pass. [`simplify`] repeats the pass until
//! nothing more drops, so its output simplifies to itself.

use crate::geometry::limits::DEFAULT_TOLERANCE;
use crate::model::Point;

/// Whether the run `pts[start]..=pts[end]` must be split.
///
/// A run is bent when any interior point projects before `start`, past
/// `end`, or sits further than `tolerance` from the line through them.
pub fn is_run_bent(pts: &[Point], start: usize, end: usize, tolerance: f64) -> bool {
    let origin = pts[start];
    let segment = pts[end] - origin;
    let segment_len_sq = segment.dot(segment);

    if segment_len_sq == 0.0 {
        // Closed loop back onto the start point: distance to the line is distance to the point.
        let tol_sq = tolerance * tolerance;
        return pts[start + 1..end].iter().any(|p| {
            let part = *p - origin;
            part.dot(part) > tol_sq
        });
    }

    let segment_len = segment_len_sq.sqrt();
    let unit_perp = Point::new(-segment.y / segment_len, segment.x / segment_len);

    pts[start + 1..end].iter().any(|p| {
        let part = *p - origin;
        let parallel = part.dot(segment);
        parallel < 0.0 || parallel > segment_len_sq || part.dot(unit_perp).abs() > tolerance
    })
}

/// Simplify a whole path at once.
pub fn simplify(path: &[Point], tolerance: f64) -> Vec<Point> {
    refine(single_pass(path, tolerance), tolerance)
}

fn single_pass(path: &[Point], tolerance: f64) -> Vec<Point> {
    if path.len() <= 2 {
        return path.to_vec();
    }
    let mut s = PathSimplifier::with_capacity(tolerance, path.len());
    for p in path {
        s.add_point(*p);
    }
    s.into_simplified()
}

// Each pass keeps a subsequence, so an unchanged length means an unchanged path.
fn refine(mut pts: Vec<Point>, tolerance: f64) -> Vec<Point> {
    loop {
        let next = single_pass(&pts, tolerance);
        if next.len() == pts.len() {
            return pts;
        }
        pts = next;
    }
}

/// Streaming simplifier for a lasso that is still being drawn.
#[derive(Clone, Debug)]
pub struct PathSimplifier {
    tolerance: f64,
    raw: Vec<Point>,
    simplified: Vec<Point>,
    // Raw index of the last kept point that is not the trailing one.
    anchor: usize,
}

impl Default for PathSimplifier {
    fn default() -> Self {
        PathSimplifier::new(DEFAULT_TOLERANCE)
    }
}

impl PathSimplifier {
    pub fn new(tolerance: f64) -> Self {
        PathSimplifier::with_capacity(tolerance, 0)
    }

    pub fn with_capacity(tolerance: f64, capacity: usize) -> Self {
        PathSimplifier {
            tolerance,
            raw: Vec::with_capacity(capacity),
            simplified: Vec::new(),
            anchor: 0,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Append one raw point and return the current simplified path.
    ///
    /// Only the run from the anchor to the new point is re-examined; the
    /// previous trailing point is either promoted to a kept corner or dropped.
    pub fn add_point(&mut self, p: Point) -> &[Point] {
        self.raw.push(p);
        let n = self.raw.len();
        if n == 1 {
            self.simplified.push(p);
            self.anchor = 0;
            return &self.simplified;
        }
        if n > 2 {
            let prev = n - 2;
            self.simplified.pop();
            if is_run_bent(&self.raw, self.anchor, n - 1, self.tolerance) {
                self.simplified.push(self.raw[prev]);
                self.anchor = prev;
            }
        }
        self.simplified.push(p);
        &self.simplified
    }

    pub fn raw(&self) -> &[Point] {
        &self.raw
    }

    pub fn simplified(&self) -> &[Point] {
        &self.simplified
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Forget all points, keeping the tolerance.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.simplified.clear();
        self.anchor = 0;
    }

    pub fn into_simplified(self) -> Vec<Point> {
        self.simplified
    }

    /// The finished lasso: the live path refined until stable. Equal to
    /// [`simplify`] over the raw samples.
    pub fn finish(&self) -> Vec<Point> {
        refine(self.simplified.clone(), self.tolerance)
    }
}
