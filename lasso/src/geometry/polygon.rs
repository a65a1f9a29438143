//! Point-in-polygon testing for finalized lasso polygons.
//!
//! Uses a vertical ray cast upward (increasing y) from the query point and
//! counts crossings with the even-odd rule. Crossings at a segment's
//! lower-x endpoint are skipped so a ray through a shared vertex is not
//! counted twice. Points exactly on an edge count as inside, except on the
//! first edge when the caller asks to omit it: two lassos drawn back to back
//! share that edge and each boundary row must belong to only one of them.
//!
//! Axis-aligned rectangles are detected at build time and answered from the
//! bounding box alone.

use crate::error::{LassoError, Result};
use crate::geometry::limits;
use crate::model::{Bounds, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FirstEdge {
    Vertical,
    Horizontal,
}

/// An immutable closed polygon with precomputed bounds.
#[derive(Clone, Debug)]
pub struct Polygon {
    // Closed ring: the first point is repeated at the end.
    ring: Vec<Point>,
    bounds: Bounds,
    rect_first_edge: Option<FirstEdge>,
    degenerate: bool,
}

impl Polygon {
    /// Build from a simplified lasso path. The path is closed implicitly.
    pub fn new(points: &[Point]) -> Result<Polygon> {
        if points.is_empty() {
            return Err(LassoError::InvalidPolygon("no points".into()));
        }
        if points.len() > limits::MAX_PATH_POINTS {
            return Err(LassoError::InvalidPolygon(format!(
                "{} points exceeds the limit of {}",
                points.len(),
                limits::MAX_PATH_POINTS
            )));
        }
        if let Some(i) = points
            .iter()
            .position(|p| !limits::in_coord_bounds(p.x) || !limits::in_coord_bounds(p.y))
        {
            return Err(LassoError::InvalidPolygon(format!("point {} is not finite", i)));
        }

        let mut ring = Vec::with_capacity(points.len() + 1);
        ring.extend_from_slice(points);
        ring.push(points[0]);

        let bounds = match Bounds::of(&ring) {
            Some(b) => b,
            None => return Err(LassoError::InvalidPolygon("no points".into())),
        };
        let rect_first_edge = detect_rectangle(points);
        let degenerate = ring.windows(2).all(|w| w[0] == w[1]);

        Ok(Polygon { ring, bounds, rect_first_edge, degenerate })
    }

    /// Axis-aligned rectangle through the four corners, first edge vertical.
    pub fn rectangle(x: (f64, f64), y: (f64, f64)) -> Result<Polygon> {
        Polygon::new(&[
            Point::new(x.0, y.0),
            Point::new(x.0, y.1),
            Point::new(x.1, y.1),
            Point::new(x.1, y.0),
        ])
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_rectangle(&self) -> bool {
        self.rect_first_edge.is_some()
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Polygon vertices without the closing point.
    pub fn points(&self) -> &[Point] {
        &self.ring[..self.ring.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.ring.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, p: Point, omit_first_edge: bool) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }
        match self.rect_first_edge {
            Some(edge) => !(omit_first_edge && self.on_rect_first_edge(edge, p)),
            None => self.cast_ray(p, omit_first_edge),
        }
    }

    /// Ray-casting test, even for rectangles.
    pub fn contains_by_ray(&self, p: Point, omit_first_edge: bool) -> bool {
        self.bounds.contains(p) && self.cast_ray(p, omit_first_edge)
    }

    #[inline]
    fn on_rect_first_edge(&self, edge: FirstEdge, p: Point) -> bool {
        match edge {
            FirstEdge::Vertical => p.x == self.ring[0].x,
            FirstEdge::Horizontal => p.y == self.ring[0].y,
        }
    }

    fn cast_ray(&self, p: Point, omit_first_edge: bool) -> bool {
        let (x, y) = (p.x, p.y);
        let mut crossings = 0u32;
        let mut x1 = self.ring[0].x;
        let mut y1 = self.ring[0].y;

        for (i, next) in self.ring.iter().enumerate().skip(1) {
            let (x0, y0) = (x1, y1);
            x1 = next.x;
            y1 = next.y;
            let xmin = x0.min(x1);

            if x < xmin || x > x0.max(x1) || y > y0.max(y1) {
                // Beside or below the segment's box: no crossing.
                continue;
            } else if y < y0.min(y1) {
                // Entirely above the point.
                if x != xmin {
                    crossings += 1;
                }
            } else {
                let ycross = if x1 == x0 { y } else { y0 + (x - x0) * (y1 - y0) / (x1 - x0) };
                if y == ycross {
                    return !(i == 1 && omit_first_edge);
                }
                if y <= ycross && x != xmin {
                    crossings += 1;
                }
            }
        }
        crossings % 2 == 1
    }
}

// Four distinct corners forming vertical/horizontal/vertical/horizontal
// edges, or the horizontal-first rotation of that.
fn detect_rectangle(pts: &[Point]) -> Option<FirstEdge> {
    if pts.len() != 4 {
        return None;
    }
    for i in 0..4 {
        for j in (i + 1)..4 {
            if pts[i] == pts[j] {
                return None;
            }
        }
    }
    let [p0, p1, p2, p3] = [pts[0], pts[1], pts[2], pts[3]];
    if p0.x == p1.x {
        if p2.x == p3.x && p0.y == p3.y && p1.y == p2.y {
            return Some(FirstEdge::Vertical);
        }
    } else if p0.y == p1.y && p2.y == p3.y && p0.x == p3.x && p1.x == p2.x {
        return Some(FirstEdge::Horizontal);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(v: &[(f64, f64)]) -> Polygon {
        let pts: Vec<Point> = v.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Polygon::new(&pts).unwrap()
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn empty_is_invalid() {
        assert!(matches!(Polygon::new(&[]), Err(LassoError::InvalidPolygon(_))));
    }

    #[test]
    fn non_finite_is_invalid() {
        let r = Polygon::new(&[p(0.0, 0.0), p(f64::NAN, 1.0), p(1.0, 0.0)]);
        assert!(matches!(r, Err(LassoError::InvalidPolygon(_))));
    }

    #[test]
    fn square_scenario() {
        let sq = poly(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        assert!(sq.is_rectangle());
        assert!(sq.contains(p(5.0, 5.0), true));
        assert!(!sq.contains(p(15.0, 5.0), true));
        assert!(!sq.contains(p(0.0, 5.0), true));
        assert!(sq.contains(p(0.0, 5.0), false));
        // Same answers from the general path.
        assert!(sq.contains_by_ray(p(5.0, 5.0), true));
        assert!(!sq.contains_by_ray(p(15.0, 5.0), true));
        assert!(!sq.contains_by_ray(p(0.0, 5.0), true));
    }

    #[test]
    fn rectangle_detection() {
        assert!(poly(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]).is_rectangle());
        // Not axis aligned.
        assert!(!poly(&[(0.0, 0.0), (1.0, 1.0), (0.0, 2.0), (-1.0, 1.0)]).is_rectangle());
        // Repeated corner.
        assert!(!poly(&[(0.0, 0.0), (0.0, 0.0), (4.0, 0.0), (4.0, 0.0)]).is_rectangle());
        // Explicitly closed rectangle has five points.
        assert!(!poly(&[(0.0, 0.0), (0.0, 2.0), (4.0, 2.0), (4.0, 0.0), (0.0, 0.0)]).is_rectangle());
        assert!(Polygon::rectangle((1.0, 4.0), (1.0, 4.0)).unwrap().is_rectangle());
    }

    #[test]
    fn triangle_with_edges() {
        let tri = poly(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]);
        assert!(!tri.is_rectangle());
        assert!(tri.contains(p(5.0, 3.0), true));
        assert!(!tri.contains(p(1.0, 9.0), true));
        // On the first edge (y = 0).
        assert!(!tri.contains(p(5.0, 0.0), true));
        assert!(tri.contains(p(5.0, 0.0), false));
        // On a later edge.
        assert!(tri.contains(p(7.5, 5.0), true));
    }

    #[test]
    fn concave_polygon() {
        // U shape opening upward.
        let u = poly(&[
            (0.0, 0.0),
            (9.0, 0.0),
            (9.0, 9.0),
            (6.0, 9.0),
            (6.0, 3.0),
            (3.0, 3.0),
            (3.0, 9.0),
            (0.0, 9.0),
        ]);
        assert!(u.contains(p(1.5, 6.0), true));
        assert!(u.contains(p(7.5, 6.0), true));
        assert!(!u.contains(p(4.5, 6.0), true));
        assert!(u.contains(p(4.5, 1.5), true));
        // Ray passes exactly through the vertices at x = 3 and x = 6.
        assert!(u.contains(p(3.0, 1.0), true));
        assert!(u.contains(p(6.0, 1.0), true));
    }

    #[test]
    fn degenerate_point_polygon() {
        let d = poly(&[(2.0, 2.0), (2.0, 2.0), (2.0, 2.0)]);
        assert!(d.is_degenerate());
        assert!(d.contains(p(2.0, 2.0), false));
        assert!(!d.contains(p(2.0, 2.1), false));
        assert!(!d.contains(p(3.0, 2.0), false));
        let single = poly(&[(1.0, 1.0)]);
        assert!(single.is_degenerate());
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn nan_queries_are_outside() {
        let sq = poly(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        assert!(!sq.contains(p(f64::NAN, 5.0), false));
        let tri = poly(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]);
        assert!(!tri.contains(p(5.0, f64::NAN), false));
    }
}
