use serde::{Deserialize, Serialize};
use std::ops::Sub;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned bounds of a point set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Bounds {
    pub fn of(points: &[Point]) -> Option<Bounds> {
        let first = points.first()?;
        let mut b = Bounds { xmin: first.x, xmax: first.x, ymin: first.y, ymax: first.y };
        for p in &points[1..] {
            b.xmin = b.xmin.min(p.x);
            b.xmax = b.xmax.max(p.x);
            b.ymin = b.ymin.min(p.y);
            b.ymax = b.ymax.max(p.y);
        }
        Some(b)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        // NaN coordinates fail every comparison and land outside.
        p.x >= self.xmin && p.x <= self.xmax && p.y >= self.ymin && p.y <= self.ymax
    }
}

/// One boolean per data row.
pub type Mask = Arc<[bool]>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub name: String,
    pub mask: Mask,
    pub color: String,
    pub visible: bool,
    pub emphasize: bool,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// Number of rows marked in the mask.
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|m| **m).count()
    }
}

/// Where a new selection takes its mask from.
#[derive(Clone, Debug, PartialEq)]
pub enum MaskSource {
    Mask(Vec<bool>),
    /// Copy of the current Brush mask at creation time.
    Brush,
}

impl From<Vec<bool>> for MaskSource {
    fn from(mask: Vec<bool>) -> Self {
        MaskSource::Mask(mask)
    }
}

#[derive(Clone, Debug)]
pub struct NewSelection {
    pub name: String,
    pub mask: MaskSource,
    /// Empty picks the next palette color.
    pub color: String,
    pub visible: bool,
    pub meta: Option<serde_json::Value>,
}

impl NewSelection {
    pub fn new(name: impl Into<String>, mask: impl Into<MaskSource>) -> Self {
        NewSelection {
            name: name.into(),
            mask: mask.into(),
            color: String::new(),
            visible: true,
            meta: None,
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Area a brush gesture covers, in data coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BrushArea {
    /// Open intervals `x.0 < x < x.1`, `y.0 < y < y.1`.
    Rectangle { x: (f64, f64), y: (f64, f64) },
    /// Already simplified lasso path.
    Freehand { path: Vec<Point> },
}

/// What happens to named selections when a dataset of a different size is loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Leave masks untouched; callers reconcile via `stale_selections`.
    Keep,
    /// Truncate or pad with `false` to the new row count.
    Resize,
    /// Drop every selection whose mask no longer fits.
    #[default]
    Invalidate,
}
