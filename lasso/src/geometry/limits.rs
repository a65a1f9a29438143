// Centralized ingestion limits to harden against untrusted input (pointer paths, dataset columns, JSON).

// A lasso drag rarely exceeds a few thousand raw samples.
pub const MAX_PATH_POINTS: usize = 1_000_000;

// Rows per dataset column.
pub const MAX_ROWS: usize = 50_000_000;

// Numeric bounds for path coordinates
pub const COORD_MIN: f64 = -1.0e300;
pub const COORD_MAX: f64 = 1.0e300;

// Simplification tolerance
pub const DEFAULT_TOLERANCE: f64 = 1.5;
pub const TOLERANCE_MAX: f64 = 1.0e12;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && (COORD_MIN..=COORD_MAX).contains(&x) }

#[inline]
pub fn in_tolerance_bounds(t: f64) -> bool { t.is_finite() && (0.0..=TOLERANCE_MAX).contains(&t) }
