use crate::geometry::limits;
use crate::model::StalePolicy;
use serde::{Deserialize, Serialize};

pub const MASTER_NAME: &str = "Master";
pub const BRUSH_NAME: &str = "Brush";

pub const DEFAULT_MASTER_COLOR: &str = "#3386E6";
pub const DEFAULT_BRUSH_COLOR: &str = "#FF0000";

pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B", "#E377C2", "#7F7F7F",
    "#BCBD22", "#17BECF",
];

/// Tunables for the selection engine. Every field has a default so partial
/// JSON documents load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LassoConfig {
    /// Maximum distance a dropped lasso sample may sit from its replacing run.
    pub tolerance: f64,
    /// Colors handed out to selections created without one, cyclically.
    pub palette: Vec<String>,
    pub master_color: String,
    pub brush_color: String,
    pub stale_policy: StalePolicy,
}

impl Default for LassoConfig {
    fn default() -> Self {
        LassoConfig {
            tolerance: limits::DEFAULT_TOLERANCE,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            master_color: DEFAULT_MASTER_COLOR.to_string(),
            brush_color: DEFAULT_BRUSH_COLOR.to_string(),
            stale_policy: StalePolicy::Invalidate,
        }
    }
}

impl LassoConfig {
    /// Parse and validate. Returns `None` on malformed or out-of-range values.
    pub fn from_json_value(v: serde_json::Value) -> Option<LassoConfig> {
        let cfg: LassoConfig = serde_json::from_value(v).ok()?;
        cfg.is_valid().then_some(cfg)
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn is_valid(&self) -> bool {
        limits::in_tolerance_bounds(self.tolerance) && !self.palette.is_empty()
    }

    /// Palette entry for the `n`th selection, falling back to the master
    /// color when the palette is empty.
    pub fn palette_color(&self, n: usize) -> &str {
        match self.palette.len() {
            0 => &self.master_color,
            len => &self.palette[n % len],
        }
    }
}
