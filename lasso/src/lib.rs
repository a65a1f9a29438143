//! Lasso selection for 2D scatter data: freehand path simplification,
//! point-in-polygon testing, row indexing and an immutable store of named
//! row masks.

pub mod model;
pub mod error;
pub mod config;
pub mod geometry {
    pub mod limits;
    pub mod polygon;
    pub mod simplify;
}
pub mod algorithms {
    pub mod indexer;
}
pub mod dataset;
pub mod features;
pub mod store;
pub mod state;
mod json;

pub use algorithms::indexer::{
    indices_from_mask, indices_within, indices_within_rectangle, mask_from_indices, mask_within,
    mask_within_rectangle, select_lasso,
};
pub use config::LassoConfig;
pub use dataset::{Dataset, FeatureCatalog, FeatureEntry};
pub use error::{LassoError, Result};
pub use features::{FeatureLifetime, FeatureRecord};
pub use geometry::polygon::Polygon;
pub use geometry::simplify::{simplify, PathSimplifier};
pub use json::SNAPSHOT_VERSION;
pub use model::{BrushArea, Bounds, Mask, MaskSource, NewSelection, Point, Selection, StalePolicy};
pub use state::DataState;
pub use store::SelectionStore;
