//! Aggregate application state: the active dataset, its feature list, the
//! selection store and derived-feature lifetimes, moved forward as one
//! snapshot per operation.

use crate::algorithms::indexer::{indices_within, mask_from_indices};
use crate::config::LassoConfig;
use crate::dataset::{Dataset, FeatureCatalog};
use crate::error::{LassoError, Result};
use crate::features::FeatureLifetime;
use crate::geometry::polygon::Polygon;
use crate::geometry::simplify::simplify;
use crate::model::{BrushArea, MaskSource, NewSelection, Point, Selection};
use crate::store::SelectionStore;
use serde_json::{json, Value};

// Metadata key listing the features a selection holds a reference on.
// Only this module writes it.
const RETAINED_KEY: &str = "retained";

#[derive(Clone, Debug, Default)]
pub struct DataState {
    dataset: Dataset,
    catalog: FeatureCatalog,
    selections: SelectionStore,
    features: FeatureLifetime,
}

impl DataState {
    pub fn new(config: LassoConfig) -> Self {
        DataState {
            dataset: Dataset::default(),
            catalog: FeatureCatalog::default(),
            selections: SelectionStore::new(config),
            features: FeatureLifetime::new(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    pub fn selections(&self) -> &SelectionStore {
        &self.selections
    }

    pub fn features(&self) -> &FeatureLifetime {
        &self.features
    }

    pub fn config(&self) -> &LassoConfig {
        self.selections.config()
    }

    /// Swap in a new dataset. Master and Brush are rebuilt for its rows.
    /// Derived features belonged to the old dataset and are dropped with it,
    /// along with any references kept selections held on them.
    pub fn load_dataset(&self, dataset: Dataset) -> Self {
        let selections = self
            .selections
            .reset_for_new_dataset(dataset.rows())
            .map_meta(|meta| set_retained(meta, &[]));
        DataState {
            catalog: FeatureCatalog::from_names(dataset.names()),
            selections,
            features: FeatureLifetime::new(),
            dataset,
        }
    }

    /// Apply a store operation to this state.
    pub fn with_selections(&self, f: impl FnOnce(&SelectionStore) -> Result<SelectionStore>) -> Result<Self> {
        let mut next = self.clone();
        next.selections = f(&self.selections)?;
        Ok(next)
    }

    /// Edit the feature list (click, shift-click, clear).
    pub fn with_catalog(&self, f: impl FnOnce(&mut FeatureCatalog)) -> Self {
        let mut next = self.clone();
        f(&mut next.catalog);
        next
    }

    /// Replace the selections with a persisted snapshot taken over the current dataset.
    pub fn restore_selections(&self, snapshot: serde_json::Value) -> Result<Self> {
        let restored = SelectionStore::from_json_value(snapshot, self.config().clone())?;
        if restored.rows() != self.dataset.rows() {
            return Err(LassoError::LengthMismatch { expected: self.dataset.rows(), got: restored.rows() });
        }
        let mut next = self.clone();
        for sel in self.selections.selections() {
            next.release_all(&retained_features(sel))?;
        }
        let mut features = next.features.clone();
        let restored = restored.map_meta(|meta| {
            let held: Vec<String> = retained_in(meta.as_ref())
                .into_iter()
                .filter(|f| features.get(f).is_some() && features.retain(f).is_ok())
                .collect();
            set_retained(meta, &held);
        });
        next.features = features;
        next.selections = restored;
        Ok(next)
    }

    /// Add a derived column (e.g. a projection result) and start tracking its lifetime.
    /// Returns the new state and the column's actual name.
    pub fn add_virtual_feature(
        &self,
        name: &str,
        values: Vec<f64>,
        clusters: Option<serde_json::Value>,
    ) -> Result<(Self, String)> {
        let mut next = self.clone();
        let actual = next.dataset.add_column(name, values.clone())?;
        next.catalog.add_virtual(&actual);
        next.features.add_dataset(actual.clone(), values, clusters, false);
        Ok((next, actual))
    }

    pub fn retain_feature(&self, feature: &str) -> Result<Self> {
        let mut next = self.clone();
        next.features.retain(feature)?;
        Ok(next)
    }

    pub fn release_feature(&self, feature: &str) -> Result<Self> {
        let mut next = self.clone();
        next.features.release(feature)?;
        Ok(next)
    }

    /// Delete a feature column. Returns `Ok(None)` while something still references it.
    pub fn delete_feature(&self, feature: &str) -> Result<Option<Self>> {
        if !self.dataset.has_column(feature) {
            return Err(LassoError::NotFound(feature.to_string()));
        }
        if self.features.get(feature).is_some() && !self.features.can_evict(feature) {
            tracing::debug!("feature '{}' still referenced, not deleted", feature);
            return Ok(None);
        }
        let mut next = self.clone();
        next.dataset.remove_column(feature);
        next.catalog.delete(feature);
        next.features.remove(feature);
        Ok(Some(next))
    }

    fn axes(&self, x_feature: &str, y_feature: &str) -> Result<(&[f64], &[f64])> {
        let xs = self
            .dataset
            .column(x_feature)
            .ok_or_else(|| LassoError::NotFound(x_feature.to_string()))?;
        let ys = self
            .dataset
            .column(y_feature)
            .ok_or_else(|| LassoError::NotFound(y_feature.to_string()))?;
        Ok((xs, ys))
    }

    /// Turn a raw lasso drag over the `x_feature`/`y_feature` scatter into a
    /// named selection. Virtual axis features are retained for as long as the
    /// selection exists.
    pub fn lasso_select(
        &self,
        path: &[Point],
        x_feature: &str,
        y_feature: &str,
        name: &str,
    ) -> Result<(Self, Selection)> {
        let (xs, ys) = self.axes(x_feature, y_feature)?;
        let polygon = Polygon::new(&simplify(path, self.config().tolerance))?;
        let indices = indices_within(&polygon, xs, ys)?;
        let mask = mask_from_indices(&indices, self.dataset.rows());
        let held: Vec<&str> = axis_features(x_feature, y_feature)
            .into_iter()
            .filter(|f| self.features.get(f).is_some())
            .collect();
        let mut meta = json!({ "x_feature": x_feature, "y_feature": y_feature });
        if !held.is_empty() {
            meta[RETAINED_KEY] = json!(held);
        }
        let (mut next, selection) = self.insert_selection(NewSelection::new(name, mask).meta(meta))?;
        for feature in held {
            next.features.retain(feature)?;
        }
        Ok((next, selection))
    }

    /// Append a selection. It never holds feature references, whatever its metadata says.
    pub fn create_selection(&self, mut req: NewSelection) -> Result<(Self, Selection)> {
        set_retained(&mut req.meta, &[]);
        self.insert_selection(req)
    }

    fn insert_selection(&self, req: NewSelection) -> Result<(Self, Selection)> {
        let (selections, selection) = self.selections.create_selection(req)?;
        let mut next = self.clone();
        next.selections = selections;
        Ok((next, selection))
    }

    fn release_all(&mut self, features: &[String]) -> Result<()> {
        for feature in features {
            if self.features.get(feature).is_some() {
                self.features.release(feature)?;
            }
        }
        Ok(())
    }

    /// Save the current brush as a named selection.
    pub fn save_brush(&self, name: &str) -> Result<(Self, Selection)> {
        self.create_selection(NewSelection::new(name, MaskSource::Brush))
    }

    pub fn brush_area(&self, area: &BrushArea, x_feature: &str, y_feature: &str) -> Result<Self> {
        self.with_selections(|s| s.update_brush_area(area, x_feature, y_feature, &self.dataset))
    }

    /// Remove a selection and release the virtual features it retained.
    pub fn remove_selection(&self, index: usize) -> Result<Self> {
        let removed = self
            .selections
            .get(index)
            .ok_or(LassoError::IndexOutOfRange { index, len: self.selections.len() })?;
        let held = retained_features(removed);
        let mut next = self.clone();
        next.selections = self.selections.remove(index)?;
        next.release_all(&held)?;
        Ok(next)
    }
}

fn retained_features(selection: &Selection) -> Vec<String> {
    retained_in(selection.meta.as_ref())
}

// Deduplicated, in listed order.
fn retained_in(meta: Option<&Value>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let listed = meta.and_then(|m| m.get(RETAINED_KEY)).and_then(Value::as_array);
    for name in listed.into_iter().flatten().filter_map(Value::as_str) {
        if !out.iter().any(|f| f == name) {
            out.push(name.to_string());
        }
    }
    out
}

fn set_retained(meta: &mut Option<Value>, features: &[String]) {
    if let Some(Value::Object(map)) = meta {
        if features.is_empty() {
            map.remove(RETAINED_KEY);
        } else {
            map.insert(RETAINED_KEY.to_string(), json!(features));
        }
    }
}

// Both axes, without retaining a feature twice when x and y coincide.
fn axis_features<'a>(x: &'a str, y: &'a str) -> Vec<&'a str> {
    if x == y {
        vec![x]
    } else {
        vec![x, y]
    }
}
