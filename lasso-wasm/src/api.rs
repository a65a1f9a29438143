use crate::error;
use crate::interop::{
    arr_f64, indices_to_u32, mask_from_u8, mask_to_u8, new_obj, points_from_f64, points_to_f64,
    set_kv,
};
use crate::{Lasso, Selections};
use js_sys::{Float64Array, Uint32Array, Uint8Array};
use lasso::dataset::Column;
use lasso::geometry::limits;
use lasso::{BrushArea, DataState, LassoConfig, MaskSource, NewSelection, PathSimplifier, Point, Polygon};
use serde::Serialize;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn check_tolerance(tol: f64) -> Option<JsValue> {
    if !tol.is_finite() {
        return Some(error::non_finite("tolerance"));
    }
    if !limits::in_tolerance_bounds(tol) {
        return Some(error::out_of_range("tolerance", 0.0, limits::TOLERANCE_MAX, tol));
    }
    None
}

fn check_points(points: &[Point], param: &str) -> Option<JsValue> {
    if points.len() > limits::MAX_PATH_POINTS {
        return Some(error::out_of_range(param, 0.0, limits::MAX_PATH_POINTS as f64, points.len() as f64));
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Some(error::non_finite(param));
    }
    None
}

// Plain JS objects rather than `Map`s, so snapshots read back as JSON.
fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).unwrap_or(JsValue::NULL)
}

/// One-shot simplification of an interleaved `[x0, y0, x1, y1, ...]` path.
#[wasm_bindgen]
pub fn simplify_path(points: &Float64Array, tolerance: f64) -> Float64Array {
    points_to_f64(&lasso::simplify(&points_from_f64(points), tolerance))
}

#[wasm_bindgen]
pub fn simplify_path_res(points: &Float64Array, tolerance: f64) -> JsValue {
    if let Some(e) = check_tolerance(tolerance) {
        return e;
    }
    let pts = points_from_f64(points);
    if let Some(e) = check_points(&pts, "points") {
        return e;
    }
    error::ok(points_to_f64(&lasso::simplify(&pts, tolerance)).into())
}

/// Row indices inside the closed polygon, in ascending order.
#[wasm_bindgen]
pub fn indices_within_res(polygon: &Float64Array, xs: &Float64Array, ys: &Float64Array) -> JsValue {
    let pts = points_from_f64(polygon);
    if let Some(e) = check_points(&pts, "polygon") {
        return e;
    }
    let r = Polygon::new(&pts).and_then(|poly| lasso::indices_within(&poly, &xs.to_vec(), &ys.to_vec()));
    error::from_result(r, |idx| indices_to_u32(&idx).into())
}

#[wasm_bindgen]
pub fn indices_within_rectangle_res(
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    xs: &Float64Array,
    ys: &Float64Array,
) -> JsValue {
    for (name, v) in [("x0", x0), ("x1", x1), ("y0", y0), ("y1", y1)] {
        if v.is_nan() {
            return error::non_finite(name);
        }
    }
    let r = lasso::indices_within_rectangle((x0, x1), (y0, y1), &xs.to_vec(), &ys.to_vec());
    error::from_result(r, |idx| indices_to_u32(&idx).into())
}

#[wasm_bindgen]
impl Lasso {
    #[wasm_bindgen(constructor)]
    pub fn new(tolerance: f64) -> Lasso {
        Lasso { inner: PathSimplifier::new(tolerance) }
    }
    pub fn new_res(tolerance: f64) -> JsValue {
        if let Some(e) = check_tolerance(tolerance) {
            return e;
        }
        error::ok(JsValue::from(Lasso::new(tolerance)))
    }

    /// Append a pointer sample; returns the simplified path so far.
    pub fn add_point(&mut self, x: f64, y: f64) -> Float64Array {
        points_to_f64(self.inner.add_point(Point::new(x, y)))
    }
    pub fn add_point_res(&mut self, x: f64, y: f64) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if self.inner.raw().len() >= limits::MAX_PATH_POINTS {
            let n = self.inner.raw().len() as f64;
            return error::out_of_range("points", 0.0, limits::MAX_PATH_POINTS as f64, n);
        }
        error::ok(self.add_point(x, y).into())
    }
    pub fn simplified(&self) -> Float64Array {
        points_to_f64(self.inner.simplified())
    }
    /// The released lasso, simplified until stable.
    pub fn finish(&self) -> Float64Array {
        points_to_f64(&self.inner.finish())
    }
    pub fn raw_len(&self) -> u32 {
        self.inner.raw().len() as u32
    }
    pub fn tolerance(&self) -> f64 {
        self.inner.tolerance()
    }
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl Selections {
    fn apply(&mut self, r: lasso::Result<DataState>) -> JsValue {
        match r {
            Ok(next) => {
                self.inner = next;
                error::ok(JsValue::TRUE)
            }
            Err(e) => error::from_lasso(&e),
        }
    }

    fn apply_with<T>(&mut self, r: lasso::Result<(DataState, T)>, f: impl FnOnce(T) -> JsValue) -> JsValue {
        match r {
            Ok((next, v)) => {
                self.inner = next;
                error::ok(f(v))
            }
            Err(e) => error::from_lasso(&e),
        }
    }
}

#[wasm_bindgen]
impl Selections {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Selections {
        Selections::rs_new(LassoConfig::default())
    }

    /// Build from a (partial) `LassoConfig` JSON object.
    pub fn with_config_res(config: JsValue) -> JsValue {
        let cfg = match serde_wasm_bindgen::from_value::<serde_json::Value>(config) {
            Ok(v) => v,
            Err(e) => return error::invalid_json(e.to_string()),
        };
        match LassoConfig::from_json_value(cfg) {
            Some(cfg) => error::ok(JsValue::from(Selections::rs_new(cfg))),
            None => error::invalid_json("invalid config"),
        }
    }

    pub fn config(&self) -> JsValue {
        to_js(&self.inner.config().to_json_value())
    }

    // Dataset

    /// Load `[{name, values}]` columns as the new dataset.
    pub fn load_dataset_res(&mut self, columns: JsValue) -> JsValue {
        let columns: Vec<Column> = match serde_wasm_bindgen::from_value(columns) {
            Ok(c) => c,
            Err(e) => return error::invalid_json(e.to_string()),
        };
        let r = lasso::Dataset::from_columns(columns.into_iter().map(|c| (c.name, c.values)))
            .map(|ds| self.inner.load_dataset(ds));
        self.apply(r)
    }
    pub fn rows(&self) -> u32 {
        self.inner.dataset().rows() as u32
    }
    pub fn column(&self, name: &str) -> Option<Float64Array> {
        self.inner.dataset().column(name).map(arr_f64)
    }
    pub fn add_virtual_feature_res(&mut self, name: &str, values: &Float64Array, clusters: JsValue) -> JsValue {
        let clusters = if clusters.is_undefined() || clusters.is_null() {
            None
        } else {
            match serde_wasm_bindgen::from_value::<serde_json::Value>(clusters) {
                Ok(v) => Some(v),
                Err(e) => return error::invalid_json(e.to_string()),
            }
        };
        let r = self.inner.add_virtual_feature(name, values.to_vec(), clusters);
        self.apply_with(r, |actual| JsValue::from_str(&actual))
    }
    pub fn retain_feature_res(&mut self, name: &str) -> JsValue {
        let r = self.inner.retain_feature(name);
        self.apply(r)
    }
    pub fn release_feature_res(&mut self, name: &str) -> JsValue {
        let r = self.inner.release_feature(name);
        self.apply(r)
    }
    /// `{ok: true, value: false}` while the feature is still referenced.
    pub fn delete_feature_res(&mut self, name: &str) -> JsValue {
        match self.inner.delete_feature(name) {
            Ok(Some(next)) => {
                self.inner = next;
                error::ok(JsValue::TRUE)
            }
            Ok(None) => error::ok(JsValue::FALSE),
            Err(e) => error::from_lasso(&e),
        }
    }
    pub fn feature_references(&self, name: &str) -> Option<u32> {
        self.inner.features().references(name)
    }

    // Feature list

    pub fn features(&self) -> JsValue {
        to_js(self.inner.catalog().entries())
    }
    pub fn select_feature(&mut self, name: &str, shift: bool) {
        self.inner = self.inner.with_catalog(|c| if shift { c.select_range(name) } else { c.select(name) });
    }
    pub fn unselect_feature(&mut self, name: &str) {
        self.inner = self.inner.with_catalog(|c| c.unselect(name));
    }
    pub fn unselect_all_features(&mut self) {
        self.inner = self.inner.with_catalog(|c| c.unselect_all());
    }

    // Selections

    pub fn selections(&self) -> JsValue {
        to_js(self.inner.selections().selections())
    }
    pub fn selection_count(&self) -> u32 {
        self.inner.selections().len() as u32
    }
    pub fn selection_mask(&self, index: u32) -> Option<Uint8Array> {
        self.inner.selections().get(index as usize).map(|s| mask_to_u8(&s.mask))
    }
    pub fn brush_mask(&self) -> Uint8Array {
        mask_to_u8(&self.inner.selections().brush().mask)
    }
    pub fn master_mask(&self) -> Uint8Array {
        mask_to_u8(&self.inner.selections().master().mask)
    }

    /// Simplify a raw drag, select the enclosed rows and store them under `name`.
    /// Returns `{name, color, count}` of the created selection.
    pub fn lasso_select_res(&mut self, path: &Float64Array, x_feature: &str, y_feature: &str, name: &str) -> JsValue {
        let pts = points_from_f64(path);
        if let Some(e) = check_points(&pts, "path") {
            return e;
        }
        let r = self.inner.lasso_select(&pts, x_feature, y_feature, name);
        self.apply_with(r, |sel| {
            let o = new_obj();
            set_kv(&o, "name", &JsValue::from_str(&sel.name));
            set_kv(&o, "color", &JsValue::from_str(&sel.color));
            set_kv(&o, "count", &JsValue::from_f64(sel.count() as f64));
            o.into()
        })
    }
    /// Store a selection from an explicit mask. An empty `color` takes the next palette entry.
    pub fn create_selection_res(&mut self, name: &str, mask: &Uint8Array, color: &str) -> JsValue {
        let req = NewSelection::new(name, mask_from_u8(mask)).color(color);
        let r = self.inner.create_selection(req);
        self.apply_with(r, |sel| JsValue::from_str(&sel.name))
    }
    pub fn reorder_res(&mut self, order: &Uint32Array) -> JsValue {
        let order: Vec<usize> = order.to_vec().into_iter().map(|i| i as usize).collect();
        let r = self.inner.with_selections(|s| s.reorder(&order));
        self.apply(r)
    }
    pub fn recolor_res(&mut self, index: u32, color: &str) -> JsValue {
        let r = self.inner.with_selections(|s| s.recolor(index as usize, color));
        self.apply(r)
    }
    pub fn rename_res(&mut self, index: u32, name: &str) -> JsValue {
        let r = self.inner.with_selections(|s| s.rename(index as usize, name));
        self.apply(r)
    }
    pub fn toggle_visible_res(&mut self, index: u32) -> JsValue {
        let r = self.inner.with_selections(|s| s.toggle_visible(index as usize));
        self.apply(r)
    }
    pub fn toggle_emphasize_res(&mut self, index: u32) -> JsValue {
        let r = self.inner.with_selections(|s| s.toggle_emphasize(index as usize));
        self.apply(r)
    }
    pub fn remove_selection_res(&mut self, index: u32) -> JsValue {
        let r = self.inner.remove_selection(index as usize);
        self.apply(r)
    }
    pub fn unselect_all(&mut self) {
        if let Ok(next) = self.inner.with_selections(|s| Ok(s.unselect_all())) {
            self.inner = next;
        }
    }

    // Brush

    /// Replace the brush mask; a mask of the wrong length is ignored.
    pub fn update_brush_mask(&mut self, mask: &Uint8Array) {
        let mask = mask_from_u8(mask);
        if let Ok(next) = self.inner.with_selections(|s| Ok(s.update_brush_mask(mask))) {
            self.inner = next;
        }
    }
    /// `area` is `{mode: "rectangle", x: [min, max], y: [min, max]}` or
    /// `{mode: "freehand", path: [{x, y}, ...]}`.
    pub fn brush_area_res(&mut self, area: JsValue, x_feature: &str, y_feature: &str) -> JsValue {
        let area: BrushArea = match serde_wasm_bindgen::from_value(area) {
            Ok(a) => a,
            Err(e) => return error::invalid_json(e.to_string()),
        };
        if let BrushArea::Freehand { path } = &area {
            if let Some(e) = check_points(path, "path") {
                return e;
            }
        }
        let r = self.inner.brush_area(&area, x_feature, y_feature);
        self.apply(r)
    }
    pub fn clear_brush(&mut self) {
        if let Ok(next) = self.inner.with_selections(|s| Ok(s.clear_brush())) {
            self.inner = next;
        }
    }
    /// Copy the brush into a new selection. An empty `color` takes the next palette entry.
    pub fn save_brush_res(&mut self, name: &str, color: &str) -> JsValue {
        let r = self.inner.create_selection(NewSelection::new(name, MaskSource::Brush).color(color));
        self.apply_with(r, |sel| JsValue::from_str(&sel.name))
    }

    // Persistence

    pub fn to_json(&self) -> JsValue {
        to_js(&self.inner.selections().to_json_value())
    }
    pub fn from_json_res(&mut self, v: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => {
                let r = self.inner.restore_selections(val);
                self.apply(r)
            }
            Err(e) => error::invalid_json(e.to_string()),
        }
    }
}

impl Default for Selections {
    fn default() -> Self {
        Selections::new()
    }
}
