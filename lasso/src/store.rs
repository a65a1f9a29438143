//! Named selections plus the Master and Brush system masks.
//!
//! A `SelectionStore` is an immutable snapshot: every operation borrows the
//! current store and returns a new one, so snapshots already handed to
//! observers never change underneath them. Masks are reference-counted
//! slices and are replaced wholesale, never edited in place.

use crate::algorithms::indexer::{mask_within, mask_within_rectangle};
use crate::config::{LassoConfig, BRUSH_NAME, MASTER_NAME};
use crate::dataset::Dataset;
use crate::error::{LassoError, Result};
use crate::geometry::polygon::Polygon;
use crate::model::{BrushArea, Mask, MaskSource, NewSelection, Selection, StalePolicy};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct SelectionStore {
    config: Arc<LassoConfig>,
    rows: usize,
    master: Selection,
    brush: Selection,
    selections: Vec<Selection>,
}

fn filled(len: usize, value: bool) -> Mask {
    vec![value; len].into()
}

fn system_selection(name: &str, mask: Mask, color: &str) -> Selection {
    Selection {
        name: name.to_string(),
        mask,
        color: color.to_string(),
        visible: true,
        emphasize: false,
        meta: None,
    }
}

/// `requested` if free, otherwise `requested_<n>` for the smallest free `n`.
pub fn unique_name(requested: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(requested) {
        return requested.to_string();
    }
    (0..)
        .map(|n| format!("{}_{}", requested, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| requested.to_string())
}

impl Default for SelectionStore {
    fn default() -> Self {
        SelectionStore::new(LassoConfig::default())
    }
}

impl SelectionStore {
    /// Empty store sized for a zero-row dataset.
    pub fn new(config: LassoConfig) -> Self {
        SelectionStore::with_rows(config, 0)
    }

    pub fn with_rows(config: LassoConfig, rows: usize) -> Self {
        let master = system_selection(MASTER_NAME, filled(rows, true), &config.master_color);
        let brush = system_selection(BRUSH_NAME, filled(rows, false), &config.brush_color);
        SelectionStore { config: Arc::new(config), rows, master, brush, selections: Vec::new() }
    }

    pub(crate) fn from_parts(
        config: LassoConfig,
        rows: usize,
        master: Selection,
        brush: Selection,
        selections: Vec<Selection>,
    ) -> Self {
        SelectionStore { config: Arc::new(config), rows, master, brush, selections }
    }

    pub fn config(&self) -> &LassoConfig {
        &self.config
    }

    /// Number of data rows every mask must cover.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn master(&self) -> &Selection {
        &self.master
    }

    pub fn brush(&self) -> &Selection {
        &self.brush
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn get(&self, index: usize) -> Option<&Selection> {
        self.selections.get(index)
    }

    pub fn find(&self, name: &str) -> Option<(usize, &Selection)> {
        self.selections.iter().enumerate().find(|(_, s)| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    fn name_taken(&self, name: &str, skip: Option<usize>) -> bool {
        self.selections.iter().enumerate().any(|(i, s)| Some(i) != skip && s.name == name)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.selections.len() {
            return Err(LassoError::IndexOutOfRange { index, len: self.selections.len() });
        }
        Ok(())
    }

    /// Rewrite the metadata of every named selection.
    pub(crate) fn map_meta(&self, mut f: impl FnMut(&mut Option<serde_json::Value>)) -> Self {
        let mut next = self.clone();
        for s in &mut next.selections {
            f(&mut s.meta);
        }
        next
    }

    fn with_selection(&self, index: usize, f: impl FnOnce(&mut Selection)) -> Result<Self> {
        self.check_index(index)?;
        let mut next = self.clone();
        f(&mut next.selections[index]);
        Ok(next)
    }

    /// Append a selection. Names are made unique, an empty color takes the
    /// next palette entry, and `MaskSource::Brush` snapshots the current brush.
    pub fn create_selection(&self, req: NewSelection) -> Result<(Self, Selection)> {
        let mask: Mask = match req.mask {
            // Masks are never mutated in place.
            MaskSource::Brush => Arc::clone(&self.brush.mask),
            MaskSource::Mask(m) => m.into(),
        };
        if mask.len() != self.rows {
            return Err(LassoError::LengthMismatch { expected: self.rows, got: mask.len() });
        }
        let color = if req.color.is_empty() {
            self.config.palette_color(self.selections.len()).to_string()
        } else {
            req.color
        };
        let selection = Selection {
            name: unique_name(&req.name, |n| self.name_taken(n, None)),
            mask,
            color,
            visible: req.visible,
            emphasize: false,
            meta: req.meta,
        };
        let mut next = self.clone();
        next.selections.push(selection.clone());
        tracing::debug!("created selection '{}' ({} total)", selection.name, next.selections.len());
        Ok((next, selection))
    }

    /// Position `i` of the result holds the selection previously at `order[i]`.
    pub fn reorder(&self, order: &[usize]) -> Result<Self> {
        let n = self.selections.len();
        let mut seen = vec![false; n];
        let valid = order.len() == n
            && order.iter().all(|&i| i < n && !std::mem::replace(&mut seen[i], true));
        if !valid {
            return Err(LassoError::InvalidPermutation(order.to_vec()));
        }
        let mut next = self.clone();
        next.selections = order.iter().map(|&i| self.selections[i].clone()).collect();
        Ok(next)
    }

    pub fn recolor(&self, index: usize, color: impl Into<String>) -> Result<Self> {
        let color = color.into();
        self.with_selection(index, |s| s.color = color)
    }

    /// Rename, suffixing `_<n>` if another selection already uses the name.
    pub fn rename(&self, index: usize, name: &str) -> Result<Self> {
        self.check_index(index)?;
        let name = unique_name(name, |n| self.name_taken(n, Some(index)));
        self.with_selection(index, |s| s.name = name)
    }

    pub fn toggle_visible(&self, index: usize) -> Result<Self> {
        self.with_selection(index, |s| s.visible = !s.visible)
    }

    pub fn toggle_emphasize(&self, index: usize) -> Result<Self> {
        self.with_selection(index, |s| s.emphasize = !s.emphasize)
    }

    pub fn remove(&self, index: usize) -> Result<Self> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.selections.remove(index);
        Ok(next)
    }

    /// Hide every selection without deleting any.
    pub fn unselect_all(&self) -> Self {
        let mut next = self.clone();
        for s in &mut next.selections {
            s.visible = false;
        }
        next
    }

    /// Replace the brush mask. A mask sized for another dataset is dropped
    /// silently: it belongs to a gesture that raced a dataset reload.
    pub fn update_brush_mask(&self, mask: impl Into<Mask>) -> Self {
        let mask = mask.into();
        if mask.len() != self.rows {
            tracing::debug!("brush mask of {} rows ignored, store has {}", mask.len(), self.rows);
            return self.clone();
        }
        let mut next = self.clone();
        next.brush.mask = mask;
        next
    }

    /// Recompute the brush from a gesture over two dataset columns.
    pub fn update_brush_area(
        &self,
        area: &BrushArea,
        x_feature: &str,
        y_feature: &str,
        dataset: &Dataset,
    ) -> Result<Self> {
        let xs = dataset
            .column(x_feature)
            .ok_or_else(|| LassoError::NotFound(x_feature.to_string()))?;
        let ys = dataset
            .column(y_feature)
            .ok_or_else(|| LassoError::NotFound(y_feature.to_string()))?;
        let mask = match area {
            BrushArea::Rectangle { x, y } => mask_within_rectangle(*x, *y, xs, ys)?,
            BrushArea::Freehand { path } => mask_within(&Polygon::new(path)?, xs, ys)?,
        };
        Ok(self.update_brush_mask(mask))
    }

    pub fn clear_brush(&self) -> Self {
        let mut next = self.clone();
        next.brush.mask = filled(self.rows, false);
        next
    }

    /// Resize the system masks for a newly loaded dataset of `rows` data rows.
    /// Named selections are handled according to the configured `StalePolicy`.
    pub fn reset_for_new_dataset(&self, rows: usize) -> Self {
        let mut next = self.clone();
        next.rows = rows;
        next.master.mask = filled(rows, true);
        next.brush.mask = filled(rows, false);
        match self.config.stale_policy {
            StalePolicy::Keep => {}
            StalePolicy::Resize => {
                for s in next.selections.iter_mut().filter(|s| s.mask.len() != rows) {
                    let mut m = s.mask.to_vec();
                    m.resize(rows, false);
                    s.mask = m.into();
                }
            }
            StalePolicy::Invalidate => next.selections.retain(|s| s.mask.len() == rows),
        }
        tracing::debug!(
            "dataset reset to {} rows, {} selections kept, {} stale",
            rows,
            next.selections.len(),
            next.stale_selections().len()
        );
        next
    }

    /// Indices of selections whose mask no longer matches the row count.
    pub fn stale_selections(&self) -> Vec<usize> {
        self.selections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.mask.len() != self.rows)
            .map(|(i, _)| i)
            .collect()
    }
}
