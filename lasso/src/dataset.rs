use crate::error::{LassoError, Result};
use crate::geometry::limits;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Named numeric columns of equal length. Rows are data rows only; the
/// header of the tabular source lives in the column names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    rows: usize,
    columns: Vec<Column>,
}

/// `0 -> a`, `25 -> z`, `26 -> aa`, ...
pub fn alphabet_suffix(mut n: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'a' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

impl Dataset {
    pub fn new(rows: usize) -> Self {
        Dataset { rows, columns: Vec::new() }
    }

    pub fn from_columns<I, S>(columns: I) -> Result<Dataset>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut iter = columns.into_iter().peekable();
        let rows = iter.peek().map_or(0, |(_, v)| v.len());
        let mut ds = Dataset::new(rows);
        for (name, values) in iter {
            ds.add_column(name, values)?;
        }
        Ok(ds)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.values.as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Append a column, renaming it `name_a`, `name_b`, ... if the name is taken.
    /// Returns the name actually used.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<String> {
        let name = name.into();
        if values.len() != self.rows || values.len() > limits::MAX_ROWS {
            tracing::warn!(
                "column '{}' has {} rows, dataset has {}; not added",
                name,
                values.len(),
                self.rows
            );
            return Err(LassoError::LengthMismatch { expected: self.rows, got: values.len() });
        }
        let mut unique = name.clone();
        let mut n = 0;
        while self.has_column(&unique) {
            unique = format!("{}_{}", name, alphabet_suffix(n));
            n += 1;
        }
        self.columns.push(Column { name: unique.clone(), values });
        Ok(unique)
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(idx))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub name: String,
    pub selected: bool,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
}

/// The feature list shown to the user, with selection state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCatalog {
    entries: Vec<FeatureEntry>,
    // Anchor for shift-click range selection.
    last_plain_selected: Option<String>,
}

impl FeatureCatalog {
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        FeatureCatalog {
            entries: names
                .into_iter()
                .map(|n| FeatureEntry { name: n.to_string(), selected: false, is_virtual: false })
                .collect(),
            last_plain_selected: None,
        }
    }

    pub fn entries(&self) -> &[FeatureEntry] {
        &self.entries
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn add_virtual(&mut self, name: &str) -> bool {
        if self.contains(name) {
            tracing::warn!("feature '{}' already exists, skipping add", name);
            return false;
        }
        self.entries.push(FeatureEntry { name: name.to_string(), selected: false, is_virtual: true });
        true
    }

    /// Plain click: select one feature and remember it as the range anchor.
    pub fn select(&mut self, name: &str) {
        self.last_plain_selected = Some(name.to_string());
        for e in self.entries.iter_mut().filter(|e| e.name == name) {
            e.selected = true;
        }
    }

    /// Shift click: select everything between the anchor and `name`, inclusive.
    pub fn select_range(&mut self, name: &str) {
        let target = match self.entries.iter().position(|e| e.name == name) {
            Some(i) => i,
            None => return,
        };
        let anchor = self
            .last_plain_selected
            .as_deref()
            .and_then(|a| self.entries.iter().position(|e| e.name == a))
            .unwrap_or(target);
        let (lo, hi) = if anchor <= target { (anchor, target) } else { (target, anchor) };
        for e in &mut self.entries[lo..=hi] {
            e.selected = true;
        }
    }

    pub fn unselect(&mut self, name: &str) {
        self.last_plain_selected = Some(name.to_string());
        for e in self.entries.iter_mut().filter(|e| e.name == name) {
            e.selected = false;
        }
    }

    pub fn unselect_all(&mut self) {
        for e in &mut self.entries {
            e.selected = false;
        }
    }

    pub fn delete(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        self.entries.len() != before
    }

    pub fn selected(&self) -> Vec<&str> {
        self.entries.iter().filter(|e| e.selected).map(|e| e.name.as_str()).collect()
    }
}
