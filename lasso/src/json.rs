use crate::config::{LassoConfig, BRUSH_NAME, MASTER_NAME};
use crate::error::{LassoError, Result};
use crate::model::Selection;
use crate::store::SelectionStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct DocRef<'a> {
    version: u32,
    rows: usize,
    master: &'a Selection,
    brush: &'a Selection,
    selections: &'a [Selection],
}

#[derive(Deserialize)]
struct Doc {
    version: u32,
    rows: usize,
    master: Selection,
    brush: Selection,
    #[serde(default)]
    selections: Vec<Selection>,
}

pub fn to_json_impl(store: &SelectionStore) -> Value {
    let doc = DocRef {
        version: SNAPSHOT_VERSION,
        rows: store.rows(),
        master: store.master(),
        brush: store.brush(),
        selections: store.selections(),
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

fn invalid(msg: impl Into<String>) -> LassoError {
    LassoError::InvalidSnapshot(msg.into())
}

pub fn from_json_impl(v: Value, config: LassoConfig) -> Result<SelectionStore> {
    let doc: Doc = serde_json::from_value(v).map_err(|e| invalid(e.to_string()))?;
    if doc.version != SNAPSHOT_VERSION {
        return Err(invalid(format!("unsupported version {}", doc.version)));
    }
    if doc.master.name != MASTER_NAME || doc.brush.name != BRUSH_NAME {
        return Err(invalid("system selections misnamed"));
    }
    if doc.master.mask.len() != doc.rows || doc.master.mask.iter().any(|m| !m) {
        return Err(invalid("master mask must be all true for every row"));
    }
    let mut names = HashSet::new();
    for s in std::iter::once(&doc.brush).chain(doc.selections.iter()) {
        if s.mask.len() != doc.rows {
            return Err(LassoError::LengthMismatch { expected: doc.rows, got: s.mask.len() });
        }
    }
    for s in &doc.selections {
        if !names.insert(s.name.as_str()) {
            return Err(invalid(format!("duplicate selection name '{}'", s.name)));
        }
    }
    Ok(SelectionStore::from_parts(config, doc.rows, doc.master, doc.brush, doc.selections))
}

impl SelectionStore {
    pub fn to_json_value(&self) -> Value {
        to_json_impl(self)
    }

    /// Restore a snapshot, checking name uniqueness and mask lengths.
    pub fn from_json_value(v: Value, config: LassoConfig) -> Result<SelectionStore> {
        from_json_impl(v, config)
    }
}
