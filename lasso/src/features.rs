//! Reference counts for derived (virtual) feature columns.
//!
//! A feature that backs a chart axis or a selection is retained by whoever
//! uses it and released when that use ends. Nothing here evicts on its own:
//! callers check [`FeatureLifetime::can_evict`] before [`FeatureLifetime::remove`].

use crate::error::{LassoError, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub feature: String,
    pub data: Vec<f64>,
    #[serde(default)]
    pub clusters: Option<serde_json::Value>,
    pub references: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureLifetime {
    records: Vec<FeatureRecord>,
    data_len: Option<usize>,
}

impl FeatureLifetime {
    pub fn new() -> Self {
        FeatureLifetime::default()
    }

    /// Register a loaded feature. A second registration of the same name is ignored.
    /// With `auto_ref` the record starts with one reference held by the caller.
    pub fn add_dataset(
        &mut self,
        feature: impl Into<String>,
        data: Vec<f64>,
        clusters: Option<serde_json::Value>,
        auto_ref: bool,
    ) -> bool {
        let feature = feature.into();
        if self.position(&feature).is_some() {
            tracing::warn!("feature '{}' already loaded, ignoring", feature);
            return false;
        }
        self.data_len = Some(data.len());
        self.records.push(FeatureRecord {
            feature,
            data,
            clusters,
            references: u32::from(auto_ref),
        });
        true
    }

    pub fn retain(&mut self, feature: &str) -> Result<u32> {
        let rec = self.record_mut(feature)?;
        rec.references = rec.references.saturating_add(1);
        Ok(rec.references)
    }

    /// Drop one reference. Releasing an unreferenced feature leaves it at zero.
    pub fn release(&mut self, feature: &str) -> Result<u32> {
        let rec = self.record_mut(feature)?;
        rec.references = rec.references.saturating_sub(1);
        Ok(rec.references)
    }

    /// True when the feature is loaded and nothing references it.
    pub fn can_evict(&self, feature: &str) -> bool {
        self.get(feature).map_or(false, |r| r.references == 0)
    }

    pub fn references(&self, feature: &str) -> Option<u32> {
        self.get(feature).map(|r| r.references)
    }

    /// Evict a record. Checking `can_evict` first is the caller's job.
    pub fn remove(&mut self, feature: &str) -> Option<FeatureRecord> {
        let idx = self.position(feature)?;
        let rec = self.records.remove(idx);
        if rec.references > 0 {
            tracing::warn!(
                "evicting feature '{}' with {} live references",
                rec.feature,
                rec.references
            );
        }
        Some(rec)
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureRecord> {
        self.records.iter().find(|r| r.feature == feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Length of the most recently registered feature's data.
    pub fn data_len(&self) -> Option<usize> {
        self.data_len
    }

    fn position(&self, feature: &str) -> Option<usize> {
        self.records.iter().position(|r| r.feature == feature)
    }

    fn record_mut(&mut self, feature: &str) -> Result<&mut FeatureRecord> {
        match self.records.iter_mut().find(|r| r.feature == feature) {
            Some(r) => Ok(r),
            None => {
                tracing::warn!("feature '{}' is not loaded; lifetime unchanged", feature);
                Err(LassoError::NotFound(feature.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_release_and_floor() {
        let mut f = FeatureLifetime::new();
        assert!(f.add_dataset("PCA_1", vec![1.0, 2.0], None, false));
        assert!(f.can_evict("PCA_1"));
        assert_eq!(f.retain("PCA_1").unwrap(), 1);
        assert_eq!(f.retain("PCA_1").unwrap(), 2);
        assert!(!f.can_evict("PCA_1"));
        assert_eq!(f.release("PCA_1").unwrap(), 1);
        assert_eq!(f.release("PCA_1").unwrap(), 0);
        assert_eq!(f.release("PCA_1").unwrap(), 0);
        assert_eq!(f.references("PCA_1"), Some(0));
        assert!(f.can_evict("PCA_1"));
    }

    #[test]
    fn unknown_feature_is_not_found() {
        let mut f = FeatureLifetime::new();
        assert_eq!(f.retain("ghost"), Err(LassoError::NotFound("ghost".into())));
        assert!(f.release("ghost").is_err());
        assert!(!f.can_evict("ghost"));
        assert!(f.remove("ghost").is_none());
    }

    #[test]
    fn auto_ref_and_duplicates() {
        let mut f = FeatureLifetime::new();
        assert!(f.add_dataset("tsne", vec![0.0; 3], Some(serde_json::json!([0, 1, 1])), true));
        assert_eq!(f.references("tsne"), Some(1));
        assert!(!f.add_dataset("tsne", vec![0.0; 5], None, false));
        assert_eq!(f.len(), 1);
        assert_eq!(f.get("tsne").unwrap().data.len(), 3);
        assert_eq!(f.data_len(), Some(3));
    }

    #[test]
    fn remove_evicts_regardless_of_count() {
        let mut f = FeatureLifetime::new();
        f.add_dataset("a", vec![], None, true);
        let rec = f.remove("a").unwrap();
        assert_eq!(rec.references, 1);
        assert!(f.is_empty());
    }
}
