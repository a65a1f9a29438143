use lasso::{
    FeatureLifetime, LassoConfig, LassoError, NewSelection, SelectionStore, SNAPSHOT_VERSION,
};
use serde_json::json;

fn sample_store() -> SelectionStore {
    let store = SelectionStore::with_rows(LassoConfig::default(), 4);
    let (store, _) = store
        .create_selection(NewSelection::new("left", vec![true, true, false, false]).color("#101010"))
        .unwrap();
    let (store, _) = store
        .create_selection(
            NewSelection::new("right", vec![false, false, true, true])
                .visible(false)
                .meta(json!({"x_feature": "PCA_0", "y_feature": "PCA_1"})),
        )
        .unwrap();
    store
        .update_brush_mask(vec![false, true, true, false])
        .reorder(&[1, 0])
        .unwrap()
}

#[test]
fn snapshot_round_trip() {
    let store = sample_store();
    let v = store.to_json_value();
    assert_eq!(v["version"], json!(SNAPSHOT_VERSION));
    assert_eq!(v["rows"], json!(4));
    assert_eq!(v["selections"][0]["name"], json!("right"));
    assert_eq!(v["selections"][0]["visible"], json!(false));

    let back = SelectionStore::from_json_value(v.clone(), LassoConfig::default()).unwrap();
    assert_eq!(back.selections(), store.selections());
    assert_eq!(back.master(), store.master());
    assert_eq!(back.brush(), store.brush());
    assert_eq!(back.to_json_value(), v);
}

#[test]
fn snapshot_survives_text_encoding() {
    let text = serde_json::to_string(&sample_store().to_json_value()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    let back = SelectionStore::from_json_value(v, LassoConfig::default()).unwrap();
    assert_eq!(back.find("left").map(|(i, _)| i), Some(1));
}

#[test]
fn restored_store_keeps_working() {
    let v = sample_store().to_json_value();
    let back = SelectionStore::from_json_value(v, LassoConfig::default()).unwrap();
    let (back, sel) = back.create_selection(NewSelection::new("left", vec![true; 4])).unwrap();
    assert_eq!(sel.name, "left_0");
    assert_eq!(back.len(), 3);
    let err = back.create_selection(NewSelection::new("short", vec![true])).unwrap_err();
    assert_eq!(err, LassoError::LengthMismatch { expected: 4, got: 1 });
}

#[test]
fn invalid_snapshots_rejected() {
    let v = sample_store().to_json_value();
    let cfg = LassoConfig::default();

    let mut bad = v.clone();
    bad["master"]["mask"] = json!([true, false, true, true]);
    assert_eq!(SelectionStore::from_json_value(bad, cfg.clone()).unwrap_err().code(), "invalid_snapshot");

    let mut bad = v.clone();
    bad["selections"][1]["mask"] = json!([true]);
    assert_eq!(SelectionStore::from_json_value(bad, cfg.clone()).unwrap_err().code(), "length_mismatch");

    let mut bad = v.clone();
    bad["brush"]["name"] = json!("Master");
    assert!(SelectionStore::from_json_value(bad, cfg.clone()).is_err());

    assert!(SelectionStore::from_json_value(json!("nope"), cfg).is_err());
}

#[test]
fn feature_lifetime_serde() {
    let mut lifetime = FeatureLifetime::new();
    lifetime.add_dataset("PCA_0", vec![0.5, 1.5], Some(json!({"k": 2})), true);
    lifetime.add_dataset("PCA_1", vec![0.0, 1.0], None, false);
    let v = serde_json::to_value(&lifetime).unwrap();
    let back: FeatureLifetime = serde_json::from_value(v).unwrap();
    assert_eq!(back, lifetime);
    assert_eq!(back.references("PCA_0"), Some(1));
    assert!(back.can_evict("PCA_1"));
    assert_eq!(back.data_len(), Some(2));
}
