use lasso::{
    simplify, FeatureLifetime, LassoConfig, MaskSource, NewSelection, Point, Polygon,
    SelectionStore, StalePolicy,
};
use proptest::prelude::*;
use std::collections::HashSet;

// Integer rectangle, scaled by 0.5 so query points land on edges and corners often.
fn rect_strategy() -> impl Strategy<Value = ((f64, f64), (f64, f64), bool)> {
    (-40i32..40, 1i32..40, -40i32..40, 1i32..40, any::<bool>()).prop_map(|(x0, w, y0, h, vertical_first)| {
        let x = (x0 as f64 * 0.5, (x0 + w) as f64 * 0.5);
        let y = (y0 as f64 * 0.5, (y0 + h) as f64 * 0.5);
        (x, y, vertical_first)
    })
}

fn rect_polygon(x: (f64, f64), y: (f64, f64), vertical_first: bool) -> Polygon {
    let pts = if vertical_first {
        [(x.0, y.0), (x.0, y.1), (x.1, y.1), (x.1, y.0)]
    } else {
        [(x.0, y.0), (x.1, y.0), (x.1, y.1), (x.0, y.1)]
    };
    let pts: Vec<Point> = pts.iter().map(|&p| p.into()).collect();
    Polygon::new(&pts).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 10_000, .. ProptestConfig::default() })]
    #[test]
    fn rectangle_fast_path_matches_ray_cast(
        (x, y, vertical_first) in rect_strategy(),
        qx in -50i32..50,
        qy in -50i32..50,
        omit in any::<bool>(),
    ) {
        let poly = rect_polygon(x, y, vertical_first);
        prop_assert!(poly.is_rectangle());
        let q = Point::new(qx as f64 * 0.5, qy as f64 * 0.5);
        prop_assert_eq!(poly.contains(q, omit), poly.contains_by_ray(q, omit), "query {:?}", q);
    }
}

proptest! {
    #[test]
    fn convex_containment_ignores_start_vertex(
        n in 3usize..12,
        cx in -100.0f64..100.0,
        cy in -100.0f64..100.0,
        r in 1.0f64..50.0,
        phase in 0.0f64..std::f64::consts::TAU,
        qa in 0.0f64..std::f64::consts::TAU,
        qr in 0.0f64..0.9,
    ) {
        let ring: Vec<Point> = (0..n)
            .map(|i| {
                let t = phase + i as f64 / n as f64 * std::f64::consts::TAU;
                Point::new(cx + r * t.cos(), cy + r * t.sin())
            })
            .collect();
        // Inside the inscribed circle, so strictly inside the polygon.
        let inner = r * (std::f64::consts::PI / n as f64).cos() * qr;
        let q = Point::new(cx + inner * qa.cos(), cy + inner * qa.sin());
        for k in 0..n {
            let mut rotated = ring.clone();
            rotated.rotate_left(k);
            let poly = Polygon::new(&rotated).unwrap();
            prop_assert!(poly.contains(q, false), "rotation {}", k);
            prop_assert!(poly.contains(q, true), "rotation {} omitting first edge", k);
        }
    }
}

// Free-form drags: a random walk with steps on the order of the tolerance.
fn drag_strategy() -> impl Strategy<Value = Vec<Point>> {
    (
        (-100.0f64..100.0, -100.0f64..100.0),
        prop::collection::vec((-6.0f64..6.0, -6.0f64..6.0), 0..60),
    )
        .prop_map(|((sx, sy), steps)| {
            let mut p = Point::new(sx, sy);
            let mut path = vec![p];
            for (dx, dy) in steps {
                p = Point::new(p.x + dx, p.y + dy);
                path.push(p);
            }
            path
        })
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 2_000, .. ProptestConfig::default() })]
    #[test]
    fn simplify_is_idempotent(path in drag_strategy()) {
        let once = simplify(&path, 1.5);
        let twice = simplify(&once, 1.5);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.first(), path.first());
        prop_assert_eq!(once.last(), path.last());
        prop_assert!(once.len() <= path.len());
    }
}

#[derive(Clone, Debug)]
enum StoreOp {
    Create { name: u8, seed: u64 },
    SaveBrush,
    Brush { seed: u64, wrong_len: bool },
    Reset { rows: usize },
    Remove { idx: u8 },
    Rename { idx: u8, name: u8 },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (0u8..4, any::<u64>()).prop_map(|(name, seed)| StoreOp::Create { name, seed }),
        Just(StoreOp::SaveBrush),
        (any::<u64>(), any::<bool>()).prop_map(|(seed, wrong_len)| StoreOp::Brush { seed, wrong_len }),
        (0usize..12).prop_map(|rows| StoreOp::Reset { rows }),
        any::<u8>().prop_map(|idx| StoreOp::Remove { idx }),
        (any::<u8>(), 0u8..4).prop_map(|(idx, name)| StoreOp::Rename { idx, name }),
    ]
}

const NAMES: [&str; 4] = ["Region", "Region_0", "a", "b"];

fn bits(seed: u64, len: usize) -> Vec<bool> {
    (0..len).map(|i| (seed >> (i % 64)) & 1 == 1).collect()
}

fn apply(store: &SelectionStore, op: StoreOp) -> SelectionStore {
    let rows = store.rows();
    match op {
        StoreOp::Create { name, seed } => {
            let req = NewSelection::new(NAMES[name as usize], bits(seed, rows));
            store.create_selection(req).map(|(s, _)| s).unwrap()
        }
        StoreOp::SaveBrush => store
            .create_selection(NewSelection::new("brush", MaskSource::Brush))
            .map(|(s, _)| s)
            .unwrap(),
        StoreOp::Brush { seed, wrong_len } => {
            let len = if wrong_len { rows + 1 } else { rows };
            store.update_brush_mask(bits(seed, len))
        }
        StoreOp::Reset { rows } => store.reset_for_new_dataset(rows),
        StoreOp::Remove { idx } => {
            if store.is_empty() {
                return store.clone();
            }
            store.remove(idx as usize % store.len()).unwrap()
        }
        StoreOp::Rename { idx, name } => {
            if store.is_empty() {
                return store.clone();
            }
            store.rename(idx as usize % store.len(), NAMES[name as usize]).unwrap()
        }
    }
}

fn policy_strategy() -> impl Strategy<Value = StalePolicy> {
    prop_oneof![Just(StalePolicy::Invalidate), Just(StalePolicy::Resize)]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 2_000, .. ProptestConfig::default() })]
    #[test]
    fn masks_track_row_count_and_names_stay_unique(
        policy in policy_strategy(),
        initial_rows in 0usize..12,
        ops in prop::collection::vec(store_op_strategy(), 1..40),
    ) {
        let cfg = LassoConfig { stale_policy: policy, ..LassoConfig::default() };
        let mut store = SelectionStore::with_rows(cfg, initial_rows);
        for op in ops {
            let prev = store.clone();
            store = apply(&store, op);
            let rows = store.rows();
            prop_assert_eq!(store.master().len(), rows);
            prop_assert_eq!(store.master().count(), rows);
            prop_assert_eq!(store.brush().len(), rows);
            for s in store.selections() {
                prop_assert_eq!(s.len(), rows, "selection '{}'", s.name);
            }
            let names: HashSet<&str> = store.selections().iter().map(|s| s.name.as_str()).collect();
            prop_assert_eq!(names.len(), store.len());
            // Earlier snapshots never change.
            prop_assert_eq!(prev.master().len(), prev.rows());
        }
    }
}

#[test]
fn duplicate_name_gets_zero_suffix() {
    let store = SelectionStore::with_rows(LassoConfig::default(), 1);
    let (store, a) = store.create_selection(NewSelection::new("sel", vec![true])).unwrap();
    let (_, b) = store.create_selection(NewSelection::new("sel", vec![false])).unwrap();
    assert_eq!(a.name, "sel");
    assert_eq!(b.name, "sel_0");
}

#[derive(Clone, Debug)]
enum RefOp {
    Retain,
    Release,
}

proptest! {
    #[test]
    fn references_never_drop_below_zero(
        auto_ref in any::<bool>(),
        ops in prop::collection::vec(prop_oneof![Just(RefOp::Retain), Just(RefOp::Release)], 0..60),
    ) {
        let mut lifetime = FeatureLifetime::new();
        lifetime.add_dataset("f", vec![1.0, 2.0], None, auto_ref);
        let mut model: u32 = u32::from(auto_ref);
        for op in ops {
            let got = match op {
                RefOp::Retain => {
                    model += 1;
                    lifetime.retain("f").unwrap()
                }
                RefOp::Release => {
                    model = model.saturating_sub(1);
                    lifetime.release("f").unwrap()
                }
            };
            prop_assert_eq!(got, model);
            prop_assert_eq!(lifetime.can_evict("f"), model == 0);
        }
    }
}

#[test]
fn release_at_zero_stays_zero() {
    let mut lifetime = FeatureLifetime::new();
    lifetime.add_dataset("f", vec![], None, false);
    assert_eq!(lifetime.release("f").unwrap(), 0);
    assert_eq!(lifetime.release("f").unwrap(), 0);
    assert_eq!(lifetime.references("f"), Some(0));
    assert!(lifetime.release("missing").is_err());
}
