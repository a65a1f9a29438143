use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

pub use api::{indices_within_rectangle_res, indices_within_res, set_panic_hook, simplify_path, simplify_path_res};

/// Dataset, feature list and selections behind one handle. Each call
/// replaces the held snapshot with the next one.
#[wasm_bindgen]
pub struct Selections { pub(crate) inner: lasso::DataState }

/// Streaming simplifier for a lasso that is still being drawn.
#[wasm_bindgen]
pub struct Lasso { pub(crate) inner: lasso::PathSimplifier }

impl Selections {
    pub fn rs_new(config: lasso::LassoConfig) -> Selections { Selections { inner: lasso::DataState::new(config) } }
}
