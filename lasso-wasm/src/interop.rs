use js_sys::{Float64Array, Object, Reflect, Uint32Array, Uint8Array};
use lasso::Point;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_f64(slice: &[f64]) -> Float64Array {
    let arr = Float64Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}

// Masks cross the boundary as one byte per row, 0 or 1.
pub fn mask_to_u8(mask: &[bool]) -> Uint8Array {
    let bytes: Vec<u8> = mask.iter().map(|&m| m as u8).collect();
    let arr = Uint8Array::new_with_length(bytes.len() as u32);
    arr.copy_from(&bytes); arr
}
pub fn mask_from_u8(arr: &Uint8Array) -> Vec<bool> {
    arr.to_vec().into_iter().map(|b| b != 0).collect()
}

pub fn indices_to_u32(indices: &[usize]) -> Uint32Array {
    let v: Vec<u32> = indices.iter().map(|&i| i as u32).collect();
    arr_u32(&v)
}

/// Interleaved `[x0, y0, x1, y1, ...]`; a trailing odd value is ignored.
pub fn points_from_f64(arr: &Float64Array) -> Vec<Point> {
    arr.to_vec().chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect()
}
pub fn points_to_f64(points: &[Point]) -> Float64Array {
    let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    arr_f64(&flat)
}
