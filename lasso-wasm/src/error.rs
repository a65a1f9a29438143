use js_sys::{Object, Reflect};
use lasso::LassoError;
use wasm_bindgen::prelude::*;

fn set_kv(obj: &Object, k: &str, v: &JsValue) { let _ = Reflect::set(obj, &JsValue::from_str(k), v); }

fn new_obj() -> Object { Object::new() }

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f64, max: f64, got: f64) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min));
    set_kv(&d, "max", &JsValue::from_f64(max));
    set_kv(&d, "got", &JsValue::from_f64(got));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_json(message: impl Into<String>) -> JsValue { err("invalid_json", message, None) }

/// Envelope for a core error, with the offending values under `data`.
pub fn from_lasso(e: &LassoError) -> JsValue {
    let d = new_obj();
    match e {
        LassoError::LengthMismatch { expected, got } => {
            set_kv(&d, "expected", &JsValue::from_f64(*expected as f64));
            set_kv(&d, "got", &JsValue::from_f64(*got as f64));
        }
        LassoError::IndexOutOfRange { index, len } => {
            set_kv(&d, "index", &JsValue::from_f64(*index as f64));
            set_kv(&d, "len", &JsValue::from_f64(*len as f64));
        }
        LassoError::NotFound(name) => set_kv(&d, "name", &JsValue::from_str(name)),
        LassoError::InvalidPolygon(_) | LassoError::InvalidPermutation(_) | LassoError::InvalidSnapshot(_) => {
            return err(e.code(), e.to_string(), None);
        }
    }
    err(e.code(), e.to_string(), Some(d.into()))
}

/// Wrap a core result, converting the success value with `f`.
pub fn from_result<T>(r: lasso::Result<T>, f: impl FnOnce(T) -> JsValue) -> JsValue {
    match r {
        Ok(v) => ok(f(v)),
        Err(e) => from_lasso(&e),
    }
}
