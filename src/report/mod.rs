pub mod json;
pub mod text;

use crate::input::na::MISSING;

pub fn fmt_f64(v: f64) -> String {
    if v.is_finite() {
        format!("{:.6}", v)
    } else {
        MISSING.to_string()
    }
}

pub fn fmt_opt<T: ToString>(v: Option<T>) -> String {
    v.map_or_else(|| MISSING.to_string(), |x| x.to_string())
}

pub fn fmt_opt_f64(v: Option<f64>) -> String {
    v.map_or_else(|| MISSING.to_string(), fmt_f64)
}
