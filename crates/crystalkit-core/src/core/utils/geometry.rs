use nalgebra::{Point3, Vector3};

pub fn cross(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a.cross(b)
}

pub fn dot(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b)
}

pub fn scale(v: &Vector3<f64>, s: f64) -> Vector3<f64> {
    v * s
}

pub fn add(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a + b
}

pub fn magnitude(v: &Vector3<f64>) -> f64 {
    v.norm()
}

/// Returns the unit vector along `v`, or the zero vector when `v` has zero length.
///
/// A zero normal is how the Miller solver signals "no plane", so normalizing it
/// must stay total instead of producing NaN components.
pub fn normalize(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}

pub fn is_finite(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Integer key of `p` on a grid of spacing `quantum`.
///
/// Two positions closer than roughly `quantum / 2` along every axis map to the
/// same key, which lets atoms shared by neighbouring cells be merged through a
/// hash map instead of floating-point equality.
pub fn quantize(p: &Point3<f64>, quantum: f64) -> (i64, i64, i64) {
    let q = |c: f64| (c / quantum).round() as i64;
    (q(p.x), q(p.y), q(p.z))
}
