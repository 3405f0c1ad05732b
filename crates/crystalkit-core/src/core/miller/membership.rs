use super::solver::distance_to_plane;
use crate::core::models::atom::Atom;
use crate::core::utils::geometry;
use nalgebra::Vector3;

/// Indices of the atoms lying within `tolerance` (Å) of the plane `normal · x = offset`.
///
/// The result is sorted ascending. A zero or non-finite normal, or a negative
/// tolerance, matches nothing.
pub fn atoms_on_plane(
    atoms: &[Atom],
    normal: &Vector3<f64>,
    offset: f64,
    tolerance: f64,
) -> Vec<usize> {
    plane_mask(atoms, normal, offset, tolerance)
        .into_iter()
        .enumerate()
        .filter_map(|(index, on_plane)| on_plane.then_some(index))
        .collect()
}

/// Per-atom membership flags, parallel to `atoms`.
///
/// `normal` is normalized first, so the plane is `n̂ · x = offset` exactly as
/// in [`clip_plane_to_box`](super::clipper::clip_plane_to_box).
pub fn plane_mask(atoms: &[Atom], normal: &Vector3<f64>, offset: f64, tolerance: f64) -> Vec<bool> {
    if !is_usable_normal(normal) || !offset.is_finite() || tolerance.is_nan() || tolerance < 0.0 {
        return vec![false; atoms.len()];
    }
    let unit = geometry::normalize(normal);
    atoms
        .iter()
        .map(|atom| distance_to_plane(&atom.position, &unit, offset).abs() <= tolerance)
        .collect()
}

fn is_usable_normal(normal: &Vector3<f64>) -> bool {
    geometry::is_finite(normal) && geometry::magnitude(normal) > 0.0
}
