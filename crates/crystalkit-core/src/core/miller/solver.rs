use crate::core::models::plane::Plane;
use crate::core::models::structure::{LatticeVectors, StructureError, check_lattice_constant};
use crate::core::utils::geometry;
use crate::engine::config::KernelConfig;
use nalgebra::{Point3, Vector3};

pub fn compute_plane(
    h: i32,
    k: i32,
    l: i32,
    vectors: &LatticeVectors,
    lattice_constant: f64,
) -> Result<Plane, StructureError> {
    compute_plane_with(h, k, l, vectors, lattice_constant, &KernelConfig::default())
}

/// Solves the `(h k l)` plane family of the lattice `vectors · lattice_constant`.
///
/// Uses the general reciprocal construction `b1 = (a2 × a3) / V` (and cyclic),
/// so oblique and hexagonal cells are handled exactly. When `|G|` vanishes
/// (e.g. all-zero indices) the result is [`Plane::none`]: infinite spacing and
/// a zero normal.
///
/// # Errors
///
/// Fails for an invalid lattice constant, non-finite vectors, or a cell whose
/// volume in units of `a³` is below `config.volume_epsilon`. This is the same
/// test [`Structure::validate`](crate::core::models::structure::Structure::validate)
/// applies, so the verdict does not depend on the lattice constant.
pub fn compute_plane_with(
    h: i32,
    k: i32,
    l: i32,
    vectors: &LatticeVectors,
    lattice_constant: f64,
    config: &KernelConfig,
) -> Result<Plane, StructureError> {
    check_lattice_constant(lattice_constant)?;
    let [b1, b2, b3] = vectors.reciprocal(config.volume_epsilon)?;

    // Reciprocal of the scaled lattice is the unit-cell reciprocal over `a`.
    let g = [(h, b1), (k, b2), (l, b3)]
        .iter()
        .fold(Vector3::zeros(), |acc, (index, b)| {
            geometry::add(&acc, &geometry::scale(b, *index as f64))
        });
    let g = geometry::scale(&g, 1.0 / lattice_constant);

    let length = geometry::magnitude(&g);
    if length < config.reciprocal_epsilon {
        return Ok(Plane::none(g));
    }

    Ok(Plane {
        normal: geometry::normalize(&g),
        d_spacing: 1.0 / length,
        reciprocal: g,
    })
}

/// Signed distance of `point` from the plane `normal · x = offset`.
///
/// Positive on the side the normal points to.
pub fn distance_to_plane(point: &Point3<f64>, normal: &Vector3<f64>, offset: f64) -> f64 {
    geometry::dot(&point.coords, normal) - offset
}
