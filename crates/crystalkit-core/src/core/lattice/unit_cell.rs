use crate::core::models::structure::{Structure, StructureError, check_lattice_constant};
use nalgebra::{Point3, Vector3};
use serde::Serialize;

/// Corner pairs of the 12 parallelepiped edges.
///
/// Corner `c` sits at `Σ bit_i(c) · a_i`, so every edge joins two corners whose
/// indices differ in exactly one bit.
pub const UNIT_CELL_EDGES: [[usize; 2]; 12] = [
    // along a1
    [0, 1],
    [2, 3],
    [4, 5],
    [6, 7],
    // along a2
    [0, 2],
    [1, 3],
    [4, 6],
    [5, 7],
    // along a3
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitCell {
    pub corners: [Point3<f64>; 8],
    pub edges: [[usize; 2]; 12],
}

impl UnitCell {
    pub fn edge_segments(&self) -> Vec<(Point3<f64>, Point3<f64>)> {
        self.edges
            .iter()
            .map(|&[from, to]| (self.corners[from], self.corners[to]))
            .collect()
    }

    pub fn translated(&self, by: &Vector3<f64>) -> Self {
        Self {
            corners: self.corners.map(|c| c + *by),
            edges: self.edges,
        }
    }
}

/// Wireframe of the conventional cell spanned by the scaled lattice vectors from the origin.
///
/// # Errors
///
/// Fails for a non-positive or non-finite lattice constant, or a lattice
/// vector with a non-finite component.
pub fn generate_unit_cell(
    structure: &Structure,
    lattice_constant: f64,
) -> Result<UnitCell, StructureError> {
    check_lattice_constant(lattice_constant)?;
    structure.vectors.check_finite()?;
    let vectors = structure.vectors.scaled(lattice_constant).as_array();
    let corners = std::array::from_fn(|c| {
        let mut corner = Point3::origin();
        for (bit, v) in vectors.iter().enumerate() {
            if c & (1 << bit) != 0 {
                corner += *v;
            }
        }
        corner
    });
    Ok(UnitCell {
        corners,
        edges: UNIT_CELL_EDGES,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;

    #[test]
    fn cubic_cell_corners_are_scaled_unit_cube() {
        let sc = catalog::structure("sc").unwrap();
        let cell = generate_unit_cell(&sc, 2.0).unwrap();
        assert_eq!(cell.corners[0], Point3::origin());
        assert_eq!(cell.corners[1], Point3::new(2.0, 0.0, 0.0));
        assert_eq!(cell.corners[6], Point3::new(0.0, 2.0, 2.0));
        assert_eq!(cell.corners[7], Point3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn every_edge_connects_corners_differing_in_one_vector() {
        for [a, b] in UNIT_CELL_EDGES {
            assert_eq!((a ^ b).count_ones(), 1);
            assert!(a < b);
        }
        let mut sorted = UNIT_CELL_EDGES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 12);
    }

    #[test]
    fn hexagonal_edges_have_lattice_vector_lengths() {
        let hcp = catalog::structure("hcp").unwrap();
        let a = 3.21;
        let cell = generate_unit_cell(&hcp, a).unwrap();
        let lengths: Vec<f64> = cell
            .edge_segments()
            .iter()
            .map(|(p, q)| nalgebra::distance(p, q))
            .collect();
        for l in &lengths[..8] {
            assert!((l - a).abs() < 1e-9);
        }
        for l in &lengths[8..] {
            assert!((l - a * hcp.vectors.a3.norm()).abs() < 1e-9);
        }
    }

    #[test]
    fn translated_moves_corners_and_keeps_edges() {
        let sc = catalog::structure("sc").unwrap();
        let cell = generate_unit_cell(&sc, 1.0).unwrap();
        let moved = cell.translated(&Vector3::new(-0.5, -0.5, -0.5));
        assert_eq!(moved.corners[0], Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(moved.corners[7], Point3::new(0.5, 0.5, 0.5));
        assert_eq!(moved.edges, cell.edges);
    }

    #[test]
    fn non_finite_lattice_vector_is_rejected() {
        let mut sc = catalog::structure("sc").unwrap();
        sc.vectors.a2 = Vector3::new(0.0, f64::NAN, 0.0);
        assert_eq!(
            generate_unit_cell(&sc, 2.0),
            Err(StructureError::NonFiniteVector { index: 2 })
        );
    }

    #[test]
    fn invalid_lattice_constant_is_rejected() {
        let sc = catalog::structure("sc").unwrap();
        for a in [f64::NAN, -3.0, 0.0] {
            assert!(matches!(
                generate_unit_cell(&sc, a),
                Err(StructureError::InvalidLatticeConstant(_))
            ));
        }
    }
}
