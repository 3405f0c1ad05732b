use nalgebra::Point3;
use serde::Serialize;

/// A lattice site produced by expanding a structure's basis over a block of cells.
///
/// Atoms are created once per lattice generation and never mutated afterwards;
/// consumers index into the returned list (e.g. for plane highlighting).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atom {
    /// Absolute Cartesian position in Ångström, relative to the block centre.
    pub position: Point3<f64>,
    /// `true` if the generating cell touches a face of the repeated block.
    ///
    /// This is a rendering hint only; it says nothing about coordination.
    pub is_edge: bool,
    /// Index into the structure's basis of the motif atom that produced this site.
    pub basis_index: usize,
    /// Integer offset `(i, j, k)` of the generating cell.
    pub cell: [usize; 3],
    /// Species label copied from the basis atom, if any.
    pub species: Option<String>,
}

/// An unordered pair of atom positions closer than the structure's bond cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bond {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Bond {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        nalgebra::distance(&self.start, &self.end)
    }

    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.start, &self.end)
    }
}
