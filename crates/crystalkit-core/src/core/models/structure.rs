use crate::core::utils::geometry;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a structure definition cannot be turned into geometry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StructureError {
    #[error("Invalid lattice definition: lattice vector a{index} has a non-finite component")]
    NonFiniteVector { index: usize },

    #[error("Invalid lattice definition: basis atom {index} has a non-finite coordinate")]
    NonFiniteBasis { index: usize },

    #[error("Structure '{id}' has an empty basis")]
    EmptyBasis { id: String },

    #[error("Lattice constant must be positive and finite, got {0}")]
    InvalidLatticeConstant(f64),

    #[error("Degenerate lattice: cell volume {volume:e} is too close to zero")]
    DegenerateLattice { volume: f64 },
}

/// One atom of the unit-cell motif, in fractional coordinates of the cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisAtom {
    /// Fractional coordinates, nominally in `[0, 1)`.
    pub position: Vector3<f64>,
    /// Optional species label (e.g. "Na"), carried through to generated atoms.
    #[serde(default)]
    pub species: Option<String>,
}

impl BasisAtom {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            species: None,
        }
    }

    pub fn with_species(mut self, species: &str) -> Self {
        self.species = Some(species.to_string());
        self
    }
}

/// The three primitive translations `a1, a2, a3`, in units of the lattice constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Vector3<f64>; 3]", into = "[Vector3<f64>; 3]")]
pub struct LatticeVectors {
    pub a1: Vector3<f64>,
    pub a2: Vector3<f64>,
    pub a3: Vector3<f64>,
}

impl From<[Vector3<f64>; 3]> for LatticeVectors {
    fn from([a1, a2, a3]: [Vector3<f64>; 3]) -> Self {
        Self { a1, a2, a3 }
    }
}

impl From<LatticeVectors> for [Vector3<f64>; 3] {
    fn from(v: LatticeVectors) -> Self {
        [v.a1, v.a2, v.a3]
    }
}

impl LatticeVectors {
    pub fn new(a1: Vector3<f64>, a2: Vector3<f64>, a3: Vector3<f64>) -> Self {
        Self { a1, a2, a3 }
    }

    pub fn cubic() -> Self {
        Self::new(Vector3::x(), Vector3::y(), Vector3::z())
    }

    pub fn as_array(&self) -> [Vector3<f64>; 3] {
        (*self).into()
    }

    /// Multiplies every vector by the lattice constant `a`.
    pub fn scaled(&self, a: f64) -> Self {
        Self::new(
            geometry::scale(&self.a1, a),
            geometry::scale(&self.a2, a),
            geometry::scale(&self.a3, a),
        )
    }

    /// Signed cell volume, the scalar triple product `a1 · (a2 × a3)`.
    pub fn volume(&self) -> f64 {
        geometry::dot(&self.a1, &geometry::cross(&self.a2, &self.a3))
    }

    /// Maps fractional coordinates to Cartesian ones.
    pub fn to_cartesian(&self, frac: &Vector3<f64>) -> Point3<f64> {
        Point3::from(self.a1 * frac.x + self.a2 * frac.y + self.a3 * frac.z)
    }

    /// Returns `(b1, b2, b3)` with `bi · aj = δij` (no 2π factor).
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::NonFiniteVector`] for NaN/∞ input and
    /// [`StructureError::DegenerateLattice`] when `|V| < volume_epsilon`.
    pub fn reciprocal(&self, volume_epsilon: f64) -> Result<[Vector3<f64>; 3], StructureError> {
        self.check_finite()?;
        let volume = self.volume();
        if !volume.is_finite() || volume.abs() < volume_epsilon {
            return Err(StructureError::DegenerateLattice { volume });
        }
        let b1 = geometry::scale(&geometry::cross(&self.a2, &self.a3), 1.0 / volume);
        let b2 = geometry::scale(&geometry::cross(&self.a3, &self.a1), 1.0 / volume);
        let b3 = geometry::scale(&geometry::cross(&self.a1, &self.a2), 1.0 / volume);
        Ok([b1, b2, b3])
    }

    pub fn longest_length(&self) -> f64 {
        self.as_array()
            .iter()
            .map(geometry::magnitude)
            .fold(0.0, f64::max)
    }

    pub(crate) fn check_finite(&self) -> Result<(), StructureError> {
        match self
            .as_array()
            .iter()
            .position(|v| !geometry::is_finite(v))
        {
            Some(i) => Err(StructureError::NonFiniteVector { index: i + 1 }),
            None => Ok(()),
        }
    }
}

/// A crystal structure definition: a motif repeated on a lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Structure {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub basis: Vec<BasisAtom>,
    /// Lattice vectors in units of the lattice constant.
    pub vectors: LatticeVectors,
    /// Lattice constant in Ångström used when the caller does not pick one.
    pub default_lattice_constant: f64,
}

impl Structure {
    /// Checks that the definition can produce geometry: finite values, a
    /// non-empty basis, a positive default constant and a non-degenerate cell.
    pub fn validate(&self, volume_epsilon: f64) -> Result<(), StructureError> {
        if self.basis.is_empty() {
            return Err(StructureError::EmptyBasis {
                id: self.id.clone(),
            });
        }
        if let Some(index) = self
            .basis
            .iter()
            .position(|b| !geometry::is_finite(&b.position))
        {
            return Err(StructureError::NonFiniteBasis { index });
        }
        check_lattice_constant(self.default_lattice_constant)?;
        self.vectors.reciprocal(volume_epsilon).map(|_| ())
    }
}

pub(crate) fn check_lattice_constant(a: f64) -> Result<(), StructureError> {
    if a.is_finite() && a > 0.0 {
        Ok(())
    } else {
        Err(StructureError::InvalidLatticeConstant(a))
    }
}
