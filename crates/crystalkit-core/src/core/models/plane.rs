use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Miller indices of a lattice plane plus the caller's display settings.
///
/// `offset` shifts the plane along its normal in multiples of the d-spacing.
/// `opacity` and `visible` are not used by any geometry routine; they are
/// carried so a renderer receives them next to the computed section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MillerIndices {
    pub h: i32,
    pub k: i32,
    pub l: i32,
    pub offset: f64,
    pub opacity: f32,
    pub visible: bool,
}

impl Default for MillerIndices {
    fn default() -> Self {
        Self {
            h: 0,
            k: 0,
            l: 0,
            offset: 0.0,
            opacity: 0.5,
            visible: true,
        }
    }
}

impl MillerIndices {
    pub fn new(h: i32, k: i32, l: i32) -> Self {
        Self {
            h,
            k,
            l,
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// A plane is active only when at least one index is non-zero.
    pub fn is_active(&self) -> bool {
        self.h != 0 || self.k != 0 || self.l != 0
    }
}

/// Geometry of the family of lattice planes `(h k l)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Plane {
    /// Unit normal, or the zero vector when no plane exists.
    pub normal: Vector3<f64>,
    /// Interplanar spacing in Ångström; `f64::INFINITY` when no plane exists.
    pub d_spacing: f64,
    /// Reciprocal lattice vector `G = h·b1 + k·b2 + l·b3`.
    pub reciprocal: Vector3<f64>,
}

impl Plane {
    pub fn none(reciprocal: Vector3<f64>) -> Self {
        Self {
            normal: Vector3::zeros(),
            d_spacing: f64::INFINITY,
            reciprocal,
        }
    }

    pub fn is_renderable(&self) -> bool {
        self.d_spacing.is_finite() && self.normal != Vector3::zeros()
    }

    /// Absolute offset from the origin of the plane `multiple` spacings out.
    pub fn offset_at(&self, multiple: f64) -> f64 {
        if self.is_renderable() {
            multiple * self.d_spacing
        } else {
            0.0
        }
    }
}

/// A convex planar polygon, ordered so that it can be drawn both as a
/// triangle fan from vertex 0 and as a closed outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClippedPolygon {
    pub vertices: Vec<Point3<f64>>,
}

impl ClippedPolygon {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// The vertices followed by a copy of the first one.
    pub fn edge_loop(&self) -> Vec<Point3<f64>> {
        let mut closed = self.vertices.clone();
        if let Some(first) = self.vertices.first() {
            closed.push(*first);
        }
        closed
    }

    /// Index triples of a fan anchored at vertex 0.
    pub fn triangle_fan(&self) -> Vec<[usize; 3]> {
        (1..self.vertices.len().saturating_sub(1))
            .map(|i| [0, i, i + 1])
            .collect()
    }

    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / self.vertices.len() as f64))
    }

    pub fn area(&self) -> f64 {
        let Some(origin) = self.vertices.first() else {
            return 0.0;
        };
        self.triangle_fan()
            .iter()
            .map(|&[_, i, j]| {
                let u = self.vertices[i] - origin;
                let v = self.vertices[j] - origin;
                u.cross(&v)
            })
            .fold(Vector3::zeros(), |acc, n| acc + n)
            .norm()
            / 2.0
    }
}
