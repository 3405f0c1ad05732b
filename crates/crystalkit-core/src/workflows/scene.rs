use crate::core::io::structures::StructureCatalog;
use crate::core::lattice::bonds::{BondSet, generate_bonds_with};
use crate::core::lattice::points::{block_center, generate_lattice_with};
use crate::core::lattice::unit_cell::{UnitCell, generate_unit_cell};
use crate::core::miller::clipper::clip_plane_to_box_with;
use crate::core::miller::membership::atoms_on_plane;
use crate::core::miller::solver::compute_plane_with;
use crate::core::models::atom::Atom;
use crate::core::models::plane::{ClippedPolygon, MillerIndices, Plane};
use crate::core::models::structure::Structure;
use crate::engine::config::KernelConfig;
use crate::engine::error::KernelError;
use serde::Serialize;
use tracing::{debug, info, instrument};

const DEFAULT_MEMBERSHIP_TOLERANCE: f64 = 0.1;

/// Everything needed to lay out one crystal view.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRequest {
    pub structure: Structure,
    /// Cells per axis; must be at least 1.
    pub repeat: usize,
    /// Overrides the structure's default lattice constant (Å).
    pub lattice_constant: Option<f64>,
    pub planes: Vec<MillerIndices>,
    /// Half-size (Å) of the cube planes are clipped to. Derived from the block size when `None`.
    pub box_half_extent: Option<f64>,
    /// Distance (Å) within which an atom counts as lying on a plane.
    pub membership_tolerance: f64,
}

impl SceneRequest {
    pub fn new(structure: Structure) -> Self {
        Self {
            structure,
            repeat: 1,
            lattice_constant: None,
            planes: Vec::new(),
            box_half_extent: None,
            membership_tolerance: DEFAULT_MEMBERSHIP_TOLERANCE,
        }
    }

    /// Starts a request for a structure looked up by id, custom definitions first.
    pub fn from_catalog(id: &str, catalog: &StructureCatalog) -> Result<Self, KernelError> {
        catalog
            .get(id)
            .map(Self::new)
            .ok_or_else(|| KernelError::UnknownStructure(id.to_string()))
    }

    pub fn with_repeat(mut self, repeat: usize) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_lattice_constant(mut self, lattice_constant: f64) -> Self {
        self.lattice_constant = Some(lattice_constant);
        self
    }

    pub fn with_plane(mut self, indices: MillerIndices) -> Self {
        self.planes.push(indices);
        self
    }

    pub fn with_box_half_extent(mut self, half_extent: f64) -> Self {
        self.box_half_extent = Some(half_extent);
        self
    }

    pub fn with_membership_tolerance(mut self, tolerance: f64) -> Self {
        self.membership_tolerance = tolerance;
        self
    }

    pub fn effective_lattice_constant(&self) -> f64 {
        self.lattice_constant
            .unwrap_or(self.structure.default_lattice_constant)
    }
}

/// One requested plane, solved and sectioned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaneSection {
    pub indices: MillerIndices,
    pub plane: Plane,
    /// Absolute distance (Å) of the plane from the block centre along its normal.
    pub offset: f64,
    /// Empty when the plane misses the box or is hidden.
    pub polygon: ClippedPolygon,
    /// Sorted indices into [`LatticeScene::atoms`].
    pub highlighted: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatticeScene {
    pub lattice_constant: f64,
    pub box_half_extent: f64,
    pub atoms: Vec<Atom>,
    pub bonds: BondSet,
    /// Cell at the corner of the block, so it overlays the generated atoms.
    pub unit_cell: UnitCell,
    pub sections: Vec<PlaneSection>,
}

/// Builds atoms, bonds, the unit cell and every requested plane section.
///
/// Planes whose indices are all zero (or otherwise have no finite spacing) are
/// left out of [`LatticeScene::sections`]. Hidden planes are solved but get an
/// empty polygon and no highlighted atoms.
///
/// # Errors
///
/// Returns an error if `config` is invalid, if `repeat` is zero, or if the
/// structure or lattice constant fails validation.
#[instrument(skip_all, name = "scene_workflow", fields(structure = %request.structure.id))]
pub fn build(request: &SceneRequest, config: &KernelConfig) -> Result<LatticeScene, KernelError> {
    config.validate()?;
    let structure = &request.structure;
    let lattice_constant = request.effective_lattice_constant();
    info!(
        repeat = request.repeat,
        lattice_constant,
        planes = request.planes.len(),
        "Building lattice scene."
    );

    let atoms = generate_lattice_with(structure, request.repeat, lattice_constant, config)?;
    let bonds = generate_bonds_with(&atoms, structure, lattice_constant, config)?;

    let scaled = structure.vectors.scaled(lattice_constant);
    let origin_corner = -block_center(&scaled.as_array(), request.repeat);
    let unit_cell = generate_unit_cell(structure, lattice_constant)?.translated(&origin_corner);

    let box_half_extent = request
        .box_half_extent
        .unwrap_or_else(|| 0.5 * request.repeat as f64 * scaled.longest_length());

    let mut sections = Vec::with_capacity(request.planes.len());
    for indices in &request.planes {
        let plane = compute_plane_with(
            indices.h,
            indices.k,
            indices.l,
            &structure.vectors,
            lattice_constant,
            config,
        )?;
        if !plane.is_renderable() {
            debug!(
                h = indices.h,
                k = indices.k,
                l = indices.l,
                "Skipping plane with no finite spacing."
            );
            continue;
        }

        let offset = plane.offset_at(indices.offset);
        let (polygon, highlighted) = if indices.visible {
            (
                clip_plane_to_box_with(&plane.normal, offset, box_half_extent, config),
                atoms_on_plane(&atoms, &plane.normal, offset, request.membership_tolerance),
            )
        } else {
            (ClippedPolygon::empty(), Vec::new())
        };

        sections.push(PlaneSection {
            indices: *indices,
            plane,
            offset,
            polygon,
            highlighted,
        });
    }

    info!(
        atoms = atoms.len(),
        bonds = bonds.bonds.len(),
        sections = sections.len(),
        "Lattice scene complete."
    );

    Ok(LatticeScene {
        lattice_constant,
        box_half_extent,
        atoms,
        bonds,
        unit_cell,
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;
    use crate::core::lattice::points::LatticeError;
    use crate::core::models::structure::StructureError;
    use nalgebra::Point3;

    fn request(id: &str) -> SceneRequest {
        SceneRequest::from_catalog(id, &StructureCatalog::new()).unwrap()
    }

    #[test]
    fn simple_cubic_scene_highlights_one_layer() {
        let req = request("sc")
            .with_repeat(3)
            .with_lattice_constant(1.0)
            .with_plane(MillerIndices::new(1, 0, 0).with_offset(-0.5));
        let scene = build(&req, &KernelConfig::default()).unwrap();

        assert_eq!(scene.atoms.len(), 27);
        assert_eq!(scene.bonds.bonds.len(), 54);
        assert!((scene.box_half_extent - 1.5).abs() < 1e-12);

        let section = &scene.sections[0];
        assert!((section.offset + 0.5).abs() < 1e-12);
        assert_eq!(section.highlighted.len(), 9);
        assert_eq!(section.polygon.len(), 4);
        assert!((section.polygon.area() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn unit_cell_sits_at_block_origin_corner() {
        let req = request("sc").with_repeat(3).with_lattice_constant(2.0);
        let scene = build(&req, &KernelConfig::default()).unwrap();
        assert_eq!(scene.unit_cell.corners[0], Point3::new(-3.0, -3.0, -3.0));
        assert_eq!(scene.unit_cell.corners[7], Point3::new(-1.0, -1.0, -1.0));

        let lowest = scene
            .atoms
            .iter()
            .map(|a| a.position)
            .fold(Point3::new(f64::MAX, f64::MAX, f64::MAX), |m, p| {
                Point3::new(m.x.min(p.x), m.y.min(p.y), m.z.min(p.z))
            });
        assert!((lowest - scene.unit_cell.corners[0]).norm() < 1e-12);
    }

    #[test]
    fn default_lattice_constant_comes_from_structure() {
        let scene = build(&request("fcc"), &KernelConfig::default()).unwrap();
        let fcc = catalog::structure("fcc").unwrap();
        assert_eq!(scene.lattice_constant, fcc.default_lattice_constant);
        assert_eq!(scene.atoms.len(), 4);
    }

    #[test]
    fn zero_indices_are_skipped() {
        let req = request("bcc")
            .with_plane(MillerIndices::new(0, 0, 0))
            .with_plane(MillerIndices::new(1, 1, 0));
        let scene = build(&req, &KernelConfig::default()).unwrap();
        assert_eq!(scene.sections.len(), 1);
        assert_eq!(scene.sections[0].indices, MillerIndices::new(1, 1, 0));
    }

    #[test]
    fn hidden_plane_is_solved_but_not_clipped() {
        let mut hidden = MillerIndices::new(1, 1, 1);
        hidden.visible = false;
        hidden.opacity = 0.2;
        let req = request("fcc").with_repeat(2).with_plane(hidden);
        let scene = build(&req, &KernelConfig::default()).unwrap();

        let section = &scene.sections[0];
        assert!(section.plane.is_renderable());
        assert!(section.polygon.is_empty());
        assert!(section.highlighted.is_empty());
        assert_eq!(section.indices.opacity, 0.2);
    }

    #[test]
    fn explicit_box_half_extent_limits_polygon() {
        let req = request("sc")
            .with_repeat(4)
            .with_lattice_constant(1.0)
            .with_box_half_extent(0.5)
            .with_plane(MillerIndices::new(0, 0, 1));
        let scene = build(&req, &KernelConfig::default()).unwrap();
        assert!((scene.sections[0].polygon.area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_catalog_id_is_reported() {
        let result = SceneRequest::from_catalog("perovskite", &StructureCatalog::new());
        assert!(matches!(result, Err(KernelError::UnknownStructure(id)) if id == "perovskite"));
    }

    #[test]
    fn zero_repeat_is_reported() {
        let result = build(&request("sc").with_repeat(0), &KernelConfig::default());
        assert!(matches!(
            result,
            Err(KernelError::Lattice {
                source: LatticeError::InvalidRepeat
            })
        ));
    }

    #[test]
    fn non_finite_lattice_constant_is_reported() {
        let req = request("sc").with_lattice_constant(f64::NAN);
        let result = build(&req, &KernelConfig::default());
        assert!(matches!(
            result,
            Err(KernelError::Lattice {
                source: LatticeError::Structure(StructureError::InvalidLatticeConstant(_))
            })
        ));
    }

    #[test]
    fn invalid_config_is_rejected_before_any_work() {
        let config = KernelConfig {
            dedup_tolerance: -1.0,
            ..KernelConfig::default()
        };
        let result = build(&request("sc"), &config);
        assert!(matches!(result, Err(KernelError::Config { .. })));
    }
}
