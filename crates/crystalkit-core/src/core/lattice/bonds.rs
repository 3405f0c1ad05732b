use crate::core::catalog;
use crate::core::models::atom::{Atom, Bond};
use crate::core::models::structure::{Structure, StructureError, check_lattice_constant};
use crate::engine::config::KernelConfig;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

#[cfg(not(feature = "parallel"))]
use itertools::Itertools;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The distance below which two atoms are considered bonded, and where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BondCutoff {
    /// First-shell multiplier from the built-in table, inflated by the bond tolerance.
    Tabulated { multiplier: f64, distance: f64 },
    /// The structure id is not in the table; the lattice constant itself is used.
    Generic { distance: f64 },
}

impl BondCutoff {
    pub fn distance(&self) -> f64 {
        match *self {
            BondCutoff::Tabulated { distance, .. } | BondCutoff::Generic { distance } => distance,
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, BondCutoff::Generic { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BondSet {
    pub bonds: Vec<Bond>,
    pub cutoff: BondCutoff,
}

/// Cutoff for `structure_id` at lattice constant `lattice_constant`.
///
/// # Errors
///
/// Returns [`StructureError::InvalidLatticeConstant`] unless the constant is
/// positive and finite.
pub fn bond_cutoff(
    structure_id: &str,
    lattice_constant: f64,
    config: &KernelConfig,
) -> Result<BondCutoff, StructureError> {
    check_lattice_constant(lattice_constant)?;
    let cutoff = match catalog::first_shell_multiplier(structure_id) {
        Some(multiplier) => BondCutoff::Tabulated {
            multiplier,
            distance: lattice_constant * multiplier * config.bond_tolerance_factor,
        },
        None => {
            warn!(
                structure = structure_id,
                cutoff = lattice_constant,
                "Unknown structure: using generic cutoff equal to the lattice constant."
            );
            BondCutoff::Generic {
                distance: lattice_constant,
            }
        }
    };
    Ok(cutoff)
}

pub fn generate_bonds(
    atoms: &[Atom],
    structure: &Structure,
    lattice_constant: f64,
) -> Result<BondSet, StructureError> {
    generate_bonds_with(atoms, structure, lattice_constant, &KernelConfig::default())
}

/// Connects every pair of atoms whose distance lies in `(min_bond_distance, cutoff]`.
///
/// Bonds are emitted in ascending `(i, j)` order of atom indices with `i < j`,
/// whichever search strategy is used.
///
/// # Errors
///
/// Fails for a non-positive or non-finite lattice constant.
#[instrument(skip_all, name = "bond_generation", fields(structure = %structure.id, atoms = atoms.len()))]
pub fn generate_bonds_with(
    atoms: &[Atom],
    structure: &Structure,
    lattice_constant: f64,
    config: &KernelConfig,
) -> Result<BondSet, StructureError> {
    let cutoff = bond_cutoff(&structure.id, lattice_constant, config)?;
    let range = BondRange {
        lower: config.min_bond_distance,
        upper: cutoff.distance(),
    };

    let pairs = if !(range.upper.is_finite() && range.upper > range.lower) {
        Vec::new()
    } else if atoms.len() > config.grid_search_threshold {
        grid_pairs(atoms, range)
    } else {
        all_pairs(atoms, range)
    };

    let bonds: Vec<Bond> = pairs
        .into_iter()
        .map(|(i, j)| Bond::new(atoms[i].position, atoms[j].position))
        .collect();

    debug!(bonds = bonds.len(), cutoff = cutoff.distance(), "Bonds generated.");
    Ok(BondSet { bonds, cutoff })
}

#[derive(Debug, Clone, Copy)]
struct BondRange {
    lower: f64,
    upper: f64,
}

impl BondRange {
    fn admits(&self, a: &Atom, b: &Atom) -> bool {
        let d = nalgebra::distance(&a.position, &b.position);
        d > self.lower && d <= self.upper
    }
}

#[cfg(not(feature = "parallel"))]
fn all_pairs(atoms: &[Atom], range: BondRange) -> Vec<(usize, usize)> {
    (0..atoms.len())
        .tuple_combinations()
        .filter(|&(i, j)| range.admits(&atoms[i], &atoms[j]))
        .collect()
}

#[cfg(feature = "parallel")]
fn all_pairs(atoms: &[Atom], range: BondRange) -> Vec<(usize, usize)> {
    let n = atoms.len();
    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            (i + 1..n)
                .filter(move |&j| range.admits(&atoms[i], &atoms[j]))
                .map(move |j| (i, j))
        })
        .collect()
}

/// Uniform-grid neighbour search with cells one cutoff wide.
///
/// Any admitted pair sits in the same or an adjacent cell, so scanning the
/// 27-cell stencil finds exactly the pairs the exhaustive scan finds.
fn grid_pairs(atoms: &[Atom], range: BondRange) -> Vec<(usize, usize)> {
    let edge = range.upper;
    let origin = atoms.iter().fold([f64::INFINITY; 3], |min, a| {
        [
            min[0].min(a.position.x),
            min[1].min(a.position.y),
            min[2].min(a.position.z),
        ]
    });
    let cell_of = |a: &Atom| -> (i64, i64, i64) {
        (
            ((a.position.x - origin[0]) / edge).floor() as i64,
            ((a.position.y - origin[1]) / edge).floor() as i64,
            ((a.position.z - origin[2]) / edge).floor() as i64,
        )
    };

    let mut grid: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
    for (index, atom) in atoms.iter().enumerate() {
        grid.entry(cell_of(atom)).or_default().push(index);
    }

    let mut pairs = Vec::new();
    for (i, atom) in atoms.iter().enumerate() {
        let (cx, cy, cz) = cell_of(atom);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(members) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    pairs.extend(
                        members
                            .iter()
                            .filter(|&&j| j > i && range.admits(atom, &atoms[j]))
                            .map(|&j| (i, j)),
                    );
                }
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lattice::points::generate_lattice;
    use std::fs::{self, File};
    use std::sync::Mutex;
    use tempfile::tempdir;
    use tracing_subscriber::{fmt, prelude::*};

    fn lattice(id: &str, repeat: usize, a: f64) -> (Structure, Vec<Atom>) {
        let structure = catalog::structure(id).unwrap();
        let atoms = generate_lattice(&structure, repeat, a).unwrap();
        (structure, atoms)
    }

    #[test]
    fn fcc_bonds_stay_within_first_shell() {
        let a = 3.61;
        let (fcc, atoms) = lattice("fcc", 2, a);
        let set = generate_bonds(&atoms, &fcc, a).unwrap();

        let max = a * 2f64.sqrt() / 2.0 * 1.05;
        assert!(!set.bonds.is_empty());
        for bond in &set.bonds {
            let length = bond.length();
            assert!(length > 0.01 && length <= max, "bond length {}", length);
            assert_ne!(bond.start, bond.end);
        }
    }

    #[test]
    fn bcc_bonds_have_half_body_diagonal_length() {
        let a = 2.87;
        let (bcc, atoms) = lattice("bcc", 2, a);
        let set = generate_bonds(&atoms, &bcc, a).unwrap();
        let expected = a * 3f64.sqrt() / 2.0;
        assert!(set.bonds.iter().all(|b| (b.length() - expected).abs() < 1e-9));
    }

    #[test]
    fn simple_cubic_bond_count_matches_axis_neighbours() {
        let (sc, atoms) = lattice("sc", 3, 1.0);
        let set = generate_bonds(&atoms, &sc, 1.0).unwrap();
        // 3 axes x 9 lines x 2 links per line of 3 atoms.
        assert_eq!(set.bonds.len(), 54);
    }

    #[test]
    fn tabulated_cutoff_is_inflated_multiplier_times_constant() {
        let cutoff = bond_cutoff("diamond", 2.0, &KernelConfig::default()).unwrap();
        match cutoff {
            BondCutoff::Tabulated {
                multiplier,
                distance,
            } => {
                assert!((multiplier - 3f64.sqrt() / 4.0).abs() < 1e-12);
                assert!((distance - 2.0 * multiplier * 1.05).abs() < 1e-12);
            }
            other => panic!("expected tabulated cutoff, got {:?}", other),
        }
    }

    #[test]
    fn unknown_structure_falls_back_to_lattice_constant() {
        let (mut sc, atoms) = lattice("sc", 2, 1.5);
        sc.id = "mystery".to_string();
        let set = generate_bonds(&atoms, &sc, 1.5).unwrap();
        assert_eq!(set.cutoff, BondCutoff::Generic { distance: 1.5 });
        assert!(set.cutoff.is_generic());
        assert_eq!(set.bonds.len(), 12);
    }

    #[test]
    fn unknown_structure_emits_generic_cutoff_warning() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("bonds.log");
        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false);
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            bond_cutoff("perovskite", 3.9, &KernelConfig::default()).unwrap();
        });

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("WARN"));
        assert!(content.contains("using generic cutoff"));
        assert!(content.contains("perovskite"));
    }

    #[test]
    fn coincident_atoms_are_not_bonded() {
        let (sc, mut atoms) = lattice("sc", 1, 1.0);
        let mut twin = atoms[0].clone();
        twin.position.x += 0.005;
        atoms.push(twin);
        let set = generate_bonds(&atoms, &sc, 1.0).unwrap();
        assert!(set.bonds.is_empty());
    }

    #[test]
    fn grid_search_matches_exhaustive_scan() {
        let a = 3.567;
        let (diamond, atoms) = lattice("diamond", 3, a);
        let exhaustive = KernelConfig::builder()
            .grid_search_threshold(usize::MAX)
            .build()
            .unwrap();
        let gridded = KernelConfig::builder()
            .grid_search_threshold(0)
            .build()
            .unwrap();

        let expected = generate_bonds_with(&atoms, &diamond, a, &exhaustive).unwrap();
        let actual = generate_bonds_with(&atoms, &diamond, a, &gridded).unwrap();
        assert!(!expected.bonds.is_empty());
        assert_eq!(expected, actual);
    }

    #[test]
    fn invalid_lattice_constant_is_rejected() {
        let (fcc, atoms) = lattice("fcc", 2, 3.61);
        for a in [f64::NAN, 0.0, -3.61, f64::INFINITY] {
            assert!(matches!(
                generate_bonds(&atoms, &fcc, a),
                Err(StructureError::InvalidLatticeConstant(_))
            ));
        }
        assert!(bond_cutoff("mystery", f64::NAN, &KernelConfig::default()).is_err());
    }
}
