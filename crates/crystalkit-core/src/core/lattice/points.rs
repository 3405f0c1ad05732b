use crate::core::models::atom::Atom;
use crate::core::models::structure::{Structure, StructureError, check_lattice_constant};
use crate::core::utils::geometry;
use crate::engine::config::KernelConfig;
use nalgebra::Vector3;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LatticeError {
    #[error("Repeat count must be at least 1")]
    InvalidRepeat,

    #[error(transparent)]
    Structure(#[from] StructureError),
}

/// Expands `structure` over a `repeat³` block of cells using the default tolerances.
pub fn generate_lattice(
    structure: &Structure,
    repeat: usize,
    lattice_constant: f64,
) -> Result<Vec<Atom>, LatticeError> {
    generate_lattice_with(structure, repeat, lattice_constant, &KernelConfig::default())
}

/// Expands `structure` over a `repeat³` block of cells centred on the origin.
///
/// Atoms whose positions quantize to the same key (grid of
/// `config.dedup_tolerance`) are merged, keeping the first emitted one. The
/// survivor is flagged as an edge atom if any of the merged copies was.
///
/// # Errors
///
/// Fails for `repeat == 0`, a non-positive lattice constant, or a structure
/// that does not pass [`Structure::validate`].
#[instrument(skip_all, name = "lattice_generation", fields(structure = %structure.id, repeat = repeat))]
pub fn generate_lattice_with(
    structure: &Structure,
    repeat: usize,
    lattice_constant: f64,
    config: &KernelConfig,
) -> Result<Vec<Atom>, LatticeError> {
    if repeat == 0 {
        return Err(LatticeError::InvalidRepeat);
    }
    check_lattice_constant(lattice_constant)?;
    structure.validate(config.volume_epsilon)?;

    let vectors = structure.vectors.scaled(lattice_constant);
    let center = block_center(&vectors.as_array(), repeat);
    let last = repeat - 1;

    let capacity = repeat.pow(3) * structure.basis.len();
    let mut atoms: Vec<Atom> = Vec::with_capacity(capacity);
    let mut seen: HashMap<(i64, i64, i64), usize> = HashMap::with_capacity(capacity);
    let mut merged = 0usize;

    for i in 0..repeat {
        for j in 0..repeat {
            for k in 0..repeat {
                let cell = [i, j, k];
                let is_edge = cell.iter().any(|&c| c == 0 || c == last);
                let offset = Vector3::new(i as f64, j as f64, k as f64);

                for (basis_index, basis_atom) in structure.basis.iter().enumerate() {
                    let position = vectors.to_cartesian(&(basis_atom.position + offset)) - center;
                    let key = geometry::quantize(&position, config.dedup_tolerance);

                    match seen.entry(key) {
                        Entry::Occupied(existing) => {
                            atoms[*existing.get()].is_edge |= is_edge;
                            merged += 1;
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(atoms.len());
                            atoms.push(Atom {
                                position,
                                is_edge,
                                basis_index,
                                cell,
                                species: basis_atom.species.clone(),
                            });
                        }
                    }
                }
            }
        }
    }

    debug!(atoms = atoms.len(), merged, "Lattice generated.");
    Ok(atoms)
}

/// Centre of the parallelepiped spanned by `repeat` copies of each vector.
pub(crate) fn block_center(vectors: &[Vector3<f64>; 3], repeat: usize) -> Vector3<f64> {
    let diagonal = vectors
        .iter()
        .fold(Vector3::zeros(), |acc, v| geometry::add(&acc, v));
    geometry::scale(&diagonal, 0.5 * repeat as f64)
}
