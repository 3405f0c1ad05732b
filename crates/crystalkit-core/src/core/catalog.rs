use super::models::structure::{BasisAtom, LatticeVectors, Structure};
use nalgebra::Vector3;
use phf::{Map, phf_map};

/// Compile-time description of a built-in structure.
#[derive(Debug)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub basis: &'static [(&'static str, [f64; 3])],
    pub vectors: [[f64; 3]; 3],
    pub default_lattice_constant: f64,
}

const CUBIC: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
// c/a of an ideal close-packed stacking, sqrt(8/3).
const HEXAGONAL: [[f64; 3]; 3] = [
    [1.0, 0.0, 0.0],
    [-0.5, 0.8660254037844386, 0.0],
    [0.0, 0.0, 1.632993161855452],
];

static BUILTIN_STRUCTURES: Map<&'static str, CatalogEntry> = phf_map! {
    "sc" => CatalogEntry {
        name: "Simple cubic",
        basis: &[("Po", [0.0, 0.0, 0.0])],
        vectors: CUBIC,
        default_lattice_constant: 3.35,
    },
    "bcc" => CatalogEntry {
        name: "Body-centred cubic",
        basis: &[("Fe", [0.0, 0.0, 0.0]), ("Fe", [0.5, 0.5, 0.5])],
        vectors: CUBIC,
        default_lattice_constant: 2.87,
    },
    "fcc" => CatalogEntry {
        name: "Face-centred cubic",
        basis: &[
            ("Cu", [0.0, 0.0, 0.0]),
            ("Cu", [0.5, 0.5, 0.0]),
            ("Cu", [0.5, 0.0, 0.5]),
            ("Cu", [0.0, 0.5, 0.5]),
        ],
        vectors: CUBIC,
        default_lattice_constant: 3.61,
    },
    "diamond" => CatalogEntry {
        name: "Diamond cubic",
        basis: &[
            ("C", [0.0, 0.0, 0.0]),
            ("C", [0.5, 0.5, 0.0]),
            ("C", [0.5, 0.0, 0.5]),
            ("C", [0.0, 0.5, 0.5]),
            ("C", [0.25, 0.25, 0.25]),
            ("C", [0.75, 0.75, 0.25]),
            ("C", [0.75, 0.25, 0.75]),
            ("C", [0.25, 0.75, 0.75]),
        ],
        vectors: CUBIC,
        default_lattice_constant: 3.567,
    },
    "zincblende" => CatalogEntry {
        name: "Zinc blende",
        basis: &[
            ("Zn", [0.0, 0.0, 0.0]),
            ("Zn", [0.5, 0.5, 0.0]),
            ("Zn", [0.5, 0.0, 0.5]),
            ("Zn", [0.0, 0.5, 0.5]),
            ("S", [0.25, 0.25, 0.25]),
            ("S", [0.75, 0.75, 0.25]),
            ("S", [0.75, 0.25, 0.75]),
            ("S", [0.25, 0.75, 0.75]),
        ],
        vectors: CUBIC,
        default_lattice_constant: 5.41,
    },
    "nacl" => CatalogEntry {
        name: "Rock salt",
        basis: &[
            ("Na", [0.0, 0.0, 0.0]),
            ("Na", [0.5, 0.5, 0.0]),
            ("Na", [0.5, 0.0, 0.5]),
            ("Na", [0.0, 0.5, 0.5]),
            ("Cl", [0.5, 0.0, 0.0]),
            ("Cl", [0.0, 0.5, 0.0]),
            ("Cl", [0.0, 0.0, 0.5]),
            ("Cl", [0.5, 0.5, 0.5]),
        ],
        vectors: CUBIC,
        default_lattice_constant: 5.64,
    },
    "cscl" => CatalogEntry {
        name: "Caesium chloride",
        basis: &[("Cs", [0.0, 0.0, 0.0]), ("Cl", [0.5, 0.5, 0.5])],
        vectors: CUBIC,
        default_lattice_constant: 4.12,
    },
    "hcp" => CatalogEntry {
        name: "Hexagonal close-packed",
        basis: &[
            ("Mg", [0.0, 0.0, 0.0]),
            ("Mg", [0.3333333333333333, 0.6666666666666666, 0.5]),
        ],
        vectors: HEXAGONAL,
        default_lattice_constant: 3.21,
    },
};

/// First-neighbour distance of each built-in structure, in units of `a`.
static FIRST_SHELL_MULTIPLIERS: Map<&'static str, f64> = phf_map! {
    "sc" => 1.0,
    // body diagonal / 2
    "bcc" => 0.8660254037844386,
    "cscl" => 0.8660254037844386,
    // face diagonal / 2
    "fcc" => 0.7071067811865476,
    // body diagonal / 4
    "diamond" => 0.4330127018922193,
    "zincblende" => 0.4330127018922193,
    "nacl" => 0.5,
    "hcp" => 1.0,
};

pub fn entry(id: &str) -> Option<&'static CatalogEntry> {
    BUILTIN_STRUCTURES.get(id.trim())
}

/// Builds an owned [`Structure`] for a built-in id.
pub fn structure(id: &str) -> Option<Structure> {
    let id = id.trim();
    BUILTIN_STRUCTURES.get_entry(id).map(|(key, entry)| Structure {
        id: (*key).to_string(),
        name: entry.name.to_string(),
        basis: entry
            .basis
            .iter()
            .map(|(species, [x, y, z])| BasisAtom::new(*x, *y, *z).with_species(species))
            .collect(),
        vectors: LatticeVectors::new(
            Vector3::from(entry.vectors[0]),
            Vector3::from(entry.vectors[1]),
            Vector3::from(entry.vectors[2]),
        ),
        default_lattice_constant: entry.default_lattice_constant,
    })
}

/// Built-in ids in alphabetical order.
pub fn ids() -> Vec<&'static str> {
    let mut ids: Vec<_> = BUILTIN_STRUCTURES.keys().copied().collect();
    ids.sort_unstable();
    ids
}

pub fn first_shell_multiplier(id: &str) -> Option<f64> {
    FIRST_SHELL_MULTIPLIERS.get(id.trim()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_structure_is_valid() {
        for id in ids() {
            let s = structure(id).unwrap();
            assert!(s.validate(1e-9).is_ok(), "{} failed validation", id);
            assert_eq!(s.id, id);
        }
    }

    #[test]
    fn every_builtin_structure_has_a_cutoff_multiplier() {
        for id in ids() {
            assert!(first_shell_multiplier(id).is_some(), "{} has no cutoff", id);
        }
    }

    #[test]
    fn builtin_basis_coordinates_are_fractional() {
        for id in ids() {
            for atom in structure(id).unwrap().basis {
                assert!(atom.position.iter().all(|c| (0.0..1.0).contains(c)));
            }
        }
    }

    #[test]
    fn structure_lookup_trims_whitespace_and_is_case_sensitive() {
        assert!(structure(" fcc ").is_some());
        assert!(structure("FCC").is_none());
        assert!(structure("perovskite").is_none());
    }

    #[test]
    fn structure_carries_species_labels() {
        let nacl = structure("nacl").unwrap();
        assert_eq!(nacl.basis.len(), 8);
        assert_eq!(nacl.basis[0].species.as_deref(), Some("Na"));
        assert_eq!(nacl.basis[7].species.as_deref(), Some("Cl"));
    }

    #[test]
    fn hcp_neighbours_within_and_between_layers_are_equidistant() {
        let hcp = structure("hcp").unwrap();
        let v = hcp.vectors;
        let in_plane = v.a1.norm();
        let between = v.to_cartesian(&hcp.basis[1].position).coords.norm();
        assert!((in_plane - between).abs() < 1e-9);
    }

    #[test]
    fn ids_are_sorted() {
        let ids = ids();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert!(ids.contains(&"diamond"));
    }
}
