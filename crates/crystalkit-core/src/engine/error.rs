use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::structures::CatalogLoadError;
use crate::core::lattice::points::LatticeError;
use crate::core::models::structure::StructureError;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("Unknown structure '{0}': not built in and not loaded from a structure file")]
    UnknownStructure(String),

    #[error("Invalid structure: {source}")]
    Structure {
        #[from]
        source: StructureError,
    },

    #[error("Lattice generation failed: {source}")]
    Lattice {
        #[from]
        source: LatticeError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Structure catalog error: {source}")]
    Catalog {
        #[from]
        source: CatalogLoadError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_errors_convert_with_context() {
        let err: KernelError = StructureError::InvalidLatticeConstant(-1.0).into();
        assert!(matches!(err, KernelError::Structure { .. }));
        assert!(err.to_string().starts_with("Invalid structure:"));
    }

    #[test]
    fn lattice_errors_convert_with_context() {
        let err: KernelError = LatticeError::InvalidRepeat.into();
        assert!(matches!(err, KernelError::Lattice { .. }));
        assert!(err.to_string().contains("Repeat count"));
    }

    #[test]
    fn unknown_structure_names_the_id() {
        let err = KernelError::UnknownStructure("perovskite".to_string());
        assert!(err.to_string().contains("'perovskite'"));
    }
}
