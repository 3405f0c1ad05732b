use crate::core::catalog;
use crate::core::models::structure::{Structure, StructureError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Structure '{id}' is defined more than once")]
    DuplicateId { id: String },
    #[error("Structure '{id}' is invalid: {source}")]
    Invalid { id: String, source: StructureError },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StructureFile {
    #[serde(default)]
    structure: Vec<Structure>,
}

/// User-defined structures layered over the built-in catalog.
///
/// Lookups check the user definitions first, so a file may deliberately
/// redefine a built-in id (e.g. a different default lattice constant).
#[derive(Debug, Clone, Default)]
pub struct StructureCatalog {
    custom: HashMap<String, Structure>,
}

impl StructureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `[[structure]]` tables from TOML text and validates each entry.
    pub fn from_toml_str(content: &str, volume_epsilon: f64) -> Result<Self, CatalogLoadError> {
        Self::parse(content, "<string>", volume_epsilon)
    }

    pub fn load(path: &Path, volume_epsilon: f64) -> Result<Self, CatalogLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy(), volume_epsilon)
    }

    fn parse(content: &str, origin: &str, volume_epsilon: f64) -> Result<Self, CatalogLoadError> {
        let file: StructureFile = toml::from_str(content).map_err(|e| CatalogLoadError::Toml {
            path: origin.to_string(),
            source: e,
        })?;

        let mut custom = HashMap::with_capacity(file.structure.len());
        for mut structure in file.structure {
            structure.id = structure.id.trim().to_string();
            structure
                .validate(volume_epsilon)
                .map_err(|source| CatalogLoadError::Invalid {
                    id: structure.id.clone(),
                    source,
                })?;
            if custom.contains_key(&structure.id) {
                return Err(CatalogLoadError::DuplicateId { id: structure.id });
            }
            custom.insert(structure.id.clone(), structure);
        }
        debug!(origin, count = custom.len(), "Loaded custom structures.");
        Ok(Self { custom })
    }

    pub fn get(&self, id: &str) -> Option<Structure> {
        self.custom
            .get(id.trim())
            .cloned()
            .or_else(|| catalog::structure(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.custom.contains_key(id.trim()) || catalog::entry(id).is_some()
    }

    /// All known ids, custom and built-in, sorted and without duplicates.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .custom
            .keys()
            .cloned()
            .chain(catalog::ids().into_iter().map(str::to_string))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
