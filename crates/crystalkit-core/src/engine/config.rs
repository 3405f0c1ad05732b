use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value} for '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
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
}

/// Numeric tolerances shared by every geometry routine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct KernelConfig {
    /// Quantum (Å) of the position key used to merge coincident atoms.
    pub dedup_tolerance: f64,
    /// Inflation applied to tabulated first-shell bond cutoffs.
    pub bond_tolerance_factor: f64,
    /// Pairs at or below this distance (Å) never bond.
    pub min_bond_distance: f64,
    /// Slack of the inside test when clipping against the bounding box.
    pub clip_epsilon: f64,
    /// Half-size of the initial plane quad, in units of the box half-extent.
    pub plane_cover_factor: f64,
    /// `|n·x̂|` at which the tangent seed axis switches from x to y.
    pub tangent_alignment_limit: f64,
    /// Unit-cell volumes, in units of `a³`, below this are rejected as degenerate.
    pub volume_epsilon: f64,
    /// `|G|` below this means the indices describe no plane.
    pub reciprocal_epsilon: f64,
    /// Atom count above which bonds are found with a cell grid.
    pub grid_search_threshold: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            dedup_tolerance: 0.01,
            bond_tolerance_factor: 1.05,
            min_bond_distance: 0.01,
            clip_epsilon: 0.001,
            plane_cover_factor: 3.0,
            tangent_alignment_limit: 0.9,
            volume_epsilon: 1e-9,
            reciprocal_epsilon: 1e-12,
            grid_search_threshold: 512,
        }
    }
}

impl KernelConfig {
    pub fn builder() -> KernelConfigBuilder {
        KernelConfigBuilder::new()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<string>")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("dedup_tolerance", self.dedup_tolerance)?;
        if !(self.bond_tolerance_factor.is_finite() && self.bond_tolerance_factor >= 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "bond_tolerance_factor",
                value: self.bond_tolerance_factor,
                reason: "must be finite and at least 1.0",
            });
        }
        non_negative("min_bond_distance", self.min_bond_distance)?;
        non_negative("clip_epsilon", self.clip_epsilon)?;
        if !(self.plane_cover_factor.is_finite() && self.plane_cover_factor > 3f64.sqrt()) {
            return Err(ConfigError::InvalidParameter {
                name: "plane_cover_factor",
                value: self.plane_cover_factor,
                reason: "must exceed sqrt(3) to cover every box section",
            });
        }
        if !(self.tangent_alignment_limit > 0.0 && self.tangent_alignment_limit < 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "tangent_alignment_limit",
                value: self.tangent_alignment_limit,
                reason: "must lie strictly between 0 and 1",
            });
        }
        positive("volume_epsilon", self.volume_epsilon)?;
        positive("reciprocal_epsilon", self.reciprocal_epsilon)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be positive and finite",
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be non-negative and finite",
        })
    }
}

#[derive(Default)]
pub struct KernelConfigBuilder {
    config: KernelConfig,
}

impl KernelConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dedup_tolerance(mut self, value: f64) -> Self {
        self.config.dedup_tolerance = value;
        self
    }
    pub fn bond_tolerance_factor(mut self, value: f64) -> Self {
        self.config.bond_tolerance_factor = value;
        self
    }
    pub fn min_bond_distance(mut self, value: f64) -> Self {
        self.config.min_bond_distance = value;
        self
    }
    pub fn clip_epsilon(mut self, value: f64) -> Self {
        self.config.clip_epsilon = value;
        self
    }
    pub fn plane_cover_factor(mut self, value: f64) -> Self {
        self.config.plane_cover_factor = value;
        self
    }
    pub fn tangent_alignment_limit(mut self, value: f64) -> Self {
        self.config.tangent_alignment_limit = value;
        self
    }
    pub fn volume_epsilon(mut self, value: f64) -> Self {
        self.config.volume_epsilon = value;
        self
    }
    pub fn reciprocal_epsilon(mut self, value: f64) -> Self {
        self.config.reciprocal_epsilon = value;
        self
    }
    pub fn grid_search_threshold(mut self, count: usize) -> Self {
        self.config.grid_search_threshold = count;
        self
    }

    pub fn build(self) -> Result<KernelConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
