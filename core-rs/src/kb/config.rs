/**
 * config.rs
 * Knowledge base configuration (YAML format)
 *
 * Format:
 * ```yaml
 * minSizeOfConcept: 1
 * maxConceptSizeRatio: 1.0
 * useExternalReasoner: false
 * roleSelection: unfiltered
 * sourceFormat: turtle
 * ```
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::KbError;
use crate::hierarchy::RoleSelection;
use crate::ontology::SerializationFormat;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KbConfig {
    /// Smallest instance count of a viable concept
    #[serde(default = "default_min_size_of_concept")]
    pub min_size_of_concept: usize,
    /// Fraction of Top's instance count giving the largest viable concept
    #[serde(default = "default_max_concept_size_ratio")]
    pub max_concept_size_ratio: f64,
    /// Run the materialization pass over the RDF graph before extraction
    #[serde(default)]
    pub use_external_reasoner: bool,
    #[serde(default)]
    pub role_selection: RoleSelection,
    /// Overrides the format guessed from the ontology file extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_format: Option<SerializationFormat>,
}

fn default_min_size_of_concept() -> usize { 1 }
fn default_max_concept_size_ratio() -> f64 { 1.0 }

impl Default for KbConfig {
    fn default() -> Self {
        Self {
            min_size_of_concept: default_min_size_of_concept(),
            max_concept_size_ratio: default_max_concept_size_ratio(),
            use_external_reasoner: false,
            role_selection: RoleSelection::default(),
            source_format: None,
        }
    }
}

impl KbConfig {
    /// Load configuration from a YAML file
    ///
    /// # Example
    /// ```no_run
    /// # use evokb_core::KbConfig;
    /// let config = KbConfig::load("evokb.yaml")?;
    /// assert!(config.max_concept_size_ratio <= 1.0);
    /// # Ok::<(), evokb_core::KbError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, KbError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(KbError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let config: KbConfig = serde_yaml::from_str(&content).map_err(|e| {
            KbError::Config(format!("Invalid config YAML in {}: {}", path.display(), e))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Ensures the size ratio is a finite, non-negative number
    pub fn validate(&self) -> Result<(), KbError> {
        if !self.max_concept_size_ratio.is_finite() || self.max_concept_size_ratio < 0.0 {
            return Err(KbError::Config(format!(
                "maxConceptSizeRatio must be a finite non-negative number, got {}",
                self.max_concept_size_ratio
            )));
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), KbError> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }
}
