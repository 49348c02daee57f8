use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::attendance::AttendancePolicy;
use crate::modules::contributions::ContributionRates;
use crate::modules::withholding::WithholdingTables;

/// Rates, tables and caps the calculators are built from.
///
/// Defaults are the 2024 values. A YAML file may override any section;
/// sections it omits keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatutoryConfig {
    pub contributions: ContributionRates,
    pub withholding: WithholdingTables,
    pub attendance: AttendancePolicy,
}

impl StatutoryConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!(
                "Cannot read rates file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(path = %path.display(), "Loading statutory rates");
        Self::from_yaml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        self.contributions.validate()?;
        self.withholding.validate()?;
        self.attendance.validate()
    }
}
