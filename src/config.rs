use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CastError, Result};
use crate::image_io::OutputFormat;
use crate::pixels::Quantization;
use crate::strength::Strength;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub correction: CorrectionConfig,
    pub output: OutputConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct CorrectionConfig {
    pub strength: Strength,
    pub quantization: Quantization,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Used when the output path has no recognised extension.
    pub format: OutputFormat,
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: OutputFormat::Png,
            jpeg_quality: 95,
        }
    }
}

impl Config {
    pub fn from_toml_str(data: &str) -> Result<Config> {
        let config: Config = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(CastError::InvalidConfig(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.output.jpeg_quality
            )));
        }
        Ok(())
    }
}

pub fn parse_config(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();
    let data_string = std::fs::read_to_string(config_path)?;
    let config = Config::from_toml_str(&data_string)?;
    tracing::info!(
        path = %config_path.display(),
        strength = config.correction.strength.value(),
        "Loaded configuration"
    );
    Ok(config)
}
