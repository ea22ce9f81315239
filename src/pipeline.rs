use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::blend::apply_strength;
use crate::config::{Config, OutputConfig};
use crate::error::Result;
use crate::gray_world::{gray_world, ChannelScales};
use crate::image_io::{load_image, save_image};
use crate::pixels::{Image, Quantization};
use crate::strength::Strength;

/// Owns a loaded image and its correction state.
///
/// The Gray World pass runs once in [`CorrectionPipeline::new`]; every
/// strength change afterwards only re-blends against the cached result.
#[derive(Clone, Debug)]
pub struct CorrectionPipeline {
    original: Image,
    scales: Option<ChannelScales>,
    full: Option<Image>,
    strength: Strength,
    corrected: Image,
}

impl CorrectionPipeline {
    pub fn new(original: Image, strength: Strength, quantization: Quantization) -> CorrectionPipeline {
        let (scales, full) = match gray_world(&original, quantization) {
            Some((scales, full)) => (Some(scales), Some(full)),
            None => (None, None),
        };
        let corrected = apply_strength(&original, full.as_ref(), strength);
        CorrectionPipeline { original, scales, full, strength, corrected }
    }

    pub fn open(path: impl AsRef<Path>, config: &Config) -> Result<CorrectionPipeline> {
        let original = load_image(path)?;
        Ok(CorrectionPipeline::new(
            original,
            config.correction.strength,
            config.correction.quantization,
        ))
    }

    pub fn set_strength(&mut self, strength: Strength) -> &Image {
        if strength != self.strength {
            let now = Instant::now();
            self.corrected = apply_strength(&self.original, self.full.as_ref(), strength);
            self.strength = strength;
            tracing::debug!("blend execution time: {:.2?}", now.elapsed());
        }
        &self.corrected
    }

    pub fn save(&self, path: impl AsRef<Path>, output: &OutputConfig) -> Result<PathBuf> {
        save_image(&self.corrected, path, output)
    }

    pub fn original(&self) -> &Image {
        &self.original
    }

    pub fn corrected(&self) -> &Image {
        &self.corrected
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }

    pub fn scales(&self) -> Option<&ChannelScales> {
        self.scales.as_ref()
    }

    pub fn is_degenerate(&self) -> bool {
        self.scales.is_none()
    }
}
