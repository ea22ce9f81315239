use serde::{Deserialize, Serialize};

use crate::error::{CastError, Result};

pub type Sample = u8;
pub type SubPixel = f32;
pub type Pixel = [Sample; CHANNELS_PER_PIXEL];
pub type ImageBuffer = Vec<Pixel>;

pub const CHANNELS_PER_PIXEL: usize = 3;
pub const MAX_SAMPLE: SubPixel = Sample::MAX as SubPixel;

/// How a float sample is turned back into an 8 bit value after clipping.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Quantization {
    /// Drop the fractional part.
    #[default]
    Truncate,
    /// Round half away from zero.
    Round,
}

impl Quantization {
    #[inline]
    pub fn quantize(self, value: SubPixel) -> Sample {
        // NaN saturates to 0 on the `as` cast
        let clipped = value.clamp(0.0, MAX_SAMPLE);
        match self {
            Quantization::Truncate => clipped as Sample,
            Quantization::Round => clipped.round() as Sample,
        }
    }
}

pub trait PixelOps {
    fn to_sub_pixels(self) -> [SubPixel; CHANNELS_PER_PIXEL];
}

impl PixelOps for Pixel {
    #[inline]
    fn to_sub_pixels(self) -> [SubPixel; CHANNELS_PER_PIXEL] {
        self.map(SubPixel::from)
    }
}

/// A dense, row-major grid of three channel 8 bit pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub(crate) data: ImageBuffer,
    pub(crate) height: usize,
    pub(crate) width: usize,
}

impl Image {
    pub fn new_with(data: ImageBuffer, width: usize, height: usize) -> Result<Image> {
        if width == 0 || height == 0 {
            return Err(CastError::InvalidDimensions { width, height });
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(CastError::BufferSize {
                expected: expected * CHANNELS_PER_PIXEL,
                actual: data.len() * CHANNELS_PER_PIXEL,
            });
        }
        Ok(Image { data, height, width })
    }

    /// Build an image from interleaved `H x W x 3` bytes.
    pub fn from_raw(bytes: &[Sample], width: usize, height: usize) -> Result<Image> {
        if width == 0 || height == 0 {
            return Err(CastError::InvalidDimensions { width, height });
        }
        let expected = width * height * CHANNELS_PER_PIXEL;
        if bytes.len() != expected {
            return Err(CastError::BufferSize { expected, actual: bytes.len() });
        }
        let data = bytes
            .chunks_exact(CHANNELS_PER_PIXEL)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Ok(Image { data, height, width })
    }

    pub fn filled(pixel: Pixel, width: usize, height: usize) -> Result<Image> {
        Image::new_with(vec![pixel; width * height], width, height)
    }

    pub fn to_raw(&self) -> Vec<Sample> {
        self.data.iter().flatten().copied().collect()
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        self.data[y * self.width + x]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Same dimensions, new pixel data. Callers keep the length invariant.
    pub(crate) fn with_data(&self, data: ImageBuffer) -> Image {
        debug_assert_eq!(data.len(), self.data.len());
        Image { data, height: self.height, width: self.width }
    }
}
