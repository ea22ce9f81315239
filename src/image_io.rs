use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ImageError, RgbImage};
use serde::{Deserialize, Serialize};

use crate::config::OutputConfig;
use crate::error::{CastError, Result};
use crate::pixels::Image;

pub const SUPPORTED_INPUT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    pub fn from_extension(extension: &str) -> Option<OutputFormat> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<OutputFormat> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(OutputFormat::from_extension)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Decode a JPEG, PNG or BMP file into a three channel image.
///
/// Alpha is dropped and grayscale is expanded to RGB.
pub fn load_image(path: impl AsRef<Path>) -> Result<Image> {
    let path = path.as_ref();
    match extension_of(path) {
        Some(ext) if SUPPORTED_INPUT_EXTENSIONS.contains(&ext.as_str()) => {}
        other => {
            return Err(CastError::UnsupportedFormat(
                other.unwrap_or_else(|| format!("{} has no extension", path.display())),
            ))
        }
    }
    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    let image = Image::from_raw(rgb.as_raw(), width as usize, height as usize)?;
    tracing::info!(path = %path.display(), width, height, "Loaded image");
    Ok(image)
}

/// Path the image will be written to: a missing extension gets the format's.
pub fn resolve_output_path(path: &Path, format: OutputFormat) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(format.extension())
    }
}

fn to_rgb_image(image: &Image) -> Result<RgbImage> {
    let width = u32::try_from(image.width())
        .map_err(|_| CastError::InvalidDimensions { width: image.width(), height: image.height() })?;
    let height = u32::try_from(image.height())
        .map_err(|_| CastError::InvalidDimensions { width: image.width(), height: image.height() })?;
    let raw = image.to_raw();
    let actual = raw.len();
    RgbImage::from_raw(width, height, raw).ok_or(CastError::BufferSize {
        expected: image.len() * 3,
        actual,
    })
}

/// Disk failures surface as `Io` whether the encoder or the final flush hit them.
fn write_error(e: ImageError) -> CastError {
    match e {
        ImageError::IoError(io) => CastError::Io(io),
        other => CastError::Image(other),
    }
}

/// Encode `image` as PNG or JPEG and return the path written.
///
/// The format follows the path's extension when it has one, otherwise
/// `output.format` is used and its extension appended.
pub fn save_image(image: &Image, path: impl AsRef<Path>, output: &OutputConfig) -> Result<PathBuf> {
    let path = path.as_ref();
    let format = match extension_of(path) {
        None => output.format,
        Some(ext) => OutputFormat::from_extension(&ext).ok_or(CastError::UnsupportedFormat(ext))?,
    };
    let path = resolve_output_path(path, format);
    let rgb = to_rgb_image(image)?;

    let mut writer = BufWriter::new(File::create(&path)?);
    match format {
        OutputFormat::Png => rgb.write_with_encoder(PngEncoder::new(&mut writer)),
        OutputFormat::Jpeg => {
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, output.jpeg_quality))
        }
    }
    .map_err(write_error)?;
    // a flush error on drop would be silently lost
    writer.flush()?;
    tracing::info!(path = %path.display(), ?format, "Saved image");
    Ok(path)
}
