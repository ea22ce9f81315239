//! castfix: Gray World color cast correction with a blend strength.
//!
//! ```
//! use castfix::{correct, Image};
//!
//! let image = Image::from_raw(&[100, 150, 200, 100, 150, 200], 2, 1).unwrap();
//! let balanced = correct(&image, 1.0);
//! assert_eq!(balanced.pixel(0, 0), [150, 150, 150]);
//! ```

pub mod blend;
pub mod conditional_paralell;
pub mod config;
pub mod error;
pub mod gray_world;
pub mod helpers;
pub mod image_io;
pub mod pipeline;
pub mod pixels;
pub mod strength;

pub use config::{parse_config, Config, CorrectionConfig, OutputConfig};
pub use error::{CastError, Result};
pub use gray_world::{correct, correct_with, full_correction, gray_world, ChannelScales};
pub use image_io::{load_image, save_image, OutputFormat};
pub use pipeline::CorrectionPipeline;
pub use pixels::{Image, Pixel, Quantization};
pub use strength::Strength;
