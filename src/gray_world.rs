//! Gray World white balance.
//!
//! Assumes the average color of a scene is neutral gray and rescales each
//! channel so its mean lands on the mean of all three channels.

use std::time::Instant;

use crate::blend::apply_strength;
use crate::conditional_paralell::prelude::*;
use crate::helpers::ChannelStats;
use crate::pixels::{Image, PixelOps, Quantization, SubPixel, CHANNELS_PER_PIXEL};
use crate::strength::Strength;

/// Per channel statistics and the gains that neutralize the cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelScales {
    pub means: [f64; CHANNELS_PER_PIXEL],
    pub gray: f64,
    pub scales: [SubPixel; CHANNELS_PER_PIXEL],
}

impl ChannelScales {
    /// Returns `None` when a channel is entirely black; there is nothing to
    /// rescale in that case.
    pub fn estimate(image: &Image) -> Option<ChannelScales> {
        let sums = image.data.channel_sums();
        if sums.contains(&0) {
            return None;
        }
        let count = image.data.len() as f64;
        let total: u64 = sums.iter().sum();

        // avg_gray / avg_c == total / (3 * sum_c); exactly 1.0 for equal means
        let scales = sums.map(|sum| (total as f64 / (3 * sum) as f64) as SubPixel);
        Some(ChannelScales {
            means: sums.map(|sum| sum as f64 / count),
            gray: total as f64 / (3.0 * count),
            scales,
        })
    }

    pub fn apply(&self, image: &Image, quantization: Quantization) -> Image {
        let scales = self.scales;
        let data = image
            .data
            .par_iter()
            .map(|p| {
                let p = p.to_sub_pixels();
                [0, 1, 2].map(|c| quantization.quantize(p[c] * scales[c]))
            })
            .collect();
        image.with_data(data)
    }
}

/// Channel gains and the fully corrected image, or `None` for a degenerate
/// (zero mean) channel.
pub fn gray_world(image: &Image, quantization: Quantization) -> Option<(ChannelScales, Image)> {
    let now = Instant::now();
    let Some(scales) = ChannelScales::estimate(image) else {
        tracing::warn!("image has a zero mean channel, leaving it unchanged");
        return None;
    };
    let corrected = scales.apply(image, quantization);
    tracing::debug!(
        means = ?scales.means,
        scales = ?scales.scales,
        "gray world execution time: {:.2?}",
        now.elapsed()
    );
    Some((scales, corrected))
}

pub fn full_correction(image: &Image, quantization: Quantization) -> Option<Image> {
    gray_world(image, quantization).map(|(_, corrected)| corrected)
}

/// Gray World correction blended with the original by `strength`.
///
/// `strength` is clamped to `[0, 1]` and compared against 0 and 1 at full
/// `f64` precision; only the per sample blend runs in `f32`. The input is
/// never modified; the result is always a new buffer.
pub fn correct(image: &Image, strength: f64) -> Image {
    correct_with(image, Strength::new(strength), Quantization::default())
}

pub fn correct_with(image: &Image, strength: Strength, quantization: Quantization) -> Image {
    if strength.is_none() {
        return image.clone();
    }
    let full = full_correction(image, quantization);
    apply_strength(image, full.as_ref(), strength)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Channel means (100, 150, 200).
    fn scenario() -> Image {
        Image::new_with(
            vec![[50, 100, 150], [150, 200, 250], [100, 150, 200], [100, 150, 200]],
            2,
            2,
        )
        .unwrap()
    }

    /// Deterministic image with a strong cast in channel 2.
    fn gradient(width: usize, height: usize) -> Image {
        let data = (0..width * height)
            .map(|idx| {
                let x = idx % width;
                let y = idx / width;
                [
                    (x * 7 % 97) as u8,
                    (40 + (x + y) * 3 % 120) as u8,
                    (120 + y * 11 % 135) as u8,
                ]
            })
            .collect();
        Image::new_with(data, width, height).unwrap()
    }

    #[test]
    fn test_scenario_scales() {
        let scales = ChannelScales::estimate(&scenario()).unwrap();

        assert_eq!(scales.means, [100.0, 150.0, 200.0]);
        assert_eq!(scales.gray, 150.0);
        assert_eq!(scales.scales, [1.5, 1.0, 0.75]);
    }

    #[test]
    fn test_scenario_full_strength() {
        let result = correct(&scenario(), 1.0);

        assert_eq!(result.pixel(0, 1), [150, 150, 150]);
        assert_eq!(result.pixel(0, 0), [75, 100, 112]);
        // 187.5 truncates
        assert_eq!(result.pixel(1, 0), [225, 200, 187]);
    }

    #[test]
    fn test_scenario_half_strength() {
        let result = correct(&scenario(), 0.5);

        assert_eq!(result.pixel(0, 1), [125, 150, 175]);
    }

    #[test]
    fn test_round_quantization() {
        let result = correct_with(&scenario(), Strength::FULL, Quantization::Round);

        assert_eq!(result.pixel(1, 0), [225, 200, 188]);
        assert_eq!(result.pixel(0, 0), [75, 100, 113]);
    }

    #[test]
    fn test_identity_at_zero_strength() {
        for image in [scenario(), gradient(13, 7)] {
            assert_eq!(correct(&image, 0.0), image);
        }
    }

    #[test]
    fn test_balanced_image_is_stable() {
        // all channel sums are 40
        let image = Image::new_with(vec![[10, 20, 30], [30, 20, 10]], 2, 1).unwrap();
        let scales = ChannelScales::estimate(&image).unwrap();

        assert_eq!(scales.scales, [1.0, 1.0, 1.0]);
        assert_eq!(correct(&image, 1.0), image);
    }

    #[test]
    fn test_gray_image_is_stable() {
        let image = Image::filled([37, 37, 37], 5, 3).unwrap();

        assert_eq!(correct(&image, 1.0), image);
        assert_eq!(correct(&image, 0.4), image);
    }

    #[test]
    fn test_degenerate_channel_is_unchanged() {
        let image = Image::new_with(vec![[10, 0, 30], [200, 0, 5], [1, 0, 1]], 3, 1).unwrap();

        assert!(ChannelScales::estimate(&image).is_none());
        assert!(full_correction(&image, Quantization::Truncate).is_none());
        for strength in [0.1, 0.5, 0.9, 1.0] {
            assert_eq!(correct(&image, strength), image);
        }
    }

    #[test]
    fn test_all_black_is_unchanged() {
        let image = Image::filled([0, 0, 0], 4, 4).unwrap();

        assert_eq!(correct(&image, 1.0), image);
    }

    #[test]
    fn test_dimensions_preserved() {
        let image = gradient(17, 5);
        for strength in [0.0, 0.3, 1.0] {
            let result = correct(&image, strength);
            assert_eq!((result.width(), result.height()), (17, 5));
            assert_eq!(result.len(), image.len());
        }
    }

    #[test]
    fn test_out_of_range_strength_is_clamped() {
        let image = gradient(9, 9);

        assert_eq!(correct(&image, -1.0), image);
        assert_eq!(correct(&image, 3.0), correct(&image, 1.0));
    }

    #[test]
    fn test_blend_is_monotonic() {
        let image = gradient(23, 19);
        let strengths: Vec<f64> = (0..=20).map(|i| i as f64 / 20.0).collect();
        let results: Vec<Image> = strengths.iter().map(|&s| correct(&image, s)).collect();

        for pair in results.windows(2) {
            for ((a, b), o) in pair[0].pixels().iter().zip(pair[1].pixels()).zip(image.pixels()) {
                for c in 0..CHANNELS_PER_PIXEL {
                    let da = (a[c] as i32 - o[c] as i32).abs();
                    let db = (b[c] as i32 - o[c] as i32).abs();
                    assert!(db >= da, "distance shrank: {da} -> {db}");
                }
            }
        }
    }

    #[test]
    fn test_near_full_strength_is_still_a_blend() {
        let image = scenario();
        let strength = Strength::new(0.999_999_99);

        assert!(!strength.is_full());
        // the blend lands on the full correction anyway once rounded
        assert_eq!(correct(&image, 0.999_999_99), correct(&image, 1.0));
    }

    #[test]
    fn test_gray_world_returns_scales_with_image() {
        let (scales, corrected) = gray_world(&scenario(), Quantization::Truncate).unwrap();

        assert_eq!(scales.scales, [1.5, 1.0, 0.75]);
        assert_eq!(corrected, full_correction(&scenario(), Quantization::Truncate).unwrap());
    }

    #[test]
    fn test_input_is_not_modified() {
        let image = gradient(8, 8);
        let copy = image.clone();
        let _ = correct(&image, 0.8);

        assert_eq!(image, copy);
    }

    #[test]
    fn test_saturates_instead_of_wrapping() {
        // channel 0 mean is tiny, so its gain is large
        let image = Image::new_with(vec![[1, 200, 200], [255, 200, 200], [0, 200, 200], [0, 200, 200]], 2, 2)
            .unwrap();
        let result = correct(&image, 1.0);

        assert_eq!(result.pixel(1, 0)[0], 255);
        assert_eq!(result.pixel(0, 1)[0], 0);
    }
}
