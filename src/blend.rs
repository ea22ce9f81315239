use crate::conditional_paralell::prelude::*;
use crate::pixels::{Image, PixelOps, Quantization, SubPixel};
use crate::strength::Strength;

/// Linear blend `original + s * (full - original)` for every sample, rounded.
///
/// Both images must have the same dimensions.
pub fn blend(original: &Image, full: &Image, strength: Strength) -> Image {
    debug_assert_eq!(
        (original.width, original.height),
        (full.width, full.height)
    );
    let s = strength.value() as SubPixel;
    let data = original
        .data
        .par_iter()
        .zip(full.data.par_iter())
        .map(|(o, f)| {
            let o = o.to_sub_pixels();
            let f = f.to_sub_pixels();
            [0, 1, 2].map(|c| Quantization::Round.quantize(o[c] + s * (f[c] - o[c])))
        })
        .collect();
    original.with_data(data)
}

/// Final stage shared by one-shot correction and the cached pipeline.
///
/// `full` is `None` when the image has a zero mean channel; the original is
/// then returned unchanged.
pub fn apply_strength(original: &Image, full: Option<&Image>, strength: Strength) -> Image {
    match full {
        _ if strength.is_none() => original.clone(),
        None => original.clone(),
        Some(full) if strength.is_full() => full.clone(),
        Some(full) => blend(original, full, strength),
    }
}
