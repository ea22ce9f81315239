use crate::conditional_paralell::prelude::*;
use crate::pixels::{ImageBuffer, CHANNELS_PER_PIXEL};

pub trait ChannelStats {
    /// Exact per channel sums.
    fn channel_sums(&self) -> [u64; CHANNELS_PER_PIXEL];
}

impl ChannelStats for ImageBuffer {
    fn channel_sums(&self) -> [u64; CHANNELS_PER_PIXEL] {
        [0, 1, 2].map(|c| self.par_iter().map(|p| u64::from(p[c])).sum::<u64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sums() {
        let data: ImageBuffer = vec![[1, 2, 3], [4, 5, 6], [255, 0, 255]];

        assert_eq!(data.channel_sums(), [260, 7, 264])
    }

    #[test]
    fn test_sums_do_not_overflow_u8() {
        let data: ImageBuffer = vec![[255, 255, 255]; 1000];

        assert_eq!(data.channel_sums(), [255_000; 3])
    }
}
