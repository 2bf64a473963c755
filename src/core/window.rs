//! Hann window shared by STFT analysis and synthesis.
//!
//! The same table tapers the input frame before the forward transform and the
//! resynthesized frame before overlap-add, so the pair behaves as a squared
//! Hann window whose overlap-added sum is constant.

use std::f64::consts::PI;
use std::sync::LazyLock;

use crate::core::types::{OVERSAMPLE_FACTOR, STFT_HALF_SIZE, STFT_SIZE};

/// Process-wide Hann window of `STFT_SIZE` points.
pub static HANN_WINDOW: LazyLock<[f64; STFT_SIZE]> = LazyLock::new(init_hann_window);

/// Sum of the squared window over all overlapping frames at any sample
/// position: the mean of `sin^4` is 3/8, times the number of overlapping
/// frames.
pub const WINDOW_OVERLAP_GAIN: f64 = 3.0 / 8.0 * OVERSAMPLE_FACTOR as f64;

/// Builds the table: `w[i] = w[N-1-i] = sin^2((i + 0.5) * pi / N)`.
fn init_hann_window() -> [f64; STFT_SIZE] {
    let mut ret = [0.0; STFT_SIZE];
    let scale = PI / STFT_SIZE as f64;
    for i in 0..STFT_HALF_SIZE {
        let val = ((i as f64 + 0.5) * scale).sin();
        ret[i] = val * val;
        ret[STFT_SIZE - 1 - i] = val * val;
    }
    ret
}

/// Returns the shared window table.
#[inline]
pub fn hann_window() -> &'static [f64; STFT_SIZE] {
    &HANN_WINDOW
}
