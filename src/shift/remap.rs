//! Moves analysis bins to their pitch-shifted synthesis positions.

use crate::core::types::{
    BinSet, FrequencyBin, PitchRatio, MIXER_FRAC_BITS, MIXER_FRAC_HALF, STFT_BINS,
};

/// Largest fixed-point product `k * ratio` whose rounded index still lands on
/// a valid synthesis bin.
const BIN_LIMIT: u64 = ((STFT_BINS as u64) << MIXER_FRAC_BITS) - MIXER_FRAC_HALF as u64 - 1;

/// Number of analysis bins that map inside the synthesis set for `ratio`.
///
/// A zero ratio maps every bin onto DC, so all bins are kept.
#[inline]
pub fn bin_count(ratio: PitchRatio) -> usize {
    match BIN_LIMIT.checked_div(u64::from(ratio.fixed())) {
        Some(limit) => STFT_BINS.min(limit as usize + 1),
        None => STFT_BINS,
    }
}

/// Synthesis index for analysis bin `k`, rounded half-up.
#[inline]
pub fn target_bin(k: usize, ratio: PitchRatio) -> usize {
    ((k as u64 * u64::from(ratio.fixed()) + u64::from(MIXER_FRAC_HALF)) >> MIXER_FRAC_BITS)
        as usize
}

/// Shifts `analysis` by `ratio` into `synthesis`.
///
/// Magnitudes landing on the same synthesis bin are summed. The bin keeps the
/// scaled frequency of whichever contributor was louder than everything
/// accumulated there before it, rather than simply the last one.
pub fn remap_bins(analysis: &BinSet, ratio: PitchRatio, synthesis: &mut BinSet) {
    synthesis.fill(FrequencyBin::default());

    let scale = ratio.as_f64();
    for (k, src) in analysis.iter().take(bin_count(ratio)).enumerate() {
        let dst = &mut synthesis[target_bin(k, ratio)];
        if src.magnitude > dst.magnitude {
            dst.freq_bin = src.freq_bin * scale;
        }
        dst.magnitude += src.magnitude;
    }
}
