//! STFT analysis: windowed forward transform and phase-difference frequency
//! estimation.

use std::f64::consts::{FRAC_1_PI, PI};

use crate::core::fft::{FftDirection, Transform};
use crate::core::ring_buffer::StftFifo;
use crate::core::types::{BinSet, Complex64, OVERSAMPLE_FACTOR, STFT_BINS, STFT_SIZE};
use crate::core::window::hann_window;
use crate::shift::phase::wrap_half_turns;

/// Phase advance per hop expected of bin 1. Bin 0 has none, bin 2 twice as
/// much, and so on.
pub const EXPECTED_CYCLES: f64 = 2.0 * PI / OVERSAMPLE_FACTOR as f64;

/// Turns each cycle's spectrum into (magnitude, fractional bin) pairs.
///
/// Keeps the phase observed for every bin on the previous cycle.
#[derive(Debug, Clone)]
pub struct SpectralAnalyzer {
    last_phase: [f64; STFT_BINS],
}

impl SpectralAnalyzer {
    pub fn new() -> Self {
        Self {
            last_phase: [0.0; STFT_BINS],
        }
    }

    pub fn reset(&mut self) {
        self.last_phase.fill(0.0);
    }

    /// Last observed analysis phase per bin.
    pub fn last_phase(&self) -> &[f64; STFT_BINS] {
        &self.last_phase
    }

    /// Windows the frame held by `fifo`, transforms it in `scratch`, and
    /// fills `bins`.
    pub fn analyze(
        &mut self,
        fifo: &StftFifo,
        fft: &mut dyn Transform,
        scratch: &mut [Complex64; STFT_SIZE],
        bins: &mut BinSet,
    ) {
        fifo.read_frame(hann_window(), scratch);
        fft.transform(scratch, FftDirection::Forward);
        self.analyze_spectrum(&scratch[..STFT_BINS], bins);
    }

    /// Converts the non-negative-frequency half of a spectrum into
    /// frequency bins.
    ///
    /// The per-hop phase difference minus the expected advance gives the
    /// deviation of the partial from its bin centre, in bins.
    pub fn analyze_spectrum(&mut self, spectrum: &[Complex64], bins: &mut BinSet) {
        debug_assert_eq!(spectrum.len(), STFT_BINS);

        for (k, ((c, last), bin)) in spectrum
            .iter()
            .zip(self.last_phase.iter_mut())
            .zip(bins.iter_mut())
            .enumerate()
        {
            let magnitude = c.norm();
            let phase = c.arg();

            // The expected offset grows by 1/OVERSAMPLE_FACTOR of a turn per
            // bin, so it repeats every OVERSAMPLE_FACTOR bins.
            let bin_offset = (k % OVERSAMPLE_FACTOR) as f64;
            let delta = (phase - *last) - bin_offset * EXPECTED_CYCLES;
            *last = phase;

            let deviation = wrap_half_turns(delta * FRAC_1_PI) * (0.5 * OVERSAMPLE_FACTOR as f64);

            bin.magnitude = magnitude;
            bin.freq_bin = k as f64 + deviation;
        }
    }
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
