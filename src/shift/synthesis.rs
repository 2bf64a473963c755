//! Phase-accumulating resynthesis with windowed overlap-add.

use crate::core::fft::{FftDirection, Transform};
use crate::core::ring_buffer::StftFifo;
use crate::core::types::{BinSet, Complex64, STFT_BINS, STFT_SIZE, STFT_STEP};
use crate::core::window::{hann_window, WINDOW_OVERLAP_GAIN};
use crate::shift::analysis::EXPECTED_CYCLES;
use crate::shift::phase::wrap_phase;

/// Output normalization: undoes the unnormalized inverse transform and the
/// overlap-added gain of the squared window.
pub const OUTPUT_SCALE: f64 = 1.0 / (STFT_SIZE as f64 * WINDOW_OVERLAP_GAIN);

/// Rebuilds time-domain frames from synthesis bins and overlap-adds them.
#[derive(Debug, Clone)]
pub struct SpectralResynthesizer {
    /// Accumulated synthesis phase per bin, kept within (-pi, pi].
    sum_phase: [f64; STFT_BINS],
    output_accum: Box<[f64; STFT_SIZE]>,
}

impl SpectralResynthesizer {
    pub fn new() -> Self {
        Self {
            sum_phase: [0.0; STFT_BINS],
            output_accum: Box::new([0.0; STFT_SIZE]),
        }
    }

    pub fn reset(&mut self) {
        self.sum_phase.fill(0.0);
        self.output_accum.fill(0.0);
    }

    pub fn sum_phase(&self) -> &[f64; STFT_BINS] {
        &self.sum_phase
    }

    /// Overlap-add samples not yet handed to the FIFO.
    pub fn output_accum(&self) -> &[f64; STFT_SIZE] {
        &self.output_accum
    }

    /// Runs one resynthesis cycle and publishes the finished hop at the
    /// FIFO's current position.
    pub fn synthesize(
        &mut self,
        bins: &BinSet,
        fft: &mut dyn Transform,
        scratch: &mut [Complex64; STFT_SIZE],
        fifo: &mut StftFifo,
    ) {
        self.build_spectrum(bins, scratch);
        fft.transform(scratch, FftDirection::Inverse);
        self.overlap_add(scratch, fifo.pos());

        let pos = fifo.pos();
        let hop = &mut self.output_accum[pos..pos + STFT_STEP];
        fifo.store_hop(hop);
        hop.fill(0.0);
    }

    /// Integrates each bin's frequency into its phase and writes the full,
    /// conjugate-symmetric spectrum.
    pub fn build_spectrum(&mut self, bins: &BinSet, spectrum: &mut [Complex64; STFT_SIZE]) {
        for ((sum, bin), dst) in self
            .sum_phase
            .iter_mut()
            .zip(bins.iter())
            .zip(spectrum.iter_mut())
        {
            // Left unwrapped, the sum would grow without bound and lose
            // precision.
            *sum = wrap_phase(*sum + bin.freq_bin * EXPECTED_CYCLES);
            *dst = Complex64::from_polar(bin.magnitude, *sum);
        }
        for k in STFT_BINS..STFT_SIZE {
            spectrum[k] = spectrum[STFT_SIZE - k].conj();
        }
    }

    /// Accumulates the windowed real part of `frame` starting at `pos`,
    /// wrapping around the accumulation buffer.
    fn overlap_add(&mut self, frame: &[Complex64; STFT_SIZE], pos: usize) {
        let window = hann_window();
        let (head, tail) = self.output_accum.split_at_mut(pos);
        for ((dst, c), &w) in tail.iter_mut().chain(head).zip(frame).zip(window) {
            *dst += w * c.re * OUTPUT_SCALE;
        }
    }
}

impl Default for SpectralResynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
