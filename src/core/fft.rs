//! In-place complex transform used by the STFT pipeline.

use std::sync::Arc;

use rustfft::{Fft, FftPlanner};

use crate::core::types::{Complex64, STFT_SIZE};

/// Zero-valued complex number, used for FFT buffer initialization.
pub const COMPLEX_ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Direction of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftDirection {
    Forward,
    Inverse,
}

/// An unnormalized, in-place transform over one STFT frame.
///
/// Implementations must not allocate inside [`Transform::transform`].
pub trait Transform: Send {
    fn transform(&mut self, buffer: &mut [Complex64; STFT_SIZE], direction: FftDirection);
}

/// [`Transform`] backed by `rustfft`, planned once with reusable scratch.
pub struct RustFftTransform {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex64>,
}

impl RustFftTransform {
    pub fn new() -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(STFT_SIZE);
        let inverse = planner.plan_fft_inverse(STFT_SIZE);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        Self {
            forward,
            inverse,
            scratch: vec![COMPLEX_ZERO; scratch_len],
        }
    }
}

impl Default for RustFftTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for RustFftTransform {
    fn transform(&mut self, buffer: &mut [Complex64; STFT_SIZE], direction: FftDirection) {
        let fft = match direction {
            FftDirection::Forward => &self.forward,
            FftDirection::Inverse => &self.inverse,
        };
        fft.process_with_scratch(buffer, &mut self.scratch);
    }
}
