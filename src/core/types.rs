//! STFT geometry, sample line types, and the fixed-point pitch ratio.

use rustfft::num_complex::Complex;

/// Transform length of every analysis and synthesis frame.
pub const STFT_SIZE: usize = 1024;
/// Number of unique bins of a real signal's spectrum, minus one.
pub const STFT_HALF_SIZE: usize = STFT_SIZE >> 1;
/// Number of bins carried through analysis, remapping, and resynthesis.
pub const STFT_BINS: usize = STFT_HALF_SIZE + 1;
/// Overlapping frames per frame length.
pub const OVERSAMPLE_FACTOR: usize = 4;

const _: () = assert!(
    STFT_SIZE % OVERSAMPLE_FACTOR == 0,
    "oversample factor must be a clean divisor of the frame size"
);
const _: () = assert!(STFT_SIZE.is_power_of_two());

/// Hop size: new input samples consumed (and output produced) per cycle.
pub const STFT_STEP: usize = STFT_SIZE / OVERSAMPLE_FACTOR;

/// Samples per pipeline block line.
pub const BUFFER_LINE_SIZE: usize = 1024;

/// One block of pipeline samples for a single channel.
pub type FloatBufferLine = [f32; BUFFER_LINE_SIZE];

/// Highest output channel count an effect mixes into (third-order ambisonics).
pub const MAX_AMBI_CHANNELS: usize = 16;

/// Double-precision complex sample used by the transform.
pub type Complex64 = Complex<f64>;

/// Fractional bits of the fixed-point pitch ratio.
pub const MIXER_FRAC_BITS: u32 = 16;
/// Fixed-point representation of 1.0.
pub const MIXER_FRAC_ONE: u32 = 1 << MIXER_FRAC_BITS;
/// Fixed-point representation of 0.5, used for half-up rounding.
pub const MIXER_FRAC_HALF: u32 = MIXER_FRAC_ONE >> 1;

/// Magnitude and fractional bin index of one spectral partial.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrequencyBin {
    pub magnitude: f64,
    pub freq_bin: f64,
}

/// Spectral bins of one cycle, either pre-shift (analysis) or post-shift
/// (synthesis).
pub type BinSet = [FrequencyBin; STFT_BINS];

/// Pitch ratio held both as a 16.16 fixed-point integer and as the float
/// derived from it.
///
/// The integer drives bin-index arithmetic; the float scales frequencies.
/// The float is always `int / 65536` so the two never disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchRatio {
    fixed: u32,
    float: f64,
}

impl PitchRatio {
    /// Unity ratio (no pitch change).
    pub const UNITY: PitchRatio = PitchRatio {
        fixed: MIXER_FRAC_ONE,
        float: 1.0,
    };

    /// Creates a ratio from its fixed-point representation.
    #[inline]
    pub fn from_fixed(fixed: u32) -> Self {
        Self {
            fixed,
            float: f64::from(fixed) * (1.0 / f64::from(MIXER_FRAC_ONE)),
        }
    }

    /// Quantizes a float ratio to the nearest fixed-point step.
    ///
    /// Zero, negative, and non-finite inputs are not rejected here; they
    /// saturate to the nearest representable integer.
    #[inline]
    pub fn from_ratio(ratio: f32) -> Self {
        Self::from_fixed((ratio * MIXER_FRAC_ONE as f32).round() as u32)
    }

    /// Converts a tuning offset in cents into a ratio, `2^(cents/1200)`.
    #[inline]
    pub fn from_cents(cents: i32) -> Self {
        Self::from_ratio(2.0f32.powf(cents as f32 / 1200.0))
    }

    /// Fixed-point integer (16 fractional bits).
    #[inline]
    pub fn fixed(&self) -> u32 {
        self.fixed
    }

    /// Float ratio derived from the fixed-point value.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.float
    }
}

impl Default for PitchRatio {
    fn default() -> Self {
        Self::UNITY
    }
}
