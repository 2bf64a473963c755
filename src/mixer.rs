//! Gain computation and gain-ramped mixing of an effect's mono output into
//! the shared ambisonic output lines.

use crate::core::types::{FloatBufferLine, MAX_AMBI_CHANNELS};

/// Gains at or below this are treated as silent and skipped.
pub const GAIN_SILENCE_THRESHOLD: f32 = 0.00001;

/// Minimum length, in samples, of a gain ramp.
pub const GAIN_FADE_SAMPLES: usize = 512;

/// Ambisonic coefficients, ACN order with N3D normalization.
pub type AmbiCoeffs = [f32; MAX_AMBI_CHANNELS];

/// One output line of a mix target: the ambisonic channel it carries and
/// the decoder scale applied to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbiChannel {
    pub scale: f32,
    pub index: usize,
}

/// Channel layout of the buffer an effect mixes into.
#[derive(Debug, Clone, PartialEq)]
pub struct MixParams {
    pub ambi_map: Vec<AmbiChannel>,
}

impl MixParams {
    /// Full ambisonic layout of the given order, one line per ACN channel.
    ///
    /// Orders above three are clamped.
    pub fn ambisonic(order: usize) -> Self {
        let channels = ((order + 1) * (order + 1)).min(MAX_AMBI_CHANNELS);
        Self {
            ambi_map: (0..channels)
                .map(|index| AmbiChannel { scale: 1.0, index })
                .collect(),
        }
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.ambi_map.len()
    }
}

impl Default for MixParams {
    fn default() -> Self {
        Self::ambisonic(1)
    }
}

/// Ambisonic coefficients (up to third order) for a unit direction given in
/// right-handed coordinates: +x right, +y up, -z front.
pub fn calc_direction_coeffs(dir: [f32; 3]) -> AmbiCoeffs {
    // Convert to the ambisonic frame: +x front, +y left, +z up.
    let x = -dir[2];
    let y = -dir[0];
    let z = dir[1];

    let (xx, yy, zz) = (x * x, y * y, z * z);
    let (xy, yz, xz) = (x * y, y * z, x * z);

    let mut coeffs = [0.0; MAX_AMBI_CHANNELS];
    coeffs[0] = 1.0;
    // First order
    coeffs[1] = 1.732_050_8 * y;
    coeffs[2] = 1.732_050_8 * z;
    coeffs[3] = 1.732_050_8 * x;
    // Second order
    coeffs[4] = 3.872_983_3 * xy;
    coeffs[5] = 3.872_983_3 * yz;
    coeffs[6] = 1.118_034 * (3.0 * zz - 1.0);
    coeffs[7] = 3.872_983_3 * xz;
    coeffs[8] = 1.936_491_7 * (xx - yy);
    // Third order
    coeffs[9] = 2.091_650_1 * (y * (3.0 * xx - yy));
    coeffs[10] = 10.246_951 * (z * xy);
    coeffs[11] = 1.620_185_2 * (y * (5.0 * zz - 1.0));
    coeffs[12] = 1.322_875_7 * (z * (5.0 * zz - 3.0));
    coeffs[13] = 1.620_185_2 * (x * (5.0 * zz - 1.0));
    coeffs[14] = 5.123_475_4 * (z * (xx - yy));
    coeffs[15] = 2.091_650_1 * (x * (xx - 3.0 * yy));
    coeffs
}

/// Per-line gains that pan a source with `coeffs` into `mix`, scaled by
/// `in_gain`. Lines past the target's channel count get zero.
pub fn compute_pan_gains(
    mix: &MixParams,
    coeffs: &AmbiCoeffs,
    in_gain: f32,
    gains: &mut [f32; MAX_AMBI_CHANNELS],
) {
    gains.fill(0.0);
    for (gain, chan) in gains.iter_mut().zip(&mix.ambi_map) {
        let coeff = coeffs.get(chan.index).copied().unwrap_or(0.0);
        *gain = chan.scale * coeff * in_gain;
    }
}

/// Adds `input` into each output line starting at `out_pos`, ramping every
/// line's gain from `current_gains` toward `target_gains`.
///
/// The ramp spans `counter` samples; when it finishes within this call the
/// line snaps to its target, otherwise the partially ramped gain is stored
/// back for the next call.
pub fn mix_samples(
    input: &[f32],
    output: &mut [FloatBufferLine],
    current_gains: &mut [f32; MAX_AMBI_CHANNELS],
    target_gains: &[f32; MAX_AMBI_CHANNELS],
    counter: usize,
    out_pos: usize,
) {
    let delta = if counter > 0 { 1.0 / counter as f32 } else { 0.0 };
    let min_len = counter.min(input.len());

    for ((line, gain_slot), &target) in output
        .iter_mut()
        .zip(current_gains.iter_mut())
        .zip(target_gains.iter())
    {
        let dst = &mut line[out_pos..out_pos + input.len()];
        let mut gain = *gain_slot;
        let step = (target - gain) * delta;

        let mut pos = 0;
        if step.abs() > f32::EPSILON {
            let mut step_count = 0.0f32;
            for (d, &s) in dst[..min_len].iter_mut().zip(&input[..min_len]) {
                *d += s * (gain + step * step_count);
                step_count += 1.0;
            }
            pos = min_len;
            gain = if pos == counter {
                target
            } else {
                gain + step * step_count
            };
        } else {
            gain = target;
        }
        *gain_slot = gain;

        if gain.abs() <= GAIN_SILENCE_THRESHOLD {
            continue;
        }
        for (d, &s) in dst[pos..].iter_mut().zip(&input[pos..]) {
            *d += s * gain;
        }
    }
}
