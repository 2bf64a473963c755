#![allow(dead_code)]

use std::f64::consts::PI;

use pitchshift::PshifterState;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Sine at `cycles_per_sample`, i.e. bin `k` of an N-point transform is
/// `k / N` cycles per sample.
pub fn gen_sine(cycles_per_sample: f64, n: usize, amp: f32) -> Vec<f32> {
    (0..n)
        .map(|i| amp * (2.0 * PI * cycles_per_sample * i as f64).sin() as f32)
        .collect()
}

pub fn gen_impulse(n: usize, at: usize, amp: f32) -> Vec<f32> {
    let mut out = vec![0.0f32; n];
    if at < n {
        out[at] = amp;
    }
    out
}

/// Deterministic pseudo-random noise in [-amp, amp].
pub fn gen_noise(n: usize, seed: u64, amp: f32) -> Vec<f32> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let unit = (state >> 40) as f32 / (1u64 << 24) as f32;
            amp * (unit * 2.0 - 1.0)
        })
        .collect()
}

/// A state tuned to `cents`, fresh from reset.
pub fn shifter(cents: i32) -> PshifterState {
    let mut state = PshifterState::new();
    state.set_tuning_cents(cents);
    state
}

/// Streams `input` through `state` with blocks cycling through `blocks`.
pub fn run_blocks(state: &mut PshifterState, input: &[f32], blocks: &[usize]) -> Vec<f32> {
    let mut output = vec![0.0f32; input.len()];
    let mut pos = 0;
    let mut i = 0;
    while pos < input.len() {
        let n = blocks[i % blocks.len()].max(1).min(input.len() - pos);
        state.process_mono(&input[pos..pos + n], &mut output[pos..pos + n]);
        pos += n;
        i += 1;
    }
    output
}

pub fn run_in_blocks_of(state: &mut PshifterState, input: &[f32], block: usize) -> Vec<f32> {
    run_blocks(state, input, &[block])
}

pub fn windowed_rms(signal: &[f32], start: usize, len: usize) -> f64 {
    let start = start.min(signal.len());
    let end = (start + len).min(signal.len());
    if end <= start {
        return 0.0;
    }
    let sum_sq: f64 = signal[start..end]
        .iter()
        .map(|&s| f64::from(s) * f64::from(s))
        .sum();
    (sum_sq / (end - start) as f64).sqrt()
}

/// Magnitude spectrum of `signal` (Hann-windowed, unnormalized).
pub fn magnitude_spectrum(signal: &[f32]) -> Vec<f64> {
    let n = signal.len();
    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let w = 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos();
            Complex::new(f64::from(s) * w, 0.0)
        })
        .collect();
    FftPlanner::new().plan_fft_forward(n).process(&mut buffer);
    buffer[..=n / 2].iter().map(|c| c.norm()).collect()
}

/// Index of the strongest non-DC bin of `signal`'s spectrum.
pub fn peak_bin(signal: &[f32]) -> usize {
    let spectrum = magnitude_spectrum(signal);
    spectrum
        .iter()
        .enumerate()
        .skip(1)
        .fold((0, f64::NEG_INFINITY), |best, (i, &m)| {
            if m > best.1 {
                (i, m)
            } else {
                best
            }
        })
        .0
}

pub fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

pub fn first_above(signal: &[f32], threshold: f32) -> Option<usize> {
    signal.iter().position(|s| s.abs() > threshold)
}
