#![forbid(unsafe_code)]
//! Real-time pitch shifting with an STFT phase vocoder.
//!
//! `pitchshift` transposes a mono signal by up to an octave and a quarter tone
//! in either direction without changing its duration. Each 1024-sample frame,
//! advanced 256 samples at a time, is analyzed into per-bin magnitudes and
//! true frequencies; bins are moved by the pitch ratio and resynthesized with
//! accumulated phases. Output trails input by exactly [`LATENCY`] samples.
//!
//! # Quick Start
//!
//! ```
//! use pitchshift::{PshifterProps, LATENCY};
//!
//! // Half a second of 440 Hz at 44.1 kHz, shifted up a fifth.
//! let input: Vec<f32> = (0..22050)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
//!     .collect();
//!
//! let props = PshifterProps::new(7, 0).unwrap();
//! let output = pitchshift::render(&input, 44100, &props, 512).unwrap();
//! assert_eq!(output.len(), input.len());
//! assert!(LATENCY > 0);
//! ```
//!
//! # Streaming
//!
//! Hosts drive a [`PshifterState`] through the [`EffectState`] interface, one
//! buffer line at a time:
//!
//! ```
//! use pitchshift::{
//!     DeviceInfo, EffectSlot, EffectState, EffectType, MixParams, BUFFER_LINE_SIZE,
//! };
//!
//! let mut state = EffectType::Pshifter.factory().create();
//! state.device_update(&DeviceInfo::default());
//! state.update(
//!     &EffectSlot::default(),
//!     &EffectType::Pshifter.default_props(),
//!     &MixParams::ambisonic(1),
//! );
//!
//! let input = [[0.0f32; BUFFER_LINE_SIZE]];
//! let mut output = [[0.0f32; BUFFER_LINE_SIZE]; 4];
//! state.process(BUFFER_LINE_SIZE, &input, &mut output);
//! ```

pub mod core;
pub mod effect;
pub mod error;
pub mod io;
pub mod mixer;
pub mod shift;

pub use crate::core::types::{FrequencyBin, PitchRatio, BUFFER_LINE_SIZE, STFT_SIZE, STFT_STEP};
pub use effect::{
    DeviceInfo, EffectProps, EffectSlot, EffectState, EffectStateFactory, EffectType,
    PshifterProps, PshifterState,
};
pub use error::PshiftError;
pub use mixer::MixParams;

/// Delay, in samples, between an input sample and its shifted output.
pub const LATENCY: usize = STFT_SIZE;

/// Shifts a whole mono signal offline, compensating the latency.
///
/// The signal runs through a [`PshifterState`] in blocks of `block_size`
/// samples and is mixed onto a single unity-gain line, then [`LATENCY`]
/// samples of silence flush the tail and the leading delay is trimmed, so
/// the result lines up with `input` and has the same length. The output gain
/// fades in from silence over the first blocks, as it does for a freshly
/// created effect.
///
/// # Errors
///
/// Returns [`PshiftError::InvalidBlockSize`] unless
/// `1 <= block_size <= BUFFER_LINE_SIZE`, or a tuning error when `props`
/// is out of range.
pub fn render(
    input: &[f32],
    sample_rate: u32,
    props: &PshifterProps,
    block_size: usize,
) -> Result<Vec<f32>, PshiftError> {
    if block_size == 0 || block_size > BUFFER_LINE_SIZE {
        return Err(PshiftError::InvalidBlockSize(block_size));
    }
    props.validate()?;

    let mut state = PshifterState::new();
    state.device_update(&DeviceInfo {
        sample_rate,
        channels: 1,
    });
    state.update(
        &EffectSlot::default(),
        &EffectProps::Pshifter(*props),
        &MixParams::ambisonic(0),
    );

    let total = input.len() + LATENCY;
    let mut output = Vec::with_capacity(total);
    let mut line_in = [[0.0f32; BUFFER_LINE_SIZE]];
    let mut line_out = [[0.0f32; BUFFER_LINE_SIZE]];

    let mut pos = 0;
    while pos < total {
        let todo = block_size.min(total - pos);
        let src = input.get(pos..).unwrap_or(&[]);
        let avail = src.len().min(todo);
        line_in[0][..avail].copy_from_slice(&src[..avail]);
        line_in[0][avail..todo].fill(0.0);
        line_out[0][..todo].fill(0.0);

        state.process(todo, &line_in, &mut line_out);
        output.extend_from_slice(&line_out[0][..todo]);
        pos += todo;
    }

    output.drain(..LATENCY);
    log::debug!(
        "rendered {} samples at {} cents in blocks of {}",
        output.len(),
        props.total_cents(),
        block_size
    );
    Ok(output)
}
