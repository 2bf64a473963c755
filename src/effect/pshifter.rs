//! Phase-vocoder pitch shifter effect.
//!
//! Pitch shifter engine based on the work of Stephan Bernsee:
//! <http://blogs.zynaptiq.com/bernsee/pitch-shifting-using-the-ft/>
//!
//! Input streams through an [`StftFifo`]. Every `STFT_STEP` samples the
//! latest `STFT_SIZE`-sample frame is analyzed into per-bin magnitudes and
//! true frequencies, the bins are moved by the pitch ratio, and the frame is
//! resynthesized and overlap-added back into the FIFO, where it is read out
//! as the block's output `STFT_SIZE` samples after the matching input.

use crate::core::fft::{RustFftTransform, Transform, COMPLEX_ZERO};
use crate::core::ring_buffer::StftFifo;
use crate::core::types::{
    BinSet, Complex64, FloatBufferLine, FrequencyBin, PitchRatio, BUFFER_LINE_SIZE,
    MAX_AMBI_CHANNELS, STFT_BINS, STFT_SIZE,
};
use crate::effect::{DeviceInfo, EffectProps, EffectSlot, EffectState, EffectStateFactory};
use crate::mixer::{
    calc_direction_coeffs, compute_pan_gains, mix_samples, MixParams, GAIN_FADE_SAMPLES,
};
use crate::shift::analysis::SpectralAnalyzer;
use crate::shift::remap::remap_bins;
use crate::shift::synthesis::SpectralResynthesizer;

/// The shifted signal is panned straight ahead.
const FRONT: [f32; 3] = [0.0, 0.0, -1.0];

/// Pitch shifter state for one effect slot.
///
/// All buffers are allocated at construction; processing never allocates.
pub struct PshifterState {
    fifo: StftFifo,
    analyzer: SpectralAnalyzer,
    resynth: SpectralResynthesizer,
    ratio: PitchRatio,

    fft: Box<dyn Transform>,
    fft_buffer: Box<[Complex64; STFT_SIZE]>,
    analysis: Box<BinSet>,
    synthesis: Box<BinSet>,

    buffer_out: Box<FloatBufferLine>,

    current_gains: [f32; MAX_AMBI_CHANNELS],
    target_gains: [f32; MAX_AMBI_CHANNELS],
}

impl PshifterState {
    /// Creates a state using the default `rustfft` transform.
    pub fn new() -> Self {
        Self::with_transform(Box::new(RustFftTransform::new()))
    }

    /// Creates a state that runs its spectra through `fft`.
    pub fn with_transform(fft: Box<dyn Transform>) -> Self {
        Self {
            fifo: StftFifo::new(),
            analyzer: SpectralAnalyzer::new(),
            resynth: SpectralResynthesizer::new(),
            ratio: PitchRatio::UNITY,
            fft,
            fft_buffer: Box::new([COMPLEX_ZERO; STFT_SIZE]),
            analysis: Box::new([FrequencyBin::default(); STFT_BINS]),
            synthesis: Box::new([FrequencyBin::default(); STFT_BINS]),
            buffer_out: Box::new([0.0; BUFFER_LINE_SIZE]),
            current_gains: [0.0; MAX_AMBI_CHANNELS],
            target_gains: [0.0; MAX_AMBI_CHANNELS],
        }
    }

    /// Clears every buffer and returns to unity pitch with silent gains.
    pub fn reset(&mut self) {
        self.fifo.reset();
        self.analyzer.reset();
        self.resynth.reset();
        self.ratio = PitchRatio::UNITY;

        self.fft_buffer.fill(COMPLEX_ZERO);
        self.analysis.fill(FrequencyBin::default());
        self.synthesis.fill(FrequencyBin::default());
        self.buffer_out.fill(0.0);

        self.current_gains.fill(0.0);
        self.target_gains.fill(0.0);
    }

    /// Sets the pitch from a tuning offset in cents.
    pub fn set_tuning_cents(&mut self, cents: i32) {
        self.ratio = PitchRatio::from_cents(cents);
    }

    #[inline]
    pub fn pitch_ratio(&self) -> PitchRatio {
        self.ratio
    }

    #[inline]
    pub fn fifo(&self) -> &StftFifo {
        &self.fifo
    }

    #[inline]
    pub fn analyzer(&self) -> &SpectralAnalyzer {
        &self.analyzer
    }

    #[inline]
    pub fn resynthesizer(&self) -> &SpectralResynthesizer {
        &self.resynth
    }

    #[inline]
    pub fn current_gains(&self) -> &[f32; MAX_AMBI_CHANNELS] {
        &self.current_gains
    }

    #[inline]
    pub fn target_gains(&self) -> &[f32; MAX_AMBI_CHANNELS] {
        &self.target_gains
    }

    /// Shifted mono signal of the most recent block, before mixing.
    #[inline]
    pub fn output_line(&self) -> &FloatBufferLine {
        &self.buffer_out
    }

    /// Samples between an input sample and its processed output.
    #[inline]
    pub fn latency_samples(&self) -> usize {
        STFT_SIZE
    }

    /// Runs `input` through the shifter into `output` without mixing.
    ///
    /// Slices must have equal length; any length works, across any number
    /// of hop boundaries.
    pub fn process_mono(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());

        for (src, dst) in input
            .chunks(BUFFER_LINE_SIZE)
            .zip(output.chunks_mut(BUFFER_LINE_SIZE))
        {
            self.shift_block(src);
            dst.copy_from_slice(&self.buffer_out[..src.len()]);
        }
    }

    /// Streams at most one buffer line through the FIFO into `buffer_out`,
    /// running a spectral cycle at every hop boundary.
    fn shift_block(&mut self, input: &[f32]) {
        let mut base = 0;
        while base < input.len() {
            let todo = self.fifo.todo(input.len() - base);
            let range = base..base + todo;
            let hop_done = self
                .fifo
                .ingest(&mut self.buffer_out[range.clone()], &input[range]);
            base += todo;

            if hop_done {
                self.run_cycle();
            }
        }
    }

    /// Analysis, bin remapping, and resynthesis of the frame ending at the
    /// hop just completed.
    fn run_cycle(&mut self) {
        self.analyzer.analyze(
            &self.fifo,
            self.fft.as_mut(),
            &mut self.fft_buffer,
            &mut self.analysis,
        );
        remap_bins(&self.analysis, self.ratio, &mut self.synthesis);
        self.resynth.synthesize(
            &self.synthesis,
            self.fft.as_mut(),
            &mut self.fft_buffer,
            &mut self.fifo,
        );
    }
}

impl Default for PshifterState {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectState for PshifterState {
    fn device_update(&mut self, device: &DeviceInfo) {
        log::debug!(
            "pshifter: resetting for {} Hz, {} channels",
            device.sample_rate,
            device.channels
        );
        self.reset();
    }

    fn update(&mut self, slot: &EffectSlot, props: &EffectProps, target: &MixParams) {
        match props {
            EffectProps::Pshifter(props) => {
                self.set_tuning_cents(props.total_cents());
                log::debug!(
                    "pshifter: {} cents -> ratio {:.6} (fixed {})",
                    props.total_cents(),
                    self.ratio.as_f64(),
                    self.ratio.fixed()
                );
            }
            other => {
                log::warn!("pshifter: ignoring properties for another effect: {:?}", other);
            }
        }

        let coeffs = calc_direction_coeffs(FRONT);
        compute_pan_gains(target, &coeffs, slot.gain, &mut self.target_gains);
    }

    fn process(
        &mut self,
        samples_to_do: usize,
        samples_in: &[FloatBufferLine],
        samples_out: &mut [FloatBufferLine],
    ) {
        let Some(input) = samples_in.first() else {
            return;
        };
        let samples_to_do = samples_to_do.min(BUFFER_LINE_SIZE);

        self.shift_block(&input[..samples_to_do]);

        mix_samples(
            &self.buffer_out[..samples_to_do],
            samples_out,
            &mut self.current_gains,
            &self.target_gains,
            samples_to_do.max(GAIN_FADE_SAMPLES),
            0,
        );
    }
}

struct PshifterStateFactory;

impl EffectStateFactory for PshifterStateFactory {
    fn create(&self) -> Box<dyn EffectState> {
        log::trace!("pshifter: creating effect state");
        Box::new(PshifterState::new())
    }
}

static PSHIFTER_FACTORY: PshifterStateFactory = PshifterStateFactory;

pub(crate) fn factory() -> &'static dyn EffectStateFactory {
    &PSHIFTER_FACTORY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::STFT_STEP;
    use crate::effect::PshifterProps;

    fn mono_target() -> MixParams {
        MixParams {
            ambi_map: vec![crate::mixer::AmbiChannel {
                scale: 1.0,
                index: 0,
            }],
        }
    }

    #[test]
    fn test_new_state_is_unity_and_silent() {
        let state = PshifterState::new();
        assert_eq!(state.pitch_ratio(), PitchRatio::UNITY);
        assert_eq!(state.fifo().pos(), STFT_SIZE - STFT_STEP);
        assert!(state.current_gains().iter().all(|&g| g == 0.0));
        assert!(state.target_gains().iter().all(|&g| g == 0.0));
        assert_eq!(state.latency_samples(), STFT_SIZE);
    }

    #[test]
    fn test_update_sets_ratio_and_front_gains() {
        let mut state = PshifterState::new();
        let props = EffectProps::Pshifter(PshifterProps::new(7, 0).unwrap());
        let slot = EffectSlot { gain: 0.5 };
        state.update(&slot, &props, &MixParams::ambisonic(1));

        assert_eq!(state.pitch_ratio().fixed(), 98193);
        let gains = state.target_gains();
        assert!((gains[0] - 0.5).abs() < 1e-6);
        assert!(gains[1].abs() < 1e-6);
        assert!(gains[2].abs() < 1e-6);
        assert!((gains[3] - 0.5 * 1.732_050_8).abs() < 1e-5);
        assert!(gains[4..].iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_update_with_foreign_props_keeps_ratio() {
        let mut state = PshifterState::new();
        state.set_tuning_cents(1200);
        state.update(&EffectSlot::default(), &EffectProps::Null, &mono_target());
        assert_eq!(state.pitch_ratio().fixed(), 131072);
        assert_eq!(state.target_gains()[0], 1.0);
    }

    #[test]
    fn test_device_update_resets_everything() {
        let mut state = PshifterState::new();
        state.update(
            &EffectSlot::default(),
            &EffectProps::Pshifter(PshifterProps::default()),
            &mono_target(),
        );
        let input = [[0.25f32; BUFFER_LINE_SIZE]];
        let mut output = [[0.0f32; BUFFER_LINE_SIZE]];
        state.process(700, &input, &mut output);

        state.device_update(&DeviceInfo::default());
        assert_eq!(state.pitch_ratio(), PitchRatio::UNITY);
        assert_eq!(state.fifo().pos(), STFT_SIZE - STFT_STEP);
        assert_eq!(state.fifo().count(), 0);
        assert!(state.fifo().as_slice().iter().all(|&s| s == 0.0));
        assert!(state.analyzer().last_phase().iter().all(|&p| p == 0.0));
        assert!(state.resynthesizer().sum_phase().iter().all(|&p| p == 0.0));
        assert!(state.current_gains().iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_process_counts_hops_across_blocks() {
        let mut state = PshifterState::new();
        let input = [[0.0f32; BUFFER_LINE_SIZE]];
        let mut output = [[0.0f32; BUFFER_LINE_SIZE]];

        state.process(100, &input, &mut output);
        assert_eq!(state.fifo().count(), 100);
        assert_eq!(state.fifo().pos(), STFT_SIZE - STFT_STEP);

        state.process(1000, &input, &mut output);
        // 1100 samples: four full hops and 76 left over.
        assert_eq!(state.fifo().count(), 76);
        assert_eq!(state.fifo().pos(), (STFT_SIZE - STFT_STEP + 4 * STFT_STEP) % STFT_SIZE);
    }

    #[test]
    fn test_process_without_input_lines_is_a_no_op() {
        let mut state = PshifterState::new();
        let mut output = [[1.0f32; BUFFER_LINE_SIZE]];
        state.process(BUFFER_LINE_SIZE, &[], &mut output);
        assert!(output[0].iter().all(|&s| s == 1.0));
        assert_eq!(state.fifo().count(), 0);
    }

    #[test]
    fn test_output_is_silent_during_first_frame() {
        let mut state = PshifterState::new();
        let input: Vec<f32> = (0..STFT_SIZE).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut output = vec![1.0f32; STFT_SIZE];
        state.process_mono(&input, &mut output);
        // The first hop reads out the zeroed FIFO; later hops carry only
        // transform round-off of the zero history.
        assert!(output[..STFT_STEP].iter().all(|&s| s == 0.0));
        assert!(output.iter().all(|&s| s.abs() < 1e-6));
    }

    #[test]
    fn test_process_mixes_with_ramped_gain() {
        let mut state = PshifterState::new();
        state.update(
            &EffectSlot::default(),
            &EffectProps::Pshifter(PshifterProps::new(0, 0).unwrap()),
            &mono_target(),
        );
        let input = [[0.5f32; BUFFER_LINE_SIZE]];
        let mut output = [[0.0f32; BUFFER_LINE_SIZE]];
        for _ in 0..4 {
            output[0].fill(0.0);
            state.process(BUFFER_LINE_SIZE, &input, &mut output);
        }
        // The first block ran the full ramp, so the gain has reached target.
        assert_eq!(state.current_gains()[0], 1.0);
        for (mixed, &shifted) in output[0].iter().zip(state.output_line().iter()) {
            assert!((mixed - shifted).abs() < 1e-6);
        }
    }
}
