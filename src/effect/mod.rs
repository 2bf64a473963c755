//! Effect-state interface and factory registration.
//!
//! Every effect a slot can host implements [`EffectState`]. The pipeline
//! picks the implementation through [`EffectType::factory`] and drives it
//! with three calls: `device_update` when the output device is
//! (re)configured, `update` when slot or effect properties change, and
//! `process` once per block on the audio thread.

pub mod null;
pub mod props;
pub mod pshifter;

use crate::core::types::FloatBufferLine;
use crate::mixer::MixParams;

pub use null::NullState;
pub use props::PshifterProps;
pub use pshifter::PshifterState;

/// Output device description handed to `device_update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub sample_rate: u32,
    pub channels: usize,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
        }
    }
}

/// Properties of the slot hosting an effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSlot {
    /// Linear gain applied to the effect's output.
    pub gain: f32,
}

impl Default for EffectSlot {
    fn default() -> Self {
        Self { gain: 1.0 }
    }
}

/// Per-type effect properties.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EffectProps {
    #[default]
    Null,
    Pshifter(PshifterProps),
}

/// Processing state of one effect instance.
///
/// Control calls take `&mut self`, so they can never overlap a `process`
/// call on the same instance; callers on other threads must hand the state
/// over or lock it themselves.
pub trait EffectState: Send {
    /// Clears all history and returns to neutral parameters.
    fn device_update(&mut self, device: &DeviceInfo);

    /// Applies new slot/effect properties and the output layout.
    fn update(&mut self, slot: &EffectSlot, props: &EffectProps, target: &MixParams);

    /// Processes `samples_to_do` samples of `samples_in` and mixes the result
    /// into `samples_out`. Must not allocate.
    fn process(
        &mut self,
        samples_to_do: usize,
        samples_in: &[FloatBufferLine],
        samples_out: &mut [FloatBufferLine],
    );
}

/// Creates effect states of one type.
pub trait EffectStateFactory: Sync {
    fn create(&self) -> Box<dyn EffectState>;
}

/// Effect types the factory registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectType {
    Null,
    Pshifter,
}

impl EffectType {
    /// The process-wide factory for this type.
    pub fn factory(self) -> &'static dyn EffectStateFactory {
        match self {
            EffectType::Null => null::factory(),
            EffectType::Pshifter => pshifter::factory(),
        }
    }

    /// Default properties for this type.
    pub fn default_props(self) -> EffectProps {
        match self {
            EffectType::Null => EffectProps::Null,
            EffectType::Pshifter => EffectProps::Pshifter(PshifterProps::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BUFFER_LINE_SIZE;

    #[test]
    fn test_factories_create_working_states() {
        for ty in [EffectType::Null, EffectType::Pshifter] {
            let mut state = ty.factory().create();
            state.device_update(&DeviceInfo::default());
            state.update(
                &EffectSlot::default(),
                &ty.default_props(),
                &MixParams::ambisonic(1),
            );
            let input = vec![[0.0f32; BUFFER_LINE_SIZE]; 1];
            let mut output = vec![[0.0f32; BUFFER_LINE_SIZE]; 4];
            state.process(BUFFER_LINE_SIZE, &input, &mut output);
            assert!(output.iter().flatten().all(|&s| s == 0.0));
        }
    }

    #[test]
    fn test_factory_is_shared() {
        let a = EffectType::Pshifter.factory() as *const dyn EffectStateFactory as *const ();
        let b = EffectType::Pshifter.factory() as *const dyn EffectStateFactory as *const ();
        assert_eq!(a, b);
    }
}
