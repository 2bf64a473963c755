//! Effect that produces no output, used for empty slots.

use crate::core::types::FloatBufferLine;
use crate::effect::{DeviceInfo, EffectProps, EffectSlot, EffectState, EffectStateFactory};
use crate::mixer::MixParams;

#[derive(Debug, Default)]
pub struct NullState;

impl EffectState for NullState {
    fn device_update(&mut self, _device: &DeviceInfo) {}

    fn update(&mut self, _slot: &EffectSlot, _props: &EffectProps, _target: &MixParams) {}

    fn process(
        &mut self,
        _samples_to_do: usize,
        _samples_in: &[FloatBufferLine],
        _samples_out: &mut [FloatBufferLine],
    ) {
    }
}

struct NullStateFactory;

impl EffectStateFactory for NullStateFactory {
    fn create(&self) -> Box<dyn EffectState> {
        Box::new(NullState)
    }
}

static NULL_FACTORY: NullStateFactory = NullStateFactory;

pub(crate) fn factory() -> &'static dyn EffectStateFactory {
    &NULL_FACTORY
}
