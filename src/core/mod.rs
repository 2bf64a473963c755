//! Core types, the shared window table, FFT plumbing, and the STFT FIFO.

pub mod fft;
pub mod ring_buffer;
pub mod types;
pub mod window;

pub use types::*;
pub use window::hann_window;
