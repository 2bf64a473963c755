//! Fixed-capacity STFT FIFO for real-time audio paths.

use crate::core::types::{Complex64, STFT_SIZE, STFT_STEP};

/// Circular buffer of one STFT frame that both accumulates input and holds
/// finished output.
///
/// The hop at `[pos, pos + STFT_STEP)` holds processed output waiting to be
/// emitted. Each ingested input sample replaces the output sample at the
/// same index as it is read out, so a sample written at a given index is read
/// back as output `STFT_SIZE - STFT_STEP` samples later.
///
/// The buffer never allocates after construction and never shifts memory.
#[derive(Debug, Clone)]
pub struct StftFifo {
    data: Box<[f64; STFT_SIZE]>,
    pos: usize,
    count: usize,
}

impl StftFifo {
    /// Creates a zeroed FIFO at the reset position.
    pub fn new() -> Self {
        Self {
            data: Box::new([0.0; STFT_SIZE]),
            pos: STFT_SIZE - STFT_STEP,
            count: 0,
        }
    }

    /// Zeroes the buffer and rewinds to the reset position.
    pub fn reset(&mut self) {
        self.data.fill(0.0);
        self.pos = STFT_SIZE - STFT_STEP;
        self.count = 0;
    }

    /// Start of the current hop, always a multiple of `STFT_STEP`.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Samples ingested since the last hop boundary.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of samples that can be ingested before the next hop boundary,
    /// capped at `remaining`.
    #[inline]
    pub fn todo(&self, remaining: usize) -> usize {
        (STFT_STEP - self.count).min(remaining)
    }

    /// Emits pending output into `output` and stores `input` in its place.
    ///
    /// Both slices must have the same length, at most [`Self::todo`]. Returns
    /// `true` when the hop completed; `pos` has then advanced and a spectral
    /// cycle must run before more input is ingested.
    pub fn ingest(&mut self, output: &mut [f32], input: &[f32]) -> bool {
        debug_assert_eq!(output.len(), input.len());
        debug_assert!(self.count + input.len() <= STFT_STEP);

        let start = self.pos + self.count;
        let region = &mut self.data[start..start + input.len()];
        for ((slot, out), &inp) in region.iter_mut().zip(output.iter_mut()).zip(input) {
            *out = *slot as f32;
            *slot = f64::from(inp);
        }

        self.count += input.len();
        if self.count < STFT_STEP {
            return false;
        }
        self.count = 0;
        self.pos = (self.pos + STFT_STEP) & (STFT_SIZE - 1);
        true
    }

    /// Writes the full frame starting at `pos` (wrapping) into `frame`,
    /// tapered by `window`, with zero imaginary parts.
    pub fn read_frame(&self, window: &[f64; STFT_SIZE], frame: &mut [Complex64; STFT_SIZE]) {
        let (head, tail) = self.data.split_at(self.pos);
        for ((dst, &src), &w) in frame.iter_mut().zip(tail.iter().chain(head)).zip(window) {
            *dst = Complex64::new(src * w, 0.0);
        }
    }

    /// Replaces the hop at `pos` with finished output samples.
    pub fn store_hop(&mut self, hop: &[f64]) {
        debug_assert_eq!(hop.len(), STFT_STEP);
        self.data[self.pos..self.pos + STFT_STEP].copy_from_slice(hop);
    }

    /// Raw buffer contents in index order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data[..]
    }
}

impl Default for StftFifo {
    fn default() -> Self {
        Self::new()
    }
}
