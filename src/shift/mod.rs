//! The spectral pitch-shifting pipeline: analysis, bin remapping, and
//! resynthesis, plus the phase wrapping they share.

pub mod analysis;
pub mod phase;
pub mod remap;
pub mod synthesis;

pub use analysis::SpectralAnalyzer;
pub use remap::remap_bins;
pub use synthesis::SpectralResynthesizer;
