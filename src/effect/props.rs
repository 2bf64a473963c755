//! User-facing pitch shifter properties.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PshiftError;

pub const MIN_COARSE_TUNE: i32 = -12;
pub const MAX_COARSE_TUNE: i32 = 12;
pub const DEFAULT_COARSE_TUNE: i32 = 12;

pub const MIN_FINE_TUNE: i32 = -50;
pub const MAX_FINE_TUNE: i32 = 50;
pub const DEFAULT_FINE_TUNE: i32 = 0;

/// Tuning of the pitch shifter, as semitones plus cents.
///
/// The setters reject out-of-range values. Fields are public so a host can
/// fill them directly; the effect itself does not re-validate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PshifterProps {
    pub coarse_tune: i32,
    pub fine_tune: i32,
}

impl PshifterProps {
    /// Builds validated properties.
    pub fn new(coarse_tune: i32, fine_tune: i32) -> Result<Self, PshiftError> {
        let mut props = Self::default();
        props.set_coarse_tune(coarse_tune)?;
        props.set_fine_tune(fine_tune)?;
        Ok(props)
    }

    pub fn set_coarse_tune(&mut self, semitones: i32) -> Result<(), PshiftError> {
        if !(MIN_COARSE_TUNE..=MAX_COARSE_TUNE).contains(&semitones) {
            return Err(PshiftError::CoarseTuneOutOfRange(semitones));
        }
        self.coarse_tune = semitones;
        Ok(())
    }

    pub fn set_fine_tune(&mut self, cents: i32) -> Result<(), PshiftError> {
        if !(MIN_FINE_TUNE..=MAX_FINE_TUNE).contains(&cents) {
            return Err(PshiftError::FineTuneOutOfRange(cents));
        }
        self.fine_tune = cents;
        Ok(())
    }

    /// Total tuning offset in cents.
    #[inline]
    pub fn total_cents(&self) -> i32 {
        self.coarse_tune * 100 + self.fine_tune
    }

    /// Checks both fields, e.g. after deserializing.
    pub fn validate(&self) -> Result<(), PshiftError> {
        Self::new(self.coarse_tune, self.fine_tune).map(|_| ())
    }

    /// Loads and validates properties from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, PshiftError> {
        let data = std::fs::read_to_string(path)?;
        let props: Self = serde_json::from_str(&data)?;
        props.validate()?;
        Ok(props)
    }
}

impl Default for PshifterProps {
    fn default() -> Self {
        Self {
            coarse_tune: DEFAULT_COARSE_TUNE,
            fine_tune: DEFAULT_FINE_TUNE,
        }
    }
}
