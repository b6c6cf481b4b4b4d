//! Per-doctor duration adjustment.
//!
//! A measured override for the (doctor, procedure) pair always wins.
//! Otherwise the base duration is scaled by the doctor's coefficient for the
//! procedure's category and quantized to 10-second buckets, half rounding up.

use crate::duration::whole_seconds;
use crate::error::FormatterError;
use crate::model::{BASELINE_COEFFICIENT, DoctorProfile, OverrideRule, ProcedureTimeRecord};
use std::collections::HashMap;

/// Bucket size for computed durations, in seconds.
pub const QUANTUM_SECONDS: u32 = 10;

/// Scaled durations are snapped to whole milliseconds before bucketing.
const MILLIS_PER_SECOND: u64 = 1000;

/// How a doctor's time for a procedure was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Taken verbatim from an [`OverrideRule`].
    Overridden(u32),
    /// Derived from the base duration and the doctor's coefficient.
    Computed(u32),
}

impl Adjustment {
    pub fn seconds(self) -> u32 {
        match self {
            Adjustment::Overridden(s) | Adjustment::Computed(s) => s,
        }
    }

    pub fn is_override(self) -> bool {
        matches!(self, Adjustment::Overridden(_))
    }
}

/// Sparse (doctor id, procedure name) → seconds lookup.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable<'a> {
    entries: HashMap<(&'a str, &'a str), u32>,
}

impl<'a> OverrideTable<'a> {
    /// Index override rules. A later rule for the same pair replaces an earlier one.
    pub fn new(rules: &'a [OverrideRule]) -> Self {
        let entries = rules
            .iter()
            .map(|r| ((r.doctor_id.as_str(), r.procedure.as_str()), r.seconds))
            .collect();
        Self { entries }
    }

    pub fn get(&self, doctor_id: &str, procedure: &str) -> Option<u32> {
        self.entries.get(&(doctor_id, procedure)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decide a doctor's duration for a procedure.
pub fn adjust(
    doctor: &DoctorProfile,
    procedure: &ProcedureTimeRecord,
    overrides: &OverrideTable<'_>,
) -> Result<Adjustment, FormatterError> {
    if let Some(seconds) = overrides.get(&doctor.id, &procedure.name) {
        return Ok(Adjustment::Overridden(seconds));
    }

    let coefficient = doctor.coefficient(procedure.category);
    scale(procedure.base_seconds, coefficient).map(Adjustment::Computed)
}

/// `base * coefficient / 10`, rounded half-up to the nearest 10 seconds.
pub fn scale(base_seconds: u32, coefficient: f64) -> Result<u32, FormatterError> {
    let raw = f64::from(base_seconds) * coefficient / BASELINE_COEFFICIENT;
    whole_seconds(raw)?;

    // Decimal ties such as 750 * 8.2 = 615 land just below .5 in binary;
    // snapping to milliseconds first keeps them ties for the integer step.
    let scale_to_millis = MILLIS_PER_SECOND as f64 / BASELINE_COEFFICIENT;
    let millis = (f64::from(base_seconds) * coefficient * scale_to_millis).round() as u64;
    let quantum = u64::from(QUANTUM_SECONDS) * MILLIS_PER_SECOND;
    let seconds = (millis + quantum / 2) / quantum * u64::from(QUANTUM_SECONDS);

    u32::try_from(seconds).map_err(|_| FormatterError::InvalidDuration { value: raw })
}
