//! Fatal engine errors.
//!
//! Constraint violations (double-bookings, off-time conflicts, capacity
//! overflows) are *not* errors — they are fitness penalties and never abort
//! a run. The variants here are the unrecoverable cases: structurally
//! invalid input data and allocation failure of genome or population
//! storage.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::validation::ValidationError;

/// Fatal error raised before or during a scheduling run.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The semester data or GA parameters are structurally invalid.
    ///
    /// Carries every problem found, not just the first.
    #[error("invalid configuration: {}", summarize(.0))]
    Config(Vec<ValidationError>),

    /// Genome or population storage could not be allocated.
    #[error("failed to allocate {what}")]
    Allocation {
        /// Which storage failed (e.g. "timetable genome").
        what: &'static str,
        #[source]
        source: TryReserveError,
    },
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_config_error_lists_all_problems() {
        let err = SchedulerError::Config(vec![
            ValidationError::new(ValidationErrorKind::EmptyCourse, "course 'X' has no teachers"),
            ValidationError::new(ValidationErrorKind::ZeroWeeks, "semester has zero weeks"),
        ]);
        let text = err.to_string();
        assert!(text.contains("course 'X' has no teachers"));
        assert!(text.contains("semester has zero weeks"));
    }
}
