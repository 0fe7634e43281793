//! Structural validation of semester data.
//!
//! Runs once, at `SemesterData` construction. Detects configuration
//! problems that must refuse a run rather than become fitness penalties:
//! - Courses with no teachers or a non-positive lecture count
//! - Ill-formed or out-of-range off-time blocks
//! - A zero-sized planning grid (weeks, days, periods)
//! - Dangling teacher/course index references
//! - Duplicate entity names
//!
//! All problems are collected and reported together, not first-error-wins.

use std::collections::HashSet;

use crate::models::SemesterData;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A course has no assigned teachers.
    EmptyCourse,
    /// A course requires zero lectures.
    NonPositiveLectureCount,
    /// An off-time block has `start > end` or falls outside the grid.
    InvalidOffTime,
    /// The semester spans zero weeks, days, or periods.
    ZeroWeeks,
    /// There are no rooms to place lectures in.
    NoRooms,
    /// A course references a teacher index that does not exist.
    InvalidTeacherReference,
    /// A specialization references a course index that does not exist.
    InvalidCourseReference,
    /// Two entities of the same kind share a name.
    DuplicateName,
    /// A GA parameter is out of its valid range.
    InvalidGaParameter,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the semester data for a scheduling run.
///
/// Checks:
/// 1. The planning grid is non-empty (weeks, days per week, periods per day)
/// 2. At least one room exists
/// 3. Every course has at least one teacher and a positive lecture count
/// 4. Every course→teacher and specialization→course index is in range
/// 5. Every off-time block is well-formed and inside the grid
/// 6. No duplicate names within an entity kind
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_semester(sd: &SemesterData) -> ValidationResult {
    let mut errors = Vec::new();

    if sd.num_weeks() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroWeeks,
            "semester has zero weeks",
        ));
    }
    if sd.days_per_week() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroWeeks,
            "semester has zero days per week",
        ));
    }
    if sd.periods_per_day() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroWeeks,
            "semester has zero periods per day",
        ));
    }

    if sd.rooms().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoRooms,
            "no rooms available for lectures",
        ));
    }

    check_duplicate_names(sd.teachers().iter().map(|t| t.name.as_str()), "teacher", &mut errors);
    check_duplicate_names(sd.rooms().iter().map(|r| r.name.as_str()), "room", &mut errors);
    check_duplicate_names(sd.courses().iter().map(|c| c.name.as_str()), "course", &mut errors);
    check_duplicate_names(
        sd.specializations().iter().map(|s| s.name.as_str()),
        "specialization",
        &mut errors,
    );

    for teacher in sd.teachers() {
        for off in &teacher.off_times {
            if off.start_period > off.end_period {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidOffTime,
                    format!(
                        "teacher '{}' has off-time with start {} after end {}",
                        teacher.name, off.start_period, off.end_period
                    ),
                ));
            }
            if off.end_period >= sd.periods_per_day() && sd.periods_per_day() > 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidOffTime,
                    format!(
                        "teacher '{}' has off-time ending at period {} (periods per day: {})",
                        teacher.name,
                        off.end_period,
                        sd.periods_per_day()
                    ),
                ));
            }
            if off.day >= sd.num_days() && sd.num_days() > 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidOffTime,
                    format!(
                        "teacher '{}' has off-time on day {} (semester has {} days)",
                        teacher.name,
                        off.day,
                        sd.num_days()
                    ),
                ));
            }
        }
    }

    for course in sd.courses() {
        if course.teachers.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCourse,
                format!("course '{}' has no teachers", course.name),
            ));
        }
        if course.total_lectures == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveLectureCount,
                format!("course '{}' requires zero lectures", course.name),
            ));
        }
        for &teacher_id in &course.teachers {
            if teacher_id >= sd.teachers().len() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTeacherReference,
                    format!(
                        "course '{}' references unknown teacher index {}",
                        course.name, teacher_id
                    ),
                ));
            }
        }
    }

    for spec in sd.specializations() {
        for &course_id in &spec.courses {
            if course_id >= sd.courses().len() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidCourseReference,
                    format!(
                        "specialization '{}' references unknown course index {}",
                        spec.name, course_id
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_duplicate_names<'a>(
    names: impl Iterator<Item = &'a str>,
    kind: &str,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("duplicate {kind} name: {name}"),
            ));
        }
    }
}
