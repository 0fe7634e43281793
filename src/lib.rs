//! Semester course timetabling engine.
//!
//! Assigns course lectures to (day, period, room) slots across an academic
//! semester using a genetic search over candidate timetables. Teacher
//! availability, room double-booking, per-specialization slot uniqueness,
//! and room capacity are soft constraints: each violation adds a weighted
//! penalty to a timetable's fitness, and the search minimizes the total.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Teacher`, `Room`, `Course`,
//!   `Specialization`, the `SemesterData` repository, and the
//!   `Timetable` genome
//! - **`validation`**: Structural integrity checks run at repository
//!   construction (dangling references, ill-formed off-times, empty courses)
//! - **`fitness`**: Violation detection and penalty scoring
//! - **`ga`**: Population management and the generation loop
//! - **`error`**: Fatal errors (configuration, allocation)
//!
//! # Conventions
//!
//! Fitness is a non-negative penalty; lower is better and 0 means no
//! detected violation. All randomness flows through an explicitly seeded
//! generator, so a fixed seed reproduces a run bit-for-bit.
//!
//! # References
//!
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod error;
pub mod fitness;
pub mod ga;
pub mod models;
pub mod validation;
