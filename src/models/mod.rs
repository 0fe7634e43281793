//! Timetabling domain models.
//!
//! The semester repository (static planning data, validated once and
//! immutable for the run) and the timetable genome (a candidate solution
//! as a fixed-length sequence of lecture placements).

mod semester;
mod timetable;

pub use semester::{
    Course, CourseId, OffTime, Room, RoomId, SemesterData, SpecId, Specialization, Teacher,
    TeacherId, DEFAULT_DAYS_PER_WEEK, DEFAULT_PERIODS_PER_DAY,
};
pub use timetable::{Lecture, Timetable};
