//! Semester planning data.
//!
//! The `SemesterData` repository owns every static entity a timetable is
//! built against: teachers with off-time blocks, rooms, courses, and
//! specializations. Cross-references (course→teacher, specialization→course)
//! are index lists into the owning arrays, so the repository's lifetime
//! governs all associations and there is nothing to tear down manually.
//!
//! The repository is validated at construction and never mutated afterwards;
//! everything downstream (fitness evaluation, population seeding) reads it
//! through the query surface.

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::validation::validate_semester;

/// Index of a teacher in the repository's teacher table.
pub type TeacherId = usize;
/// Index of a room in the repository's room table.
pub type RoomId = usize;
/// Index of a course in the repository's course table.
pub type CourseId = usize;
/// Index of a specialization in the repository's specialization table.
pub type SpecId = usize;

/// Teaching days per week unless configured otherwise.
pub const DEFAULT_DAYS_PER_WEEK: usize = 5;
/// Lecture periods per day unless configured otherwise.
pub const DEFAULT_PERIODS_PER_DAY: usize = 2;

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// A block of periods during which a teacher is unavailable.
///
/// `day` is an absolute day index within the semester; the period range
/// is inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffTime {
    /// Absolute day index, `0..num_days`.
    pub day: usize,
    /// First blocked period (inclusive).
    pub start_period: usize,
    /// Last blocked period (inclusive).
    pub end_period: usize,
}

impl OffTime {
    /// Creates an off-time block.
    pub fn new(day: usize, start_period: usize, end_period: usize) -> Self {
        Self {
            day,
            start_period,
            end_period,
        }
    }

    /// Whether the given slot falls inside this block.
    #[inline]
    pub fn contains(&self, day: usize, period: usize) -> bool {
        self.day == day && self.start_period <= period && period <= self.end_period
    }
}

/// A teacher with optional off-time blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Teacher name, unique among teachers.
    pub name: String,
    /// Periods during which this teacher cannot be scheduled.
    pub off_times: Vec<OffTime>,
}

impl Teacher {
    /// Creates a teacher with no off-times.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            off_times: Vec::new(),
        }
    }

    /// Adds an off-time block.
    pub fn with_off_time(mut self, off_time: OffTime) -> Self {
        self.off_times.push(off_time);
        self
    }

    /// Whether the teacher is unavailable at the given slot.
    pub fn is_off(&self, day: usize, period: usize) -> bool {
        self.off_times.iter().any(|o| o.contains(day, period))
    }
}

/// A lecture room with a seating capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room name, unique among rooms.
    pub name: String,
    /// Number of seats.
    pub capacity: u32,
}

impl Room {
    /// Creates a room.
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

/// A course with a required lecture count and its teaching staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Course name, unique among courses.
    pub name: String,
    /// Number of lectures to schedule over the semester.
    pub total_lectures: usize,
    /// Teachers assigned to this course (at least one).
    pub teachers: Vec<TeacherId>,
}

impl Course {
    /// Creates a course with no teachers assigned yet.
    pub fn new(name: impl Into<String>, total_lectures: usize) -> Self {
        Self {
            name: name.into(),
            total_lectures,
            teachers: Vec::new(),
        }
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: TeacherId) -> Self {
        self.teachers.push(teacher);
        self
    }

    /// Sets the full teacher list.
    pub fn with_teachers(mut self, teachers: Vec<TeacherId>) -> Self {
        self.teachers = teachers;
        self
    }
}

/// A student cohort defined by the courses its members take.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialization {
    /// Specialization name, unique among specializations.
    pub name: String,
    /// Enrolled student count.
    pub num_students: u32,
    /// Courses this cohort attends.
    pub courses: Vec<CourseId>,
}

impl Specialization {
    /// Creates a specialization with no courses yet.
    pub fn new(name: impl Into<String>, num_students: u32) -> Self {
        Self {
            name: name.into(),
            num_students,
            courses: Vec::new(),
        }
    }

    /// Adds a course.
    pub fn with_course(mut self, course: CourseId) -> Self {
        self.courses.push(course);
        self
    }

    /// Sets the full course list.
    pub fn with_courses(mut self, courses: Vec<CourseId>) -> Self {
        self.courses = courses;
        self
    }
}

/// The immutable planning repository for one semester.
///
/// Built once per run, validated at construction, and read-only afterwards.
/// Lectures are placed on a grid of `num_weeks * days_per_week` days with
/// `periods_per_day` periods each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemesterData {
    pub(crate) teachers: Vec<Teacher>,
    pub(crate) rooms: Vec<Room>,
    pub(crate) courses: Vec<Course>,
    pub(crate) specializations: Vec<Specialization>,
    pub(crate) num_weeks: usize,
    pub(crate) days_per_week: usize,
    pub(crate) periods_per_day: usize,
}

impl SemesterData {
    /// Creates and validates a repository with the default planning grid
    /// ([`DEFAULT_DAYS_PER_WEEK`] days, [`DEFAULT_PERIODS_PER_DAY`] periods).
    ///
    /// # Errors
    /// [`SchedulerError::Config`] with every structural problem found.
    pub fn new(
        teachers: Vec<Teacher>,
        rooms: Vec<Room>,
        courses: Vec<Course>,
        specializations: Vec<Specialization>,
        num_weeks: usize,
    ) -> Result<Self, SchedulerError> {
        Self::with_grid(
            teachers,
            rooms,
            courses,
            specializations,
            num_weeks,
            DEFAULT_DAYS_PER_WEEK,
            DEFAULT_PERIODS_PER_DAY,
        )
    }

    /// Creates and validates a repository with an explicit planning grid.
    #[allow(clippy::too_many_arguments)]
    pub fn with_grid(
        teachers: Vec<Teacher>,
        rooms: Vec<Room>,
        courses: Vec<Course>,
        specializations: Vec<Specialization>,
        num_weeks: usize,
        days_per_week: usize,
        periods_per_day: usize,
    ) -> Result<Self, SchedulerError> {
        let sd = Self {
            teachers,
            rooms,
            courses,
            specializations,
            num_weeks,
            days_per_week,
            periods_per_day,
        };
        validate_semester(&sd).map_err(SchedulerError::Config)?;
        Ok(sd)
    }

    /// All teachers, in index order.
    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    /// All rooms, in index order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// All courses, in index order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// All specializations, in index order.
    pub fn specializations(&self) -> &[Specialization] {
        &self.specializations
    }

    /// The teacher at `id`.
    pub fn teacher(&self, id: TeacherId) -> &Teacher {
        &self.teachers[id]
    }

    /// The room at `id`.
    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id]
    }

    /// The course at `id`.
    pub fn course(&self, id: CourseId) -> &Course {
        &self.courses[id]
    }

    /// The specialization at `id`.
    pub fn specialization(&self, id: SpecId) -> &Specialization {
        &self.specializations[id]
    }

    /// Number of weeks in the semester.
    pub fn num_weeks(&self) -> usize {
        self.num_weeks
    }

    /// Teaching days per week.
    pub fn days_per_week(&self) -> usize {
        self.days_per_week
    }

    /// Lecture periods per day.
    pub fn periods_per_day(&self) -> usize {
        self.periods_per_day
    }

    /// Total days in the planning grid (`num_weeks * days_per_week`).
    pub fn num_days(&self) -> usize {
        self.num_weeks * self.days_per_week
    }

    /// Total lectures to schedule: the sum of `total_lectures` over all
    /// courses. This fixes the genome length for the run.
    pub fn total_lecture_count(&self) -> usize {
        self.courses.iter().map(|c| c.total_lectures).sum()
    }

    /// Students enrolled on a course: the sum of `num_students` over every
    /// specialization that references it.
    pub fn students_on_course(&self, course: CourseId) -> u32 {
        self.specializations
            .iter()
            .filter(|s| s.courses.contains(&course))
            .map(|s| s.num_students)
            .sum()
    }

    /// Whether a specialization's students attend the given course.
    pub fn specialization_has_course(&self, spec: SpecId, course: CourseId) -> bool {
        self.specializations[spec].courses.contains(&course)
    }

    /// Whether a lecture belongs on a specialization's timetable page.
    pub fn specialization_has_lecture(&self, spec: SpecId, lecture: &crate::models::Lecture) -> bool {
        self.specialization_has_course(spec, lecture.course())
    }

    /// Human-readable label for an absolute day index, e.g. "Tuesday, week 2".
    pub fn day_label(&self, day: usize) -> String {
        let week = day / self.days_per_week + 1;
        let day_of_week = day % self.days_per_week;
        if self.days_per_week <= DAY_NAMES.len() {
            format!("{}, week {}", DAY_NAMES[day_of_week], week)
        } else {
            format!("day {}, week {}", day_of_week + 1, week)
        }
    }

    /// Human-readable label for a period index, e.g. "period 1".
    pub fn period_label(&self, period: usize) -> String {
        format!("period {}", period + 1)
    }
}
