//! Timetable genome.
//!
//! A candidate solution is a fixed-length sequence of lecture placements.
//! Gene *i* permanently represents "the *k*-th lecture of some specific
//! course": the gene→course mapping is fixed when the genome is built
//! (courses expanded in repository order, one gene per required lecture)
//! and is identical across every timetable in a run. Genetic operators may
//! change a gene's day, period, and room, never its course.

use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::models::semester::{CourseId, RoomId, SemesterData};

/// One lecture placement (a gene).
///
/// `day`, `period`, and `room` are the mutable placement; the course is
/// fixed for the gene's lifetime and only readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    /// Absolute day index, `0..num_days`.
    pub day: usize,
    /// Period within the day, `0..periods_per_day`.
    pub period: usize,
    /// Assigned room.
    pub room: RoomId,
    course: CourseId,
}

impl Lecture {
    /// The course this gene represents. Immutable.
    #[inline]
    pub fn course(&self) -> CourseId {
        self.course
    }

    #[inline]
    fn placement(&self) -> (usize, usize, RoomId) {
        (self.day, self.period, self.room)
    }
}

/// A candidate timetable (an individual).
///
/// Carries a cached fitness score, valid only after evaluation; any
/// placement write clears the cache. Lower fitness is better, 0 means no
/// detected violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timetable {
    lectures: Vec<Lecture>,
    fitness: Option<u64>,
}

impl Timetable {
    /// Builds a genome with the fixed gene→course mapping and uniformly
    /// random placements. This is the population seeding step, not an
    /// optimization strategy.
    ///
    /// # Errors
    /// [`SchedulerError::Allocation`] if the genome storage cannot be
    /// reserved.
    pub fn random<R: Rng>(sd: &SemesterData, rng: &mut R) -> Result<Self, SchedulerError> {
        let total = sd.total_lecture_count();
        let mut lectures = Vec::new();
        lectures
            .try_reserve_exact(total)
            .map_err(|source| SchedulerError::Allocation {
                what: "timetable genome",
                source,
            })?;

        for (course, def) in sd.courses().iter().enumerate() {
            for _ in 0..def.total_lectures {
                lectures.push(Lecture {
                    day: rng.random_range(0..sd.num_days()),
                    period: rng.random_range(0..sd.periods_per_day()),
                    room: rng.random_range(0..sd.rooms().len()),
                    course,
                });
            }
        }

        Ok(Self {
            lectures,
            fitness: None,
        })
    }

    /// Wraps an operator-produced gene sequence. Fitness starts unset.
    pub(crate) fn from_lectures(lectures: Vec<Lecture>) -> Self {
        Self {
            lectures,
            fitness: None,
        }
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.lectures.len()
    }

    /// Whether the genome has no genes.
    pub fn is_empty(&self) -> bool {
        self.lectures.is_empty()
    }

    /// All lectures, in gene order.
    pub fn lectures(&self) -> &[Lecture] {
        &self.lectures
    }

    /// The lecture at gene `index`.
    pub fn lecture(&self, index: usize) -> &Lecture {
        &self.lectures[index]
    }

    /// Cached fitness, if this timetable has been evaluated since its last
    /// placement change.
    pub fn fitness(&self) -> Option<u64> {
        self.fitness
    }

    pub(crate) fn set_fitness(&mut self, fitness: u64) {
        self.fitness = Some(fitness);
    }

    /// Rewrites the placement of gene `index`, invalidating the fitness
    /// cache. The gene's course is untouched.
    pub fn set_placement(&mut self, index: usize, day: usize, period: usize, room: RoomId) {
        let lecture = &mut self.lectures[index];
        lecture.day = day;
        lecture.period = period;
        lecture.room = room;
        self.fitness = None;
    }

    /// Re-randomizes the placement of gene `index`, invalidating the
    /// fitness cache.
    pub fn randomize_gene<R: Rng>(&mut self, index: usize, sd: &SemesterData, rng: &mut R) {
        let day = rng.random_range(0..sd.num_days());
        let period = rng.random_range(0..sd.periods_per_day());
        let room = rng.random_range(0..sd.rooms().len());
        self.set_placement(index, day, period, room);
    }

    /// Gene-for-gene lexicographic comparison of `(day, period, room)`.
    ///
    /// This is the deterministic tie-break order used when two timetables
    /// have equal fitness, so a fixed seed reproduces identical selections.
    pub fn placement_cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.lectures.iter().zip(&other.lectures) {
            let ord = a.placement().cmp(&b.placement());
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.lectures.len().cmp(&other.lectures.len())
    }
}
