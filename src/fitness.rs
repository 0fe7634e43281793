//! Constraint-violation fitness evaluation.
//!
//! `evaluate` is a pure function of a timetable and the immutable semester
//! repository: it detects violations, weights them, and returns the penalty
//! score together with the violation list. Score 0 means no detected
//! violation; the list and the score always come from the same detection
//! pass, so what is optimized is exactly what is reported.
//!
//! # Detected violations
//!
//! 1. Specialization double-booking: a cohort can see more than one lecture
//!    at the same slot
//! 2. Room double-booking: two lectures share a room and a slot
//! 3. Teacher off-time: a lecture falls inside an off-time block of one of
//!    its course's teachers
//! 4. Teacher double-booking: one teacher, two lectures, one slot
//! 5. Room capacity overflow: penalty proportional to the overflow, so the
//!    search can gradient toward smaller overflows
//!
//! Lectures are grouped by `(day, period)` before any pairwise check, which
//! keeps one evaluation near-linear in lecture count. The grouping map is a
//! `BTreeMap` so the violation list comes out in a reproducible order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{RoomId, SemesterData, SpecId, TeacherId, Timetable};

/// Penalty weight per violation kind. All weights must be positive,
/// otherwise a violated timetable could score 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// Per extra lecture a specialization can see at one slot.
    pub spec_clash: u64,
    /// Per extra lecture in one room at one slot.
    pub room_clash: u64,
    /// Per (lecture, teacher, matching off-time) triple.
    pub teacher_off_time: u64,
    /// Per extra same-slot lecture of one teacher.
    pub teacher_clash: u64,
    /// Per student over room capacity.
    pub capacity_per_student: u64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            spec_clash: 100,
            room_clash: 100,
            teacher_off_time: 100,
            teacher_clash: 100,
            capacity_per_student: 1,
        }
    }
}

impl FitnessWeights {
    /// Sets the specialization double-booking weight.
    pub fn with_spec_clash(mut self, weight: u64) -> Self {
        self.spec_clash = weight;
        self
    }

    /// Sets the room double-booking weight.
    pub fn with_room_clash(mut self, weight: u64) -> Self {
        self.room_clash = weight;
        self
    }

    /// Sets the teacher off-time weight.
    pub fn with_teacher_off_time(mut self, weight: u64) -> Self {
        self.teacher_off_time = weight;
        self
    }

    /// Sets the teacher double-booking weight.
    pub fn with_teacher_clash(mut self, weight: u64) -> Self {
        self.teacher_clash = weight;
        self
    }

    /// Sets the per-student capacity overflow weight.
    pub fn with_capacity_per_student(mut self, weight: u64) -> Self {
        self.capacity_per_student = weight;
        self
    }
}

/// A detected constraint violation.
///
/// Double-booking kinds appear once per extra lecture beyond the first at
/// the offending slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Violation {
    /// A specialization can see more than one lecture at this slot.
    SpecializationClash {
        /// Offending specialization.
        spec: SpecId,
        /// Slot day.
        day: usize,
        /// Slot period.
        period: usize,
    },
    /// More than one lecture in this room at this slot.
    RoomClash {
        /// Offending room.
        room: RoomId,
        /// Slot day.
        day: usize,
        /// Slot period.
        period: usize,
    },
    /// A lecture falls inside one of its teachers' off-time blocks.
    TeacherOffTime {
        /// Unavailable teacher.
        teacher: TeacherId,
        /// Gene index of the offending lecture.
        lecture: usize,
    },
    /// A teacher has more than one lecture at this slot.
    TeacherClash {
        /// Double-booked teacher.
        teacher: TeacherId,
        /// Slot day.
        day: usize,
        /// Slot period.
        period: usize,
    },
    /// More students enrolled than the assigned room seats.
    CapacityOverflow {
        /// Gene index of the offending lecture.
        lecture: usize,
        /// Students beyond capacity.
        overflow: u32,
    },
}

impl Violation {
    /// The penalty this violation contributes to the fitness score.
    pub fn penalty(&self, weights: &FitnessWeights) -> u64 {
        match self {
            Violation::SpecializationClash { .. } => weights.spec_clash,
            Violation::RoomClash { .. } => weights.room_clash,
            Violation::TeacherOffTime { .. } => weights.teacher_off_time,
            Violation::TeacherClash { .. } => weights.teacher_clash,
            Violation::CapacityOverflow { overflow, .. } => {
                weights.capacity_per_student * u64::from(*overflow)
            }
        }
    }

    /// Renders the violation for the winning-timetable report.
    pub fn describe(&self, sd: &SemesterData, timetable: &Timetable) -> String {
        match self {
            Violation::SpecializationClash { spec, day, period } => format!(
                "specialization '{}' has overlapping lectures on {}, {}",
                sd.specialization(*spec).name,
                sd.day_label(*day),
                sd.period_label(*period),
            ),
            Violation::RoomClash { room, day, period } => format!(
                "room '{}' is double-booked on {}, {}",
                sd.room(*room).name,
                sd.day_label(*day),
                sd.period_label(*period),
            ),
            Violation::TeacherOffTime { teacher, lecture } => {
                let l = timetable.lecture(*lecture);
                format!(
                    "teacher '{}' is unavailable for '{}' on {}, {}",
                    sd.teacher(*teacher).name,
                    sd.course(l.course()).name,
                    sd.day_label(l.day),
                    sd.period_label(l.period),
                )
            }
            Violation::TeacherClash { teacher, day, period } => format!(
                "teacher '{}' is double-booked on {}, {}",
                sd.teacher(*teacher).name,
                sd.day_label(*day),
                sd.period_label(*period),
            ),
            Violation::CapacityOverflow { lecture, overflow } => {
                let l = timetable.lecture(*lecture);
                format!(
                    "'{}' in room '{}' is over capacity by {} students",
                    sd.course(l.course()).name,
                    sd.room(l.room).name,
                    overflow,
                )
            }
        }
    }
}

/// A scored timetable: the penalty total and the violations behind it.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Weighted penalty total. 0 iff `violations` is empty.
    pub score: u64,
    /// Every detected violation.
    pub violations: Vec<Violation>,
}

/// Detects every constraint violation in a timetable.
///
/// Shared by the scoring pass and the diagnostic report, so the two can
/// never drift apart. Total for any structurally valid timetable.
pub fn detect_violations(sd: &SemesterData, timetable: &Timetable) -> Vec<Violation> {
    let mut violations = Vec::new();

    // Per-lecture checks: off-times and capacity.
    for (index, lecture) in timetable.lectures().iter().enumerate() {
        let course = sd.course(lecture.course());
        for &teacher in &course.teachers {
            for off in &sd.teacher(teacher).off_times {
                if off.contains(lecture.day, lecture.period) {
                    violations.push(Violation::TeacherOffTime { teacher, lecture: index });
                }
            }
        }

        let students = sd.students_on_course(lecture.course());
        let capacity = sd.room(lecture.room).capacity;
        if students > capacity {
            violations.push(Violation::CapacityOverflow {
                lecture: index,
                overflow: students - capacity,
            });
        }
    }

    // Slot grouping for the pairwise kinds.
    let mut slots: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    for (index, lecture) in timetable.lectures().iter().enumerate() {
        slots
            .entry((lecture.day, lecture.period))
            .or_default()
            .push(index);
    }

    for (&(day, period), indices) in &slots {
        if indices.len() < 2 {
            continue;
        }

        let mut room_counts: BTreeMap<RoomId, usize> = BTreeMap::new();
        let mut teacher_counts: BTreeMap<TeacherId, usize> = BTreeMap::new();
        for &index in indices {
            let lecture = timetable.lecture(index);
            *room_counts.entry(lecture.room).or_default() += 1;
            for &teacher in &sd.course(lecture.course()).teachers {
                *teacher_counts.entry(teacher).or_default() += 1;
            }
        }

        for (&room, &count) in &room_counts {
            for _ in 1..count {
                violations.push(Violation::RoomClash { room, day, period });
            }
        }
        for (&teacher, &count) in &teacher_counts {
            for _ in 1..count {
                violations.push(Violation::TeacherClash { teacher, day, period });
            }
        }

        for spec in 0..sd.specializations().len() {
            let visible = indices
                .iter()
                .filter(|&&i| sd.specialization_has_course(spec, timetable.lecture(i).course()))
                .count();
            for _ in 1..visible {
                violations.push(Violation::SpecializationClash { spec, day, period });
            }
        }
    }

    violations
}

/// Scores a timetable: detects violations and sums their weighted
/// penalties. Pure; never fails; does not touch the timetable's cache.
pub fn evaluate(sd: &SemesterData, timetable: &Timetable, weights: &FitnessWeights) -> Evaluation {
    let violations = detect_violations(sd, timetable);
    let score = violations.iter().map(|v| v.penalty(weights)).sum();
    Evaluation { score, violations }
}
