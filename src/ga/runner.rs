//! Evolution orchestration.
//!
//! Drives the generation loop: seed → evaluate → { check termination,
//! advance } → report. A single writer replaces generations wholesale;
//! termination is only ever checked at generation boundaries, and all
//! randomness flows from one seeded generator.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::error::SchedulerError;
use crate::fitness::{detect_violations, Violation};
use crate::models::{SemesterData, Timetable};
use crate::validation::{ValidationError, ValidationErrorKind};

use super::config::GaConfig;
use super::population::Generation;

/// Outcome of a scheduling run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best timetable found.
    pub best: Timetable,
    /// Its fitness (0 = no detected violation).
    pub best_fitness: u64,
    /// Its violations, from the same detection pass that scored it.
    pub violations: Vec<Violation>,
    /// Generations advanced past the seeded one.
    pub generations: usize,
    /// Wall time spent in the loop.
    pub elapsed: Duration,
}

/// Runs the genetic search for one semester.
pub struct GaRunner;

impl GaRunner {
    /// Evolves timetables for `sd` until the generation budget is reached,
    /// a zero-violation timetable appears, or the best fitness plateaus.
    ///
    /// Two calls with the same repository and configuration produce
    /// bit-identical results.
    ///
    /// # Errors
    /// [`SchedulerError::Config`] for out-of-range GA parameters,
    /// [`SchedulerError::Allocation`] if storage cannot be reserved.
    pub fn run(sd: &SemesterData, config: &GaConfig) -> Result<GaResult, SchedulerError> {
        validate_config(config)?;

        let start = Instant::now();
        let mut rng = SmallRng::seed_from_u64(config.seed);

        let mut generation = Generation::seed(sd, config.population_size, &mut rng)?;
        generation.evaluate_all(sd, &config.weights, config.parallel);

        let mut best_seen = generation.best().fitness().unwrap_or(u64::MAX);
        let mut stale = 0usize;

        loop {
            let best_fitness = generation.best().fitness().unwrap_or(u64::MAX);
            debug!(
                generation = generation.number(),
                best_fitness, stale, "generation scored"
            );

            if best_fitness == 0 {
                break;
            }
            if generation.number() >= config.max_generations {
                break;
            }
            if config.plateau_generations > 0 && stale >= config.plateau_generations {
                break;
            }

            generation = generation.next_generation(sd, config, &mut rng)?;

            let new_best = generation.best().fitness().unwrap_or(u64::MAX);
            if new_best < best_seen {
                best_seen = new_best;
                stale = 0;
            } else {
                stale += 1;
            }
        }

        let best = generation.best().clone();
        let best_fitness = best.fitness().unwrap_or(u64::MAX);
        let violations = detect_violations(sd, &best);
        let elapsed = start.elapsed();
        info!(
            generations = generation.number(),
            best_fitness,
            violation_count = violations.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "evolution finished"
        );

        Ok(GaResult {
            best,
            best_fitness,
            violations,
            generations: generation.number(),
            elapsed,
        })
    }
}

/// Refuses out-of-range GA parameters instead of coercing them.
fn validate_config(config: &GaConfig) -> Result<(), SchedulerError> {
    let mut errors = Vec::new();
    let mut reject = |message: String| {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidGaParameter,
            message,
        ));
    };

    if config.population_size == 0 {
        reject("population size must be at least 1".into());
    }
    if config.tournament_size == 0 {
        reject("tournament size must be at least 1".into());
    }
    if config.elitism > config.population_size {
        reject(format!(
            "elitism {} exceeds population size {}",
            config.elitism, config.population_size
        ));
    }
    if !(0.0..=1.0).contains(&config.crossover_rate) {
        reject(format!(
            "crossover rate {} outside 0.0..=1.0",
            config.crossover_rate
        ));
    }
    if !(0.0..=1.0).contains(&config.mutation_rate) {
        reject(format!(
            "mutation rate {} outside 0.0..=1.0",
            config.mutation_rate
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchedulerError::Config(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, OffTime, Room, Specialization, Teacher};

    fn sample_semester() -> SemesterData {
        SemesterData::new(
            vec![
                Teacher::new("Ada").with_off_time(OffTime::new(0, 0, 0)),
                Teacher::new("Grace"),
            ],
            vec![Room::new("Aud 1", 120), Room::new("Sem 2", 40)],
            vec![
                Course::new("Algorithms", 3).with_teacher(0),
                Course::new("Databases", 3).with_teachers(vec![0, 1]),
                Course::new("Networks", 2).with_teacher(1),
            ],
            vec![
                Specialization::new("Software", 30).with_courses(vec![0, 1]),
                Specialization::new("Robotics", 25).with_courses(vec![1, 2]),
            ],
            2,
        )
        .unwrap()
    }

    fn small_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(30)
            .with_max_generations(60)
            .with_plateau_generations(0)
            .with_seed(42)
    }

    #[test]
    fn test_run_produces_valid_result() {
        let sd = sample_semester();
        let result = GaRunner::run(&sd, &small_config()).unwrap();

        assert_eq!(result.best.len(), sd.total_lecture_count());
        for lecture in result.best.lectures() {
            assert!(lecture.day < sd.num_days());
            assert!(lecture.period < sd.periods_per_day());
            assert!(lecture.room < sd.rooms().len());
        }
        assert!(result.generations <= 60);
    }

    #[test]
    fn test_result_score_matches_violations() {
        let sd = sample_semester();
        let config = small_config();
        let result = GaRunner::run(&sd, &config).unwrap();

        let expected: u64 = result
            .violations
            .iter()
            .map(|v| v.penalty(&config.weights))
            .sum();
        assert_eq!(result.best_fitness, expected);
    }

    #[test]
    fn test_search_improves_over_random_seed() {
        let sd = sample_semester();
        let seeded_only = GaRunner::run(&sd, &small_config().with_max_generations(0)).unwrap();
        let evolved = GaRunner::run(&sd, &small_config()).unwrap();
        assert!(evolved.best_fitness <= seeded_only.best_fitness);
    }

    #[test]
    fn test_identical_seeds_are_bit_identical() {
        let sd = sample_semester();
        let a = GaRunner::run(&sd, &small_config()).unwrap();
        let b = GaRunner::run(&sd, &small_config()).unwrap();

        assert_eq!(a.best_fitness, b.best_fitness);
        assert_eq!(a.generations, b.generations);
        assert_eq!(a.best.lectures(), b.best.lectures());
        assert_eq!(a.violations, b.violations);
    }

    #[test]
    fn test_parallel_run_matches_serial() {
        let sd = sample_semester();
        let serial = GaRunner::run(&sd, &small_config()).unwrap();
        let parallel = GaRunner::run(&sd, &small_config().with_parallel(true)).unwrap();
        assert_eq!(serial.best.lectures(), parallel.best.lectures());
        assert_eq!(serial.best_fitness, parallel.best_fitness);
    }

    #[test]
    fn test_different_seeds_may_differ() {
        let sd = sample_semester();
        let a = GaRunner::run(&sd, &small_config().with_seed(1)).unwrap();
        let b = GaRunner::run(&sd, &small_config().with_seed(2)).unwrap();
        // Both runs are valid; their gene sequences almost surely differ.
        assert_eq!(a.best.len(), b.best.len());
    }

    #[test]
    fn test_plateau_stop() {
        let sd = sample_semester();
        let config = small_config()
            .with_max_generations(10_000)
            .with_plateau_generations(5);
        let result = GaRunner::run(&sd, &config).unwrap();
        assert!(result.generations < 10_000);
    }

    #[test]
    fn test_zero_fitness_stops_early() {
        // One course, one lecture, a huge room, no off-times: generation 0
        // may already contain a perfect timetable; the loop must stop the
        // moment best fitness reaches 0.
        let sd = SemesterData::new(
            vec![Teacher::new("Ada")],
            vec![Room::new("Aud 1", 500)],
            vec![Course::new("Algorithms", 1).with_teacher(0)],
            vec![Specialization::new("Software", 30).with_course(0)],
            1,
        )
        .unwrap();
        let result = GaRunner::run(&sd, &small_config().with_max_generations(10_000)).unwrap();
        assert_eq!(result.best_fitness, 0);
        assert!(result.violations.is_empty());
        assert!(result.generations < 10_000);
    }

    #[test]
    fn test_invalid_parameters_are_refused() {
        let sd = sample_semester();
        let err = GaRunner::run(&sd, &small_config().with_population_size(0)).unwrap_err();
        match err {
            SchedulerError::Config(errors) => {
                assert!(errors
                    .iter()
                    .all(|e| e.kind == ValidationErrorKind::InvalidGaParameter));
            }
            other => panic!("expected Config error, got {other}"),
        }

        let mut config = small_config();
        config.elitism = config.population_size + 1;
        assert!(GaRunner::run(&sd, &config).is_err());
    }
}
