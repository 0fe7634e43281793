//! Population management: generations and genetic operators.
//!
//! A `Generation` owns a fixed-size set of timetables. Advancing it builds
//! the successor wholesale — elites first, the remainder through tournament
//! selection, single-point crossover, and per-gene mutation — and evaluates
//! every individual before the new generation is handed back, so selection
//! only ever sees fully-scored individuals.

use std::cmp::Ordering;

use rand::Rng;
use rayon::prelude::*;

use crate::error::SchedulerError;
use crate::fitness::{evaluate, FitnessWeights};
use crate::models::{SemesterData, Timetable};

use super::config::GaConfig;

/// Orders scored timetables: fitness first, then the deterministic
/// gene-wise placement order as tie-break. Unevaluated individuals sort
/// last.
pub(crate) fn scored_cmp(a: &Timetable, b: &Timetable) -> Ordering {
    let fa = a.fitness().unwrap_or(u64::MAX);
    let fb = b.fitness().unwrap_or(u64::MAX);
    fa.cmp(&fb).then_with(|| a.placement_cmp(b))
}

/// Single-point crossover over the gene sequence.
///
/// Offspring A takes genes `[0, cut)` from the first parent and `[cut, n)`
/// from the second; offspring B is the complement. The gene→course mapping
/// is positional, so it is preserved by construction. Genomes shorter than
/// two genes are cloned unchanged.
pub fn single_point_crossover<R: Rng>(
    p1: &Timetable,
    p2: &Timetable,
    rng: &mut R,
) -> (Timetable, Timetable) {
    let n = p1.len();
    if n < 2 {
        return (p1.clone(), p2.clone());
    }
    let cut = rng.random_range(1..n);

    let mut a = Vec::with_capacity(n);
    a.extend_from_slice(&p1.lectures()[..cut]);
    a.extend_from_slice(&p2.lectures()[cut..]);

    let mut b = Vec::with_capacity(n);
    b.extend_from_slice(&p2.lectures()[..cut]);
    b.extend_from_slice(&p1.lectures()[cut..]);

    (Timetable::from_lectures(a), Timetable::from_lectures(b))
}

/// Per-gene mutation: with independent probability `rate`, re-randomize a
/// gene's day, period, and room. Courses are never touched.
pub fn mutate<R: Rng>(timetable: &mut Timetable, sd: &SemesterData, rate: f64, rng: &mut R) {
    for index in 0..timetable.len() {
        if rng.random_bool(rate) {
            timetable.randomize_gene(index, sd, rng);
        }
    }
}

/// One generation of candidate timetables.
///
/// Owns its individuals; replaced wholesale each iteration.
#[derive(Debug, Clone)]
pub struct Generation {
    individuals: Vec<Timetable>,
    number: usize,
}

impl Generation {
    /// Seeds generation 0 with uniformly random timetables.
    ///
    /// # Errors
    /// [`SchedulerError::Allocation`] if population or genome storage
    /// cannot be reserved.
    pub fn seed<R: Rng>(
        sd: &SemesterData,
        size: usize,
        rng: &mut R,
    ) -> Result<Self, SchedulerError> {
        let mut individuals = Vec::new();
        individuals
            .try_reserve_exact(size)
            .map_err(|source| SchedulerError::Allocation {
                what: "population storage",
                source,
            })?;
        for _ in 0..size {
            individuals.push(Timetable::random(sd, rng)?);
        }
        Ok(Self {
            individuals,
            number: 0,
        })
    }

    /// Generation counter (0 for the seeded generation).
    pub fn number(&self) -> usize {
        self.number
    }

    /// All individuals.
    pub fn individuals(&self) -> &[Timetable] {
        &self.individuals
    }

    /// Population size.
    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    /// Scores every individual that lacks a cached fitness.
    ///
    /// Evaluation is pure against the immutable repository, so the
    /// `parallel` path produces identical scores to the serial one.
    pub fn evaluate_all(&mut self, sd: &SemesterData, weights: &FitnessWeights, parallel: bool) {
        let score = |t: &mut Timetable| {
            if t.fitness().is_none() {
                t.set_fitness(evaluate(sd, t, weights).score);
            }
        };
        if parallel {
            self.individuals.par_iter_mut().for_each(score);
        } else {
            self.individuals.iter_mut().for_each(score);
        }
    }

    /// The lowest-fitness individual, ties broken by placement order.
    ///
    /// # Panics
    /// If the population is empty; `seed` with a validated positive size
    /// rules that out.
    pub fn best(&self) -> &Timetable {
        self.individuals
            .iter()
            .min_by(|a, b| scored_cmp(a, b))
            .expect("population is never empty")
    }

    /// Tournament selection: draw `k` individuals uniformly at random,
    /// keep the one that compares lowest.
    pub fn tournament_select<R: Rng>(&self, k: usize, rng: &mut R) -> &Timetable {
        let mut winner = &self.individuals[rng.random_range(0..self.individuals.len())];
        for _ in 1..k {
            let challenger = &self.individuals[rng.random_range(0..self.individuals.len())];
            if scored_cmp(challenger, winner) == Ordering::Less {
                winner = challenger;
            }
        }
        winner
    }

    /// Builds, evaluates, and returns the successor generation.
    ///
    /// The current generation is only read; the successor is complete and
    /// fully scored before it is returned, so a partially built generation
    /// is never observable.
    pub fn next_generation<R: Rng>(
        &self,
        sd: &SemesterData,
        config: &GaConfig,
        rng: &mut R,
    ) -> Result<Self, SchedulerError> {
        let size = self.individuals.len();
        let mut individuals = Vec::new();
        individuals
            .try_reserve_exact(size)
            .map_err(|source| SchedulerError::Allocation {
                what: "population storage",
                source,
            })?;

        // Elites carry their cached scores, which keeps the best fitness
        // non-increasing across generations.
        let mut order: Vec<usize> = (0..size).collect();
        order.sort_by(|&a, &b| scored_cmp(&self.individuals[a], &self.individuals[b]));
        for &i in order.iter().take(config.elitism.min(size)) {
            individuals.push(self.individuals[i].clone());
        }

        while individuals.len() < size {
            let p1 = self.tournament_select(config.tournament_size, rng);
            let p2 = self.tournament_select(config.tournament_size, rng);

            let (mut a, mut b) = if rng.random_bool(config.crossover_rate) {
                single_point_crossover(p1, p2, rng)
            } else {
                (p1.clone(), p2.clone())
            };

            mutate(&mut a, sd, config.mutation_rate, rng);
            mutate(&mut b, sd, config.mutation_rate, rng);

            individuals.push(a);
            if individuals.len() < size {
                individuals.push(b);
            }
        }

        let mut next = Self {
            individuals,
            number: self.number + 1,
        };
        next.evaluate_all(sd, &config.weights, config.parallel);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Room, Specialization, Teacher};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_semester() -> SemesterData {
        SemesterData::new(
            vec![Teacher::new("Ada"), Teacher::new("Grace")],
            vec![Room::new("Aud 1", 120), Room::new("Sem 2", 28)],
            vec![
                Course::new("Algorithms", 3).with_teacher(0),
                Course::new("Databases", 2).with_teachers(vec![0, 1]),
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

    #[test]
    fn test_seed_population() {
        let sd = sample_semester();
        let mut rng = SmallRng::seed_from_u64(42);
        let generation = Generation::seed(&sd, 12, &mut rng).unwrap();
        assert_eq!(generation.size(), 12);
        assert_eq!(generation.number(), 0);
        for tt in generation.individuals() {
            assert_eq!(tt.len(), sd.total_lecture_count());
        }
    }

    #[test]
    fn test_evaluate_all_scores_everyone() {
        let sd = sample_semester();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut generation = Generation::seed(&sd, 8, &mut rng).unwrap();
        generation.evaluate_all(&sd, &FitnessWeights::default(), false);
        assert!(generation.individuals().iter().all(|t| t.fitness().is_some()));
    }

    #[test]
    fn test_parallel_evaluation_matches_serial() {
        let sd = sample_semester();
        let mut rng = SmallRng::seed_from_u64(42);
        let seeded = Generation::seed(&sd, 16, &mut rng).unwrap();

        let mut serial = seeded.clone();
        serial.evaluate_all(&sd, &FitnessWeights::default(), false);
        let mut parallel = seeded;
        parallel.evaluate_all(&sd, &FitnessWeights::default(), true);

        let serial_scores: Vec<_> = serial.individuals().iter().map(|t| t.fitness()).collect();
        let parallel_scores: Vec<_> =
            parallel.individuals().iter().map(|t| t.fitness()).collect();
        assert_eq!(serial_scores, parallel_scores);
    }

    #[test]
    fn test_crossover_preserves_length_and_courses() {
        let sd = sample_semester();
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = Timetable::random(&sd, &mut rng).unwrap();
        let p2 = Timetable::random(&sd, &mut rng).unwrap();

        let (a, b) = single_point_crossover(&p1, &p2, &mut rng);
        assert_eq!(a.len(), p1.len());
        assert_eq!(b.len(), p1.len());
        for i in 0..p1.len() {
            assert_eq!(a.lecture(i).course(), p1.lecture(i).course());
            assert_eq!(b.lecture(i).course(), p1.lecture(i).course());
        }
        assert_eq!(a.fitness(), None);
        assert_eq!(b.fitness(), None);
    }

    #[test]
    fn test_crossover_offspring_complement() {
        let sd = sample_semester();
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = Timetable::random(&sd, &mut rng).unwrap();
        let p2 = Timetable::random(&sd, &mut rng).unwrap();

        let (a, b) = single_point_crossover(&p1, &p2, &mut rng);
        // Every gene position holds either both parents' genes split A/B
        // or B/A, never anything else.
        for i in 0..p1.len() {
            let pair = (*a.lecture(i), *b.lecture(i));
            assert!(
                pair == (*p1.lecture(i), *p2.lecture(i))
                    || pair == (*p2.lecture(i), *p1.lecture(i))
            );
        }
    }

    #[test]
    fn test_mutation_never_touches_courses() {
        let sd = sample_semester();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut tt = Timetable::random(&sd, &mut rng).unwrap();
        let courses: Vec<_> = tt.lectures().iter().map(|l| l.course()).collect();

        mutate(&mut tt, &sd, 1.0, &mut rng);
        let after: Vec<_> = tt.lectures().iter().map(|l| l.course()).collect();
        assert_eq!(courses, after);
    }

    #[test]
    fn test_mutation_rate_zero_is_identity() {
        let sd = sample_semester();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut tt = Timetable::random(&sd, &mut rng).unwrap();
        let before = tt.clone();

        mutate(&mut tt, &sd, 0.0, &mut rng);
        assert_eq!(tt.placement_cmp(&before), Ordering::Equal);
    }

    #[test]
    fn test_tournament_prefers_lower_fitness() {
        let sd = sample_semester();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut generation = Generation::seed(&sd, 10, &mut rng).unwrap();
        generation.evaluate_all(&sd, &FitnessWeights::default(), false);

        let best_fitness = generation.best().fitness().unwrap();
        // A whole-population tournament must return the overall best.
        let winner = generation.tournament_select(1000, &mut rng);
        assert_eq!(winner.fitness().unwrap(), best_fitness);
    }

    #[test]
    fn test_next_generation_is_fully_scored() {
        let sd = sample_semester();
        let config = GaConfig::default().with_population_size(10);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut generation = Generation::seed(&sd, 10, &mut rng).unwrap();
        generation.evaluate_all(&sd, &config.weights, false);

        let next = generation.next_generation(&sd, &config, &mut rng).unwrap();
        assert_eq!(next.size(), 10);
        assert_eq!(next.number(), 1);
        assert!(next.individuals().iter().all(|t| t.fitness().is_some()));
    }

    #[test]
    fn test_elitism_keeps_best_fitness_monotone() {
        let sd = sample_semester();
        let config = GaConfig::default()
            .with_population_size(20)
            .with_elitism(1);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut generation = Generation::seed(&sd, 20, &mut rng).unwrap();
        generation.evaluate_all(&sd, &config.weights, false);

        for _ in 0..15 {
            let previous_best = generation.best().fitness().unwrap();
            generation = generation.next_generation(&sd, &config, &mut rng).unwrap();
            let best = generation.best().fitness().unwrap();
            assert!(best <= previous_best);
        }
    }
}
