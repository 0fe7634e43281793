//! Genetic search over candidate timetables.
//!
//! The population layer ([`Generation`] plus the crossover/mutation
//! operators) advances one generation at a time; [`GaRunner`] drives the
//! loop and applies the termination policy (generation budget, zero
//! fitness, plateau).
//!
//! # Submodules
//!
//! - `config`: run parameters, all tunable
//! - `population`: generations, selection, crossover, mutation, elitism
//! - `runner`: the evaluate, select, reproduce, replace loop

mod config;
mod population;
mod runner;

pub use config::GaConfig;
pub use population::{mutate, single_point_crossover, Generation};
pub use runner::{GaResult, GaRunner};
