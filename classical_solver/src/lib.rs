//! Default annealing implementation.
//!
//! This annealer use *simulated annealing* on local machine.
//!
//! # Example:
//! ```
//! use annealers::prelude::*;
//! use classical_solver::sa::SimulatedAnnealer;
//!
//! let bqm = BinaryQuadraticModel::from_ising(
//! 	vec![(0, -1.0), (1, -1.0)],
//! 	vec![((0, 1), -1.0)],
//! )
//! .unwrap();
//! let sampler = SimulatedAnnealer::new().with_num_sweeps(200).with_seed(7);
//! let sampleset = sampler.sample(&bqm, 20).unwrap();
//! let best = sampleset.first().unwrap();
//! assert_eq!(best.energy, -3.0);
//! assert_eq!(best.sample[&0], 1);
//! ```

pub mod algo;
pub mod beta;
pub mod error;
pub mod sa;

pub use error::{AnnealError, Result};
