//! Solver module contains abstraction of sampler types.
//!
//! ```text
//!    Sampler                 model + num_reads -> SampleSet
//!       |
//!    SolverGenerator         model -> prepared solver (schedule, adjacency)
//!       |
//!    ClassicalSolver         rng -> one read
//! ```
//!
//! A sampler that runs on the local machine usually implements
//! `SolverGenerator` to precompute everything a read needs, lets the
//! generated `ClassicalSolver` perform single reads with its own random
//! generator, and implements `Sampler` on top of both to run many reads and
//! aggregate them into a [`SampleSet`].
use crate::model::BinaryQuadraticModel;
use crate::solution::{SampleSet, SingleSolution};
use crate::variable::Variable;
use rand::Rng;
use std::error::Error;

/// Draws samples from a binary quadratic model.
pub trait Sampler<V: Variable> {
	type ErrorType: Error + Send + Sync + 'static;

	fn sample(
		&self,
		model: &BinaryQuadraticModel<V>,
		num_reads: usize,
	) -> Result<SampleSet<V>, Self::ErrorType>;
}

pub trait SolverGenerator<'a, V: Variable> {
	type SolverType: ClassicalSolver<ErrorType = Self::ErrorType>;
	type ErrorType: Error + Send + Sync;

	fn generate(
		&self,
		model: &'a BinaryQuadraticModel<V>,
	) -> Result<Self::SolverType, Self::ErrorType>;
}

pub trait ClassicalSolver: Send + Sync {
	type ErrorType: Error;

	/// Perform one read using `r` as the only source of randomness.
	fn solve_with_rng<T: Rng>(&self, r: &mut T) -> Result<SingleSolution, Self::ErrorType>;
}
