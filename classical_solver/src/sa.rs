use crate::algo::{simulated_annealing, Couplings};
use crate::beta::{generate_schedule, BetaType, Interpolation};
use crate::error::{AnnealError, Result};
use annealers::model::BinaryQuadraticModel;
use annealers::repr::BinaryRepr;
use annealers::solution::{SampleSet, SingleSolution};
use annealers::solver::{ClassicalSolver, Sampler, SolverGenerator};
use annealers::variable::Variable;
use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Simulated annealing sampler.
///
/// Each read starts from a uniformly random state and runs `num_sweeps`
/// Metropolis sweeps while beta rises along the schedule. Reads are
/// independent and run on the rayon thread pool.
///
/// # Example
/// ```
/// use annealers::prelude::*;
/// use classical_solver::sa::SimulatedAnnealer;
///
/// let bqm = BinaryQuadraticModel::from_qubo(vec![
/// 	(("x", "x"), 1.0),
/// 	(("y", "y"), -1.0),
/// 	(("x", "y"), 1.0),
/// ]);
/// let sampler = SimulatedAnnealer::new().with_seed(42);
/// let sampleset = sampler.sample(&bqm, 100).unwrap();
/// assert_eq!(sampleset.num_reads(), 100);
/// assert_eq!(sampleset.first().unwrap().energy, -1.0);
/// ```
#[derive(Clone, Debug)]
pub struct SimulatedAnnealer {
	/// Total number of sweeps of a read.
	pub num_sweeps: usize,
	/// Number of sweeps performed at each beta. Must divide `num_sweeps`.
	pub sweeps_per_beta: usize,
	pub beta: BetaType,
	pub interpolation: Interpolation,
	/// Seed of the whole run. `None` draws a fresh one.
	pub seed: Option<u64>,
	/// Checked before each read starts.
	pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SimulatedAnnealer {
	fn default() -> Self {
		Self::new()
	}
}

impl SimulatedAnnealer {
	pub fn new() -> Self {
		Self {
			num_sweeps: 1000,
			sweeps_per_beta: 1,
			beta: BetaType::Auto,
			interpolation: Interpolation::Geometric,
			seed: None,
			cancel: None,
		}
	}

	pub fn with_num_sweeps(mut self, num_sweeps: usize) -> Self {
		self.num_sweeps = num_sweeps;
		self
	}

	pub fn with_sweeps_per_beta(mut self, sweeps_per_beta: usize) -> Self {
		self.sweeps_per_beta = sweeps_per_beta;
		self
	}

	pub fn with_beta_range(mut self, beta_start: f64, beta_end: f64) -> Self {
		self.beta = BetaType::Range(beta_start, beta_end);
		self
	}

	/// Use an explicit schedule. `num_sweeps` is then ignored and every read
	/// performs `schedule.len() * sweeps_per_beta` sweeps.
	pub fn with_beta_schedule(mut self, schedule: Vec<f64>) -> Self {
		self.beta = BetaType::Schedule(schedule);
		self
	}

	pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
		self.interpolation = interpolation;
		self
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
		self.cancel = Some(cancel);
		self
	}

	/// Validates the configuration.
	pub fn validate(&self) -> Result<()> {
		if self.sweeps_per_beta == 0 {
			return Err(AnnealError::invalid_argument(
				"sweeps_per_beta must be positive",
			));
		}
		if !matches!(self.beta, BetaType::Schedule(_)) {
			if self.num_sweeps == 0 {
				return Err(AnnealError::invalid_argument("num_sweeps must be positive"));
			}
			if self.num_sweeps % self.sweeps_per_beta != 0 {
				return Err(AnnealError::invalid_argument(format!(
					"num_sweeps ({}) must be a multiple of sweeps_per_beta ({})",
					self.num_sweeps, self.sweeps_per_beta
				)));
			}
		}
		self.beta.validate(self.interpolation)
	}

	fn is_cancelled(&self) -> bool {
		self.cancel
			.as_ref()
			.map_or(false, |flag| flag.load(Ordering::Relaxed))
	}
}

/// Seeds of every read, drawn in order from a generator seeded with `seed`.
fn read_seeds(seed: u64, num_reads: usize) -> Vec<u64> {
	let mut master = StdRng::seed_from_u64(seed);
	(0..num_reads).map(|_| master.next_u64()).collect()
}

/// A model prepared for annealing: dense couplings and the beta schedule.
pub struct SimulatedAnnealerRun<'a, V: Variable> {
	sweeps_per_beta: usize,
	beta_schedule: Vec<f64>,
	couplings: Couplings,
	model: &'a BinaryQuadraticModel<V>,
}

impl<'a, V: Variable> SimulatedAnnealerRun<'a, V> {
	pub fn beta_schedule(&self) -> &[f64] {
		&self.beta_schedule
	}
}

impl<'a, V: Variable + Sync + 'a> SolverGenerator<'a, V> for SimulatedAnnealer {
	type SolverType = SimulatedAnnealerRun<'a, V>;
	type ErrorType = AnnealError;

	fn generate(&self, model: &'a BinaryQuadraticModel<V>) -> Result<Self::SolverType> {
		self.validate()?;
		let count = self.num_sweeps / self.sweeps_per_beta;
		let beta_schedule = generate_schedule(&self.beta, self.interpolation, count, model);
		let couplings = Couplings {
			vartype: model.vartype(),
			h: model.linear_biases(),
			neighbors: (0..model.num_variables())
				.map(|i| model.neighborhood(i).collect())
				.collect(),
		};
		Ok(SimulatedAnnealerRun {
			sweeps_per_beta: self.sweeps_per_beta,
			beta_schedule,
			couplings,
			model,
		})
	}
}

impl<'a, V: Variable + Sync> ClassicalSolver for SimulatedAnnealerRun<'a, V> {
	type ErrorType = AnnealError;

	fn solve_with_rng<T: Rng>(&self, r: &mut T) -> Result<SingleSolution> {
		let mut state = BinaryRepr::new_random(self.couplings.len(), r);
		simulated_annealing(
			r,
			&mut state,
			self.beta_schedule.as_slice(),
			self.sweeps_per_beta,
			&self.couplings,
		);
		// the energy is evaluated from scratch rather than tracked through the
		// sweeps
		Ok(SingleSolution::from_state(state).with_energy(self.model))
	}
}

impl<V: Variable + Sync> Sampler<V> for SimulatedAnnealer {
	type ErrorType = AnnealError;

	fn sample(&self, model: &BinaryQuadraticModel<V>, num_reads: usize) -> Result<SampleSet<V>> {
		if num_reads == 0 {
			return Err(AnnealError::invalid_argument("num_reads must be positive"));
		}
		self.validate()?;
		if self.is_cancelled() {
			return Err(AnnealError::Cancelled);
		}
		if model.is_empty() {
			log::debug!("model has no variables, returning the offset only");
			let solution = SingleSolution {
				state: BinaryRepr::with_len(0),
				energy: Some(model.offset()),
				occurrences: num_reads,
			};
			return Ok(SampleSet::from_solutions(model, Some(solution)));
		}
		let run = self.generate(model)?;
		let seed = self.seed.unwrap_or_else(rand::random);
		log::debug!(
			"annealing {} variables: reads={} sweeps={} betas={:?}..{:?} seed={}",
			model.num_variables(),
			num_reads,
			run.beta_schedule.len() * run.sweeps_per_beta,
			run.beta_schedule.first(),
			run.beta_schedule.last(),
			seed
		);
		let solutions = read_seeds(seed, num_reads)
			.into_par_iter()
			.enumerate()
			.map(|(read, read_seed)| {
				if self.is_cancelled() {
					return Err(AnnealError::Cancelled);
				}
				let mut r = SmallRng::seed_from_u64(read_seed);
				let sol = run.solve_with_rng(&mut r)?;
				log::trace!("read {} finished with energy {:?}", read, sol.energy);
				Ok(sol)
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(SampleSet::from_solutions(model, solutions))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use annealers::vartype::Vartype;

	#[test]
	fn generate_borrows_short_lived_labels() {
		let names = vec![String::from("a"), String::from("b")];
		let mut model = BinaryQuadraticModel::new(Vartype::Binary);
		model.add_variable(names[0].as_str(), -1.0);
		model.add_variable(names[1].as_str(), 2.0);
		model.add_interaction(names[0].as_str(), names[1].as_str(), -0.5).unwrap();

		let sampler = SimulatedAnnealer::new().with_num_sweeps(20);
		let run = sampler.generate(&model).unwrap();
		assert_eq!(run.beta_schedule().len(), 20);
		let solution = run.solve_with_rng(&mut SmallRng::seed_from_u64(7)).unwrap();
		assert_eq!(solution.state.to_vec(), vec![true, false]);
		assert_eq!(solution.energy, Some(-1.0));
	}

	#[test]
	fn read_seeds_depend_only_on_the_master_seed() {
		assert_eq!(read_seeds(5, 8), read_seeds(5, 8));
		assert_eq!(read_seeds(5, 3)[..], read_seeds(5, 8)[..3]);
		assert_ne!(read_seeds(5, 8), read_seeds(6, 8));
	}
}
