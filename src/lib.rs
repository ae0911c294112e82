//! QUBO formulations of a few combinatorial problems, to be solved with the
//! samplers of [`classical_solver`].
//!
//! # Examples
//!
//! ## Maximum cut
//! ```
//! # extern crate qubo_problems;
//! use qubo_problems::prelude::*;
//!
//! let edges = vec![(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)];
//! let bqm = maxcut_bqm(&edges);
//! let sampleset = SimulatedAnnealer::new().with_seed(1).sample(&bqm, 100).unwrap();
//! let best = &sampleset.first().unwrap().sample;
//! assert_eq!(cut_size(&edges, best).unwrap(), 4);
//! # assert_eq!(max_cut_brute_force(&edges).unwrap(), 4);
//! ```
//!
//! ## Constraint satisfaction
//! ```
//! # extern crate qubo_problems;
//! use qubo_problems::prelude::*;
//!
//! let bqm = Stitched::default().encode_and("a", "b", "c").unwrap();
//! let sampleset = SimulatedAnnealer::new().with_seed(3).sample(&bqm, 50).unwrap();
//! for record in sampleset.lowest() {
//! 	let s = &record.sample;
//! 	assert_eq!(s["a"] * s["b"], s["c"]);
//! }
//! ```
use annealers::model::Assignment;
use annealers::variable::Variable;
use annealers::ModelError;

extern crate annealers;
extern crate classical_solver;
extern crate rayon;

pub mod brute;
pub mod csp;
pub mod error;
pub mod maxcut;
pub mod tsp;

pub use error::{ProblemError, Result};

pub mod prelude {
	pub use crate::brute::{brute_force_minimum, max_cut_brute_force, tsp_brute_force};
	pub use crate::csp::{
		Constraint, ConstraintEncoder, ConstraintSatisfactionProblem, ManualPenalty, Stitched,
	};
	pub use crate::error::ProblemError;
	pub use crate::maxcut::{cut_size, maxcut_bqm};
	pub use crate::tsp::{best_tour, decode_tour, tour_distance, tsp_bqm, TspVar};
	pub use annealers::prelude::*;
	pub use classical_solver::sa::SimulatedAnnealer;
}

/// Value of `v` in `sample`, or [`ModelError::IncompleteAssignment`].
pub(crate) fn value_of<V: Variable, A: Assignment<V>>(sample: &A, v: &V) -> Result<i8> {
	sample.value(v).ok_or_else(|| {
		ModelError::IncompleteAssignment {
			missing: vec![format!("{:?}", v)],
		}
		.into()
	})
}
