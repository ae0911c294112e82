//! Binary quadratic models and the data types shared by samplers.
//!
//! # Example
//! ```
//! use annealers::prelude::*;
//!
//! let bqm = BinaryQuadraticModel::from_qubo(vec![
//! 	(("x", "x"), 1.0),
//! 	(("y", "y"), -1.0),
//! 	(("x", "y"), 1.0),
//! ]);
//! let sample: Sample<&str> = vec![("x", 0), ("y", 1)].into_iter().collect();
//! assert_eq!(bqm.energy(&sample).unwrap(), -1.0);
//! ```
pub mod error;
pub mod model;
pub mod repr;
pub mod solution;
pub mod solver;
pub mod variable;
pub mod vartype;

pub use error::{ModelError, Result};

pub mod prelude {
	pub use crate::error::ModelError;
	pub use crate::model::{Assignment, BinaryQuadraticModel};
	pub use crate::solution::{Sample, SampleRecord, SampleSet, SingleSolution};
	pub use crate::solver::{ClassicalSolver, Sampler, SolverGenerator};
	pub use crate::variable::Variable;
	pub use crate::vartype::Vartype;
}

const TRUE_VAL: bool = true;
const FALSE_VAL: bool = false;
