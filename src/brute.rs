//! Exhaustive search, used as the reference optimum for small instances.
use crate::error::{ProblemError, Result};
use annealers::model::BinaryQuadraticModel;
use annealers::repr::BinaryRepr;
use annealers::solution::Sample;
use annealers::variable::Variable;
use indexmap::IndexSet;
use rayon::prelude::*;

/// Largest number of variables [`brute_force_minimum()`] and
/// [`max_cut_brute_force()`] enumerate.
pub const MAX_BRUTE_FORCE_VARIABLES: usize = 20;

/// Largest number of cities [`tsp_brute_force()`] enumerates.
pub const MAX_BRUTE_FORCE_CITIES: usize = 10;

// energies closer than this (relative) count as equal
const ENERGY_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub struct GroundStates<V: Variable> {
	pub energy: f64,
	/// Every minimizing assignment, in enumeration order.
	pub samples: Vec<Sample<V>>,
}

fn state_of(mask: u64, len: usize) -> BinaryRepr {
	let bits = (0..len).map(|i| (mask >> i) & 1 == 1).collect::<Vec<_>>();
	BinaryRepr::from_vec(&bits)
}

/// Ground-state energy of `model` and all assignments reaching it.
pub fn brute_force_minimum<V: Variable + Sync>(
	model: &BinaryQuadraticModel<V>,
) -> Result<GroundStates<V>> {
	let n = model.num_variables();
	if n > MAX_BRUTE_FORCE_VARIABLES {
		return Err(ProblemError::invalid_input(format!(
			"{} variables are too many to enumerate, at most {}",
			n, MAX_BRUTE_FORCE_VARIABLES
		)));
	}
	let energies = (0..1u64 << n)
		.into_par_iter()
		.map(|mask| model.energy_of_state(&state_of(mask, n)))
		.collect::<Vec<_>>();
	let energy = energies.iter().copied().fold(f64::INFINITY, f64::min);
	let tolerance = ENERGY_TOLERANCE * energy.abs().max(1.0);
	let vartype = model.vartype();
	let samples = energies
		.iter()
		.enumerate()
		.filter(|(_, e)| **e - energy <= tolerance)
		.map(|(mask, _)| {
			model
				.variables()
				.enumerate()
				.map(|(i, v)| (v.clone(), vartype.get_value((mask >> i) & 1 == 1)))
				.collect()
		})
		.collect();
	Ok(GroundStates { energy, samples })
}

/// Size of the maximum cut of the graph given by `edges`.
pub fn max_cut_brute_force<V: Variable>(edges: &[(V, V)]) -> Result<usize> {
	let nodes = edges
		.iter()
		.flat_map(|(u, v)| vec![u, v])
		.collect::<IndexSet<_>>();
	let n = nodes.len();
	if n > MAX_BRUTE_FORCE_VARIABLES {
		return Err(ProblemError::invalid_input(format!(
			"{} nodes are too many to enumerate, at most {}",
			n, MAX_BRUTE_FORCE_VARIABLES
		)));
	}
	let ends = edges
		.iter()
		.filter_map(|(u, v)| Some((nodes.get_index_of(u)?, nodes.get_index_of(v)?)))
		.collect::<Vec<_>>();
	Ok((0..1u64 << n)
		.into_par_iter()
		.map(|mask| {
			ends.iter()
				.filter(|(u, v)| (mask >> u) & 1 != (mask >> v) & 1)
				.count()
		})
		.max()
		.unwrap_or(0))
}

/// Shortest closed tour through `distances` and its length. The tour starts
/// at city `0`.
pub fn tsp_brute_force<R: AsRef<[f64]>>(distances: &[R]) -> Result<(Vec<usize>, f64)> {
	crate::tsp::validate_distances(distances)?;
	let n = distances.len();
	if n > MAX_BRUTE_FORCE_CITIES {
		return Err(ProblemError::invalid_input(format!(
			"{} cities are too many to enumerate, at most {}",
			n, MAX_BRUTE_FORCE_CITIES
		)));
	}
	let mut tour = (0..n).collect::<Vec<_>>();
	let mut best = (tour.clone(), crate::tsp::tour_distance(&tour, distances));
	// Heap's algorithm on everything after the fixed start
	let m = n - 1;
	let mut c = vec![0; m];
	let mut i = 1;
	while i < m {
		if c[i] < i {
			let swap = if i % 2 == 0 { 0 } else { c[i] };
			tour.swap(1 + swap, 1 + i);
			let d = crate::tsp::tour_distance(&tour, distances);
			if d < best.1 {
				best = (tour.clone(), d);
			}
			c[i] += 1;
			i = 1;
		} else {
			c[i] = 0;
			i += 1;
		}
	}
	Ok(best)
}

#[cfg(test)]
mod tests {
	use super::*;
	use annealers::vartype::Vartype;

	#[test]
	fn minimum_of_small_qubo() {
		let bqm = BinaryQuadraticModel::from_qubo(vec![
			(("x", "x"), 1.0),
			(("y", "y"), -1.0),
			(("x", "y"), 1.0),
		]);
		let ground = brute_force_minimum(&bqm).unwrap();
		assert_eq!(ground.energy, -1.0);
		assert_eq!(ground.samples.len(), 1);
		assert_eq!(ground.samples[0]["x"], 0);
		assert_eq!(ground.samples[0]["y"], 1);
	}

	#[test]
	fn degenerate_spin_minimum() {
		let mut bqm = BinaryQuadraticModel::new(Vartype::Spin);
		bqm.add_interaction(0, 1, -1.0).unwrap();
		let ground = brute_force_minimum(&bqm).unwrap();
		assert_eq!(ground.energy, -1.0);
		assert_eq!(ground.samples.len(), 2);
		assert!(ground.samples.iter().all(|s| s[&0] == s[&1]));
	}

	#[test]
	fn too_many_variables() {
		let mut bqm = BinaryQuadraticModel::new(Vartype::Binary);
		for i in 0..=MAX_BRUTE_FORCE_VARIABLES {
			bqm.add_variable(i, 1.0);
		}
		assert!(matches!(
			brute_force_minimum(&bqm),
			Err(ProblemError::InvalidInput { .. })
		));
	}

	#[test]
	fn max_cut_of_triangle_and_square() {
		assert_eq!(max_cut_brute_force(&[(0, 1), (1, 2), (2, 0)]).unwrap(), 2);
		assert_eq!(
			max_cut_brute_force(&[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]).unwrap(),
			4
		);
		assert_eq!(max_cut_brute_force::<i32>(&[]).unwrap(), 0);
	}

	#[test]
	fn tsp_visits_every_permutation() {
		let distances = [
			[0.0, 2.0, 9.0, 10.0],
			[1.0, 0.0, 6.0, 4.0],
			[15.0, 7.0, 0.0, 8.0],
			[6.0, 3.0, 12.0, 0.0],
		];
		let (tour, d) = tsp_brute_force(&distances).unwrap();
		assert_eq!(tour, vec![0, 2, 3, 1]);
		assert_eq!(d, 21.0);
		assert_eq!(tsp_brute_force(&[[0.0]]).unwrap(), (vec![0], 0.0));
	}
}
