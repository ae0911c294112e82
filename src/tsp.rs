//! Traveling salesman problem.
//!
//! The tour is encoded by `n * n` binary variables: `x(city, slot)` is `1`
//! when `city` is visited at position `slot`. The model adds the distance
//! `d[i][k]` for every pair of consecutive slots holding `i` and then `k`, and
//! a one-hot penalty `P * (sum - 1)^2` for every city and every slot. A valid
//! tour therefore has energy equal to its length.
use crate::error::{ProblemError, Result};
use annealers::model::{Assignment, BinaryQuadraticModel};
use annealers::solution::SampleSet;
use annealers::vartype::Vartype;
use std::fmt;

/// Variable of the TSP model: `city` is visited at position `slot`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TspVar {
	pub city: usize,
	pub slot: usize,
}

impl TspVar {
	pub fn new(city: usize, slot: usize) -> Self {
		Self { city, slot }
	}
}

impl fmt::Display for TspVar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "x_{}_{}", self.city, self.slot)
	}
}

/// Checks that `distances` is a non-empty square matrix of finite values.
pub fn validate_distances<R: AsRef<[f64]>>(distances: &[R]) -> Result<()> {
	let n = distances.len();
	if n == 0 {
		return Err(ProblemError::invalid_input("distance matrix is empty"));
	}
	for (i, row) in distances.iter().enumerate() {
		let row = row.as_ref();
		if row.len() != n {
			return Err(ProblemError::invalid_input(format!(
				"distance matrix is not square: row {} has {} entries, expected {}",
				i,
				row.len(),
				n
			)));
		}
		if let Some(j) = row.iter().position(|d| !d.is_finite()) {
			return Err(ProblemError::invalid_input(format!(
				"distance from {} to {} is not finite",
				i, j
			)));
		}
	}
	Ok(())
}

/// `max(distances) * n`, or `1.0` when no distance is positive.
pub fn default_penalty<R: AsRef<[f64]>>(distances: &[R]) -> f64 {
	let max = distances
		.iter()
		.flat_map(|row| row.as_ref().iter().copied())
		.fold(0.0, f64::max);
	let penalty = max * distances.len() as f64;
	if penalty > 0.0 {
		penalty
	} else {
		log::warn!("no positive distance, using penalty 1.0");
		1.0
	}
}

/// BINARY model of the tour through `distances`.
///
/// `penalty` weighs the one-hot constraints and defaults to
/// [`default_penalty()`]. It has to be finite and positive.
pub fn tsp_bqm<R: AsRef<[f64]>>(
	distances: &[R],
	penalty: Option<f64>,
) -> Result<BinaryQuadraticModel<TspVar>> {
	validate_distances(distances)?;
	let penalty = match penalty {
		Some(p) if p.is_finite() && p > 0.0 => p,
		Some(p) => {
			return Err(ProblemError::invalid_input(format!(
				"penalty must be finite and positive, got {}",
				p
			)))
		}
		None => default_penalty(distances),
	};
	let n = distances.len();
	let mut bqm = BinaryQuadraticModel::new(Vartype::Binary);
	for city in 0..n {
		for slot in 0..n {
			bqm.add_variable(TspVar::new(city, slot), 0.0);
		}
	}

	for (i, row) in distances.iter().enumerate() {
		for (k, d) in row.as_ref().iter().enumerate() {
			if i == k {
				continue;
			}
			for slot in 0..n {
				let next = (slot + 1) % n;
				bqm.add_interaction(TspVar::new(i, slot), TspVar::new(k, next), *d)?;
			}
		}
	}

	// each city once, each slot once
	for a in 0..n {
		add_one_hot(&mut bqm, (0..n).map(|b| TspVar::new(a, b)), penalty)?;
		add_one_hot(&mut bqm, (0..n).map(|b| TspVar::new(b, a)), penalty)?;
	}
	log::debug!(
		"tsp model: {} cities, {} variables, {} interactions, penalty {}",
		n,
		bqm.num_variables(),
		bqm.num_interactions(),
		penalty
	);
	Ok(bqm)
}

/// Adds `penalty * (sum(vars) - 1)^2`.
fn add_one_hot<I>(bqm: &mut BinaryQuadraticModel<TspVar>, vars: I, penalty: f64) -> Result<()>
where
	I: Iterator<Item = TspVar>,
{
	let vars = vars.collect::<Vec<_>>();
	for (idx, v) in vars.iter().enumerate() {
		// x^2 == x, so P * x - 2P * x
		bqm.add_variable(*v, -penalty);
		for w in vars[idx + 1..].iter() {
			bqm.add_interaction(*v, *w, 2.0 * penalty)?;
		}
	}
	bqm.add_offset(penalty);
	Ok(())
}

/// Reads the tour out of `sample`.
///
/// Returns `None` unless every slot holds exactly one city and every city is
/// visited exactly once.
pub fn decode_tour<A: Assignment<TspVar>>(sample: &A, n: usize) -> Option<Vec<usize>> {
	let mut tour = Vec::with_capacity(n);
	let mut visited = vec![false; n];
	for slot in 0..n {
		let mut cities = (0..n).filter(|city| sample.value(&TspVar::new(*city, slot)) == Some(1));
		let city = cities.next()?;
		if cities.next().is_some() || visited[city] {
			return None;
		}
		visited[city] = true;
		tour.push(city);
	}
	Some(tour)
}

/// Length of the closed tour, including the way back to its first city.
pub fn tour_distance<R: AsRef<[f64]>>(tour: &[usize], distances: &[R]) -> f64 {
	tour.iter()
		.zip(tour.iter().cycle().skip(1))
		.map(|(from, to)| distances[*from].as_ref()[*to])
		.sum()
}

/// Shortest valid tour among the records of `sampleset`, with its length.
pub fn best_tour<R: AsRef<[f64]>>(
	sampleset: &SampleSet<TspVar>,
	distances: &[R],
) -> Option<(Vec<usize>, f64)> {
	let n = distances.len();
	sampleset
		.iter()
		.filter_map(|record| decode_tour(&record.sample, n))
		.map(|tour| {
			let d = tour_distance(&tour, distances);
			(tour, d)
		})
		.fold(None, |best: Option<(Vec<usize>, f64)>, (tour, d)| match best {
			Some((_, bd)) if bd <= d => best,
			_ => Some((tour, d)),
		})
}
