//! Maximum cut.
//!
//! Each edge `(u, v)` contributes `2 x_u x_v - x_u - x_v`, which is `-1` when
//! the edge is cut and `0` otherwise, so the ground-state energy is minus the
//! maximum cut.
use crate::error::Result;
use crate::value_of;
use annealers::model::{Assignment, BinaryQuadraticModel};
use annealers::variable::Variable;

/// QUBO whose energy is `-cut_size` for every partition of the graph.
///
/// Self-loops contribute nothing, as they can never be cut. Repeated edges
/// are counted once per occurrence.
pub fn maxcut_bqm<V: Variable>(edges: &[(V, V)]) -> BinaryQuadraticModel<V> {
	let mut q = Vec::with_capacity(edges.len() * 3);
	for (u, v) in edges.iter() {
		q.push(((u.clone(), u.clone()), -1.0));
		q.push(((v.clone(), v.clone()), -1.0));
		q.push(((u.clone(), v.clone()), 2.0));
	}
	BinaryQuadraticModel::from_qubo(q)
}

/// Number of edges whose endpoints are assigned different values.
pub fn cut_size<V: Variable, A: Assignment<V>>(edges: &[(V, V)], sample: &A) -> Result<usize> {
	let mut cut = 0;
	for (u, v) in edges.iter() {
		if value_of(sample, u)? != value_of(sample, v)? {
			cut += 1;
		}
	}
	Ok(cut)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ProblemError;
	use annealers::solution::Sample;
	use annealers::ModelError;

	#[test]
	fn energy_is_negated_cut() {
		let edges = vec![(0, 1), (1, 2), (2, 0)];
		let bqm = maxcut_bqm(&edges);
		assert_eq!(bqm.num_variables(), 3);
		assert_eq!(bqm.linear(&0), Some(-2.0));
		assert_eq!(bqm.quadratic(&0, &1), Some(2.0));
		let sample: Sample<i32> = vec![(0, 1), (1, 0), (2, 0)].into_iter().collect();
		assert_eq!(cut_size(&edges, &sample).unwrap(), 2);
		assert_eq!(bqm.energy(&sample).unwrap(), -2.0);
	}

	#[test]
	fn self_loop_is_ignored() {
		let bqm = maxcut_bqm(&[("a", "a"), ("a", "b")]);
		let sample: Sample<&str> = vec![("a", 1), ("b", 0)].into_iter().collect();
		assert_eq!(bqm.energy(&sample).unwrap(), -1.0);
	}

	#[test]
	fn missing_endpoint() {
		let sample: Sample<i32> = vec![(0, 1)].into_iter().collect();
		assert!(matches!(
			cut_size(&[(0, 1)], &sample),
			Err(ProblemError::Model(ModelError::IncompleteAssignment { .. }))
		));
	}
}
