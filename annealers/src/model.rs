//! Binary quadratic model.
//!
//! A model holds the energy function
//!
//! ```text
//! E(x) = offset + sum_i a_i x_i + sum_{i<j} b_ij x_i x_j
//! ```
//!
//! over variables that are either all BINARY (`x_i` in {0, 1}) or all SPIN
//! (`x_i` in {-1, +1}). Variables keep their insertion order, and each one is
//! also addressed by its position in that order. Samplers work on those
//! indices through [`BinaryQuadraticModel::linear_biases()`],
//! [`BinaryQuadraticModel::neighborhood()`] and
//! [`BinaryQuadraticModel::energy_of_state()`].
use crate::error::{ModelError, Result};
use crate::repr::BinaryRepr;
use crate::variable::{ordered_pair, Variable};
use crate::vartype::Vartype;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Anything that can answer "which value does `v` take".
pub trait Assignment<V> {
	fn value(&self, v: &V) -> Option<i8>;
}

impl<V: Variable, S: BuildHasher> Assignment<V> for IndexMap<V, i8, S> {
	#[inline]
	fn value(&self, v: &V) -> Option<i8> {
		self.get(v).copied()
	}
}

impl<V: Variable, S: BuildHasher> Assignment<V> for HashMap<V, i8, S> {
	#[inline]
	fn value(&self, v: &V) -> Option<i8> {
		self.get(v).copied()
	}
}

#[derive(Clone, Debug)]
pub struct BinaryQuadraticModel<V: Variable> {
	vartype: Vartype,
	linear: IndexMap<V, f64>,
	// adj[i][j] == adj[j][i] == b_ij
	adj: Vec<IndexMap<usize, f64>>,
	offset: f64,
}

impl<V: Variable> BinaryQuadraticModel<V> {
	pub fn new(vartype: Vartype) -> Self {
		Self {
			vartype,
			linear: IndexMap::new(),
			adj: Vec::new(),
			offset: 0.0,
		}
	}

	/// Build a BINARY model from QUBO coefficients.
	///
	/// Diagonal entries `(i, i)` become linear biases and off-diagonal entries
	/// become interactions; `(i, j)` and `(j, i)` are summed.
	pub fn from_qubo<I>(q: I) -> Self
	where
		I: IntoIterator<Item = ((V, V), f64)>,
	{
		let mut ret = Self::new(Vartype::Binary);
		for ((u, v), bias) in q {
			if u == v {
				ret.add_variable(u, bias);
			} else {
				let iu = ret.add_variable(u, 0.0);
				let iv = ret.add_variable(v, 0.0);
				ret.add_interaction_by_index(iu, iv, bias);
			}
		}
		ret
	}

	/// Build a SPIN model from linear biases `h` and couplings `j`.
	///
	/// Fails with [`ModelError::InvalidModel`] if a coupling has identical
	/// endpoints.
	pub fn from_ising<H, J>(h: H, j: J) -> Result<Self>
	where
		H: IntoIterator<Item = (V, f64)>,
		J: IntoIterator<Item = ((V, V), f64)>,
	{
		let mut ret = Self::new(Vartype::Spin);
		ret.add_variables_from(h);
		ret.add_interactions_from(j)?;
		Ok(ret)
	}

	#[inline]
	pub fn vartype(&self) -> Vartype {
		self.vartype
	}

	#[inline]
	pub fn offset(&self) -> f64 {
		self.offset
	}

	#[inline]
	pub fn num_variables(&self) -> usize {
		self.linear.len()
	}

	pub fn num_interactions(&self) -> usize {
		self.adj.iter().map(|n| n.len()).sum::<usize>() / 2
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.linear.is_empty()
	}

	/// Variables in insertion order.
	pub fn variables(&self) -> impl Iterator<Item = &V> + '_ {
		self.linear.keys()
	}

	#[inline]
	pub fn index_of(&self, v: &V) -> Option<usize> {
		self.linear.get_index_of(v)
	}

	#[inline]
	pub fn variable(&self, index: usize) -> Option<&V> {
		self.linear.get_index(index).map(|(v, _)| v)
	}

	pub fn contains(&self, v: &V) -> bool {
		self.linear.contains_key(v)
	}

	pub fn linear(&self, v: &V) -> Option<f64> {
		self.linear.get(v).copied()
	}

	/// Coefficient of the interaction between `u` and `v`, if any.
	pub fn quadratic(&self, u: &V, v: &V) -> Option<f64> {
		let (iu, iv) = (self.index_of(u)?, self.index_of(v)?);
		self.adj[iu].get(&iv).copied()
	}

	pub fn degree(&self, v: &V) -> Option<usize> {
		self.index_of(v).map(|i| self.adj[i].len())
	}

	pub fn iter_linear(&self) -> impl Iterator<Item = (&V, f64)> + '_ {
		self.linear.iter().map(|(v, b)| (v, *b))
	}

	/// Each interaction once, as `(u, v, bias)` with `u` inserted before `v`.
	pub fn iter_quadratic(&self) -> impl Iterator<Item = (&V, &V, f64)> + '_ {
		self.adj.iter().enumerate().flat_map(move |(i, neighbors)| {
			neighbors
				.iter()
				.filter(move |(j, _)| **j > i)
				.map(move |(j, b)| (self.variable_unchecked(i), self.variable_unchecked(*j), *b))
		})
	}

	/// Add `v` to the model, accumulating `bias` into its linear coefficient.
	/// Returns the index of `v`.
	pub fn add_variable(&mut self, v: V, bias: f64) -> usize {
		let entry = self.linear.entry(v);
		let index = entry.index();
		*entry.or_insert(0.0) += bias;
		if index == self.adj.len() {
			self.adj.push(IndexMap::new());
		}
		index
	}

	pub fn add_variables_from<I>(&mut self, linear: I)
	where
		I: IntoIterator<Item = (V, f64)>,
	{
		for (v, bias) in linear {
			self.add_variable(v, bias);
		}
	}

	/// Accumulate `bias` into the interaction between `u` and `v`, adding the
	/// endpoints with zero linear bias if they are new.
	pub fn add_interaction(&mut self, u: V, v: V, bias: f64) -> Result<()> {
		if u == v {
			return Err(ModelError::invalid_model(format!(
				"variable {:?} cannot interact with itself",
				u
			)));
		}
		let iu = self.add_variable(u, 0.0);
		let iv = self.add_variable(v, 0.0);
		self.add_interaction_by_index(iu, iv, bias);
		Ok(())
	}

	pub fn add_interactions_from<I>(&mut self, quadratic: I) -> Result<()>
	where
		I: IntoIterator<Item = ((V, V), f64)>,
	{
		for ((u, v), bias) in quadratic {
			self.add_interaction(u, v, bias)?;
		}
		Ok(())
	}

	#[inline]
	pub fn add_offset(&mut self, c: f64) {
		self.offset += c;
	}

	/// Multiply every coefficient, offset included, by `k`.
	pub fn scale(&mut self, k: f64) {
		for b in self.linear.values_mut() {
			*b *= k;
		}
		for neighbors in self.adj.iter_mut() {
			for b in neighbors.values_mut() {
				*b *= k;
			}
		}
		self.offset *= k;
	}

	/// Energy of `sample`.
	///
	/// Fails with [`ModelError::IncompleteAssignment`] if a model variable is
	/// missing and with [`ModelError::InvalidArgument`] if a value is outside
	/// the domain of the model's vartype. Extra keys are ignored.
	pub fn energy<A: Assignment<V>>(&self, sample: &A) -> Result<f64> {
		let mut values = Vec::with_capacity(self.num_variables());
		let mut missing = Vec::new();
		for v in self.linear.keys() {
			match sample.value(v) {
				Some(x) => values.push(x),
				None => missing.push(format!("{:?}", v)),
			}
		}
		if !missing.is_empty() {
			return Err(ModelError::IncompleteAssignment { missing });
		}
		let state = BinaryRepr::from_values(self.vartype, &values).ok_or_else(|| {
			ModelError::invalid_argument(format!(
				"sample has values outside of the {} domain",
				self.vartype
			))
		})?;
		Ok(self.energy_of_state(&state))
	}

	/// Energy of a packed state whose bit `i` belongs to the variable with
	/// index `i`.
	pub fn energy_of_state(&self, state: &BinaryRepr) -> f64 {
		assert_eq!(state.len(), self.num_variables());
		let x = state.to_values(self.vartype);
		let mut energy = self.offset;
		for (i, (b, neighbors)) in self.linear.values().zip(self.adj.iter()).enumerate() {
			let xi = f64::from(x[i]);
			energy += b * xi;
			for (j, w) in neighbors.iter() {
				if *j > i {
					energy += w * xi * f64::from(x[*j]);
				}
			}
		}
		energy
	}

	/// Linear biases indexed by variable index.
	pub fn linear_biases(&self) -> Vec<f64> {
		self.linear.values().copied().collect()
	}

	/// Interactions of the variable with index `i`, as `(neighbor index, bias)`.
	pub fn neighborhood(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
		self.adj[i].iter().map(|(j, b)| (*j, *b))
	}

	/// Largest absolute value among all linear and quadratic coefficients.
	pub fn max_abs_bias(&self) -> f64 {
		self.linear
			.values()
			.chain(self.adj.iter().flat_map(|n| n.values()))
			.fold(0.0, |m, b| b.abs().max(m))
	}

	/// Convert the model to `vartype` using `x = (s + 1) / 2`. Energies of
	/// corresponding assignments are unchanged.
	pub fn change_vartype(mut self, vartype: Vartype) -> Self {
		if self.vartype != vartype {
			log::debug!(
				"converting {} variables and {} interactions from {} to {}",
				self.num_variables(),
				self.num_interactions(),
				self.vartype,
				vartype
			);
		}
		match (self.vartype, vartype) {
			(Vartype::Binary, Vartype::Spin) => {
				let mut linear = Vec::with_capacity(self.num_variables());
				let mut offset = self.offset;
				for (i, a) in self.linear.values().enumerate() {
					let coupled: f64 = self.adj[i].values().sum();
					linear.push(a / 2.0 + coupled / 4.0);
					offset += a / 2.0;
				}
				for (_, _, b) in self.iter_quadratic() {
					offset += b / 4.0;
				}
				self.replace_biases(linear, 0.25, offset);
			}
			(Vartype::Spin, Vartype::Binary) => {
				let mut linear = Vec::with_capacity(self.num_variables());
				let mut offset = self.offset;
				for (i, h) in self.linear.values().enumerate() {
					let coupled: f64 = self.adj[i].values().sum();
					linear.push(2.0 * h - 2.0 * coupled);
					offset -= h;
				}
				for (_, _, j) in self.iter_quadratic() {
					offset += j;
				}
				self.replace_biases(linear, 4.0, offset);
			}
			_ => {}
		}
		self.vartype = vartype;
		self
	}

	pub fn to_vartype(&self, vartype: Vartype) -> Self {
		self.clone().change_vartype(vartype)
	}

	/// QUBO coefficients and offset of the BINARY form of the model. Linear
	/// biases appear on the diagonal.
	pub fn to_qubo(&self) -> (IndexMap<(V, V), f64>, f64) {
		let binary;
		let model = if self.vartype == Vartype::Binary {
			self
		} else {
			binary = self.to_vartype(Vartype::Binary);
			&binary
		};
		let mut q = IndexMap::with_capacity(model.num_variables() + model.num_interactions());
		for (v, b) in model.iter_linear() {
			q.insert((v.clone(), v.clone()), b);
		}
		for (u, v, b) in model.iter_quadratic() {
			q.insert((u.clone(), v.clone()), b);
		}
		(q, model.offset)
	}

	/// Ising `(h, J, offset)` of the SPIN form of the model.
	pub fn to_ising(&self) -> (IndexMap<V, f64>, IndexMap<(V, V), f64>, f64) {
		let spin;
		let model = if self.vartype == Vartype::Spin {
			self
		} else {
			spin = self.to_vartype(Vartype::Spin);
			&spin
		};
		let h = model.linear.clone();
		let j = model
			.iter_quadratic()
			.map(|(u, v, b)| ((u.clone(), v.clone()), b))
			.collect();
		(h, j, model.offset)
	}

	fn replace_biases(&mut self, linear: Vec<f64>, quadratic_factor: f64, offset: f64) {
		for (b, new) in self.linear.values_mut().zip(linear) {
			*b = new;
		}
		for neighbors in self.adj.iter_mut() {
			for b in neighbors.values_mut() {
				*b *= quadratic_factor;
			}
		}
		self.offset = offset;
	}

	fn add_interaction_by_index(&mut self, iu: usize, iv: usize, bias: f64) {
		debug_assert_ne!(iu, iv);
		let (i, j) = ordered_pair(iu, iv);
		*self.adj[i].entry(j).or_insert(0.0) += bias;
		*self.adj[j].entry(i).or_insert(0.0) += bias;
	}

	#[inline]
	fn variable_unchecked(&self, index: usize) -> &V {
		self.linear
			.get_index(index)
			.map(|(v, _)| v)
			.expect("index of an existing variable")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample<'a>(pairs: &[(&'a str, i8)]) -> IndexMap<&'a str, i8> {
		pairs.iter().cloned().collect()
	}

	#[test]
	fn add_variable_accumulates() {
		let mut bqm = BinaryQuadraticModel::new(Vartype::Binary);
		assert_eq!(bqm.add_variable("a", 1.5), 0);
		assert_eq!(bqm.add_variable("b", 0.0), 1);
		assert_eq!(bqm.add_variable("a", -4.0), 0);
		assert_eq!(bqm.linear(&"a"), Some(-2.5));
		assert_eq!(bqm.num_variables(), 2);
	}

	#[test]
	fn add_interaction_adds_endpoints() {
		let mut bqm = BinaryQuadraticModel::new(Vartype::Spin);
		bqm.add_interaction("a", "b", 2.0).unwrap();
		bqm.add_interaction("b", "a", 0.5).unwrap();
		assert_eq!(bqm.linear(&"a"), Some(0.0));
		assert_eq!(bqm.linear(&"b"), Some(0.0));
		assert_eq!(bqm.quadratic(&"a", &"b"), Some(2.5));
		assert_eq!(bqm.quadratic(&"b", &"a"), Some(2.5));
		assert_eq!(bqm.num_interactions(), 1);
		assert_eq!(bqm.degree(&"a"), Some(1));
	}

	#[test]
	fn self_interaction_is_rejected() {
		let mut bqm = BinaryQuadraticModel::new(Vartype::Binary);
		let err = bqm.add_interaction("a", "a", 1.0).unwrap_err();
		assert!(matches!(err, ModelError::InvalidModel { .. }));
		assert!(bqm.is_empty());
	}

	#[test]
	fn from_qubo_sums_symmetric_pairs() {
		let bqm = BinaryQuadraticModel::from_qubo(vec![
			(("x", "x"), 1.0),
			(("x", "y"), 1.0),
			(("y", "x"), 2.0),
			(("y", "y"), -1.0),
		]);
		assert_eq!(bqm.vartype(), Vartype::Binary);
		assert_eq!(bqm.quadratic(&"x", &"y"), Some(3.0));
		assert_eq!(bqm.num_interactions(), 1);
		assert_eq!(bqm.energy(&sample(&[("x", 1), ("y", 1)])).unwrap(), 3.0);
	}

	#[test]
	fn from_ising_rejects_self_coupling() {
		let err =
			BinaryQuadraticModel::from_ising(vec![(0, 1.0)], vec![((0, 0), -1.0)]).unwrap_err();
		assert!(matches!(err, ModelError::InvalidModel { .. }));
	}

	#[test]
	fn energy_of_qubo() {
		let bqm = BinaryQuadraticModel::from_qubo(vec![
			(("x", "x"), 1.0),
			(("y", "y"), -1.0),
			(("x", "y"), 1.0),
		]);
		assert_eq!(bqm.energy(&sample(&[("x", 0), ("y", 0)])).unwrap(), 0.0);
		assert_eq!(bqm.energy(&sample(&[("x", 0), ("y", 1)])).unwrap(), -1.0);
		assert_eq!(bqm.energy(&sample(&[("x", 1), ("y", 0)])).unwrap(), 1.0);
		assert_eq!(bqm.energy(&sample(&[("x", 1), ("y", 1)])).unwrap(), 1.0);
	}

	#[test]
	fn energy_of_ising() {
		let linear = vec![(0, -1.0), (1, -1.0)];
		let mut bqm = BinaryQuadraticModel::from_ising(linear, vec![((0, 1), -1.0)]).unwrap();
		bqm.add_offset(0.5);
		let mut s: HashMap<i32, i8> = HashMap::new();
		s.insert(0, 1);
		s.insert(1, 1);
		assert_eq!(bqm.energy(&s).unwrap(), -2.5);
		s.insert(1, -1);
		assert_eq!(bqm.energy(&s).unwrap(), 1.5);
	}

	#[test]
	fn energy_reports_missing_variables() {
		let bqm = BinaryQuadraticModel::from_qubo(vec![(("x", "y"), 1.0)]);
		match bqm.energy(&sample(&[("x", 1)])) {
			Err(ModelError::IncompleteAssignment { missing }) => {
				assert_eq!(missing, vec!["\"y\"".to_owned()])
			}
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn energy_rejects_out_of_domain_values() {
		let bqm = BinaryQuadraticModel::from_qubo(vec![(("x", "x"), 1.0)]);
		let err = bqm.energy(&sample(&[("x", -1)])).unwrap_err();
		assert!(matches!(err, ModelError::InvalidArgument { .. }));
	}

	#[test]
	fn vartype_round_trip_keeps_energies() {
		let mut bqm = BinaryQuadraticModel::from_qubo(vec![
			(("a", "a"), 1.0),
			(("b", "b"), -3.0),
			(("a", "b"), 2.0),
			(("b", "c"), -1.5),
		]);
		bqm.add_offset(0.25);
		let spin = bqm.to_vartype(Vartype::Spin);
		let back = spin.to_vartype(Vartype::Binary);
		for bits in 0..8u8 {
			let state = BinaryRepr::from_vec(&[bits & 1 > 0, bits & 2 > 0, bits & 4 > 0]);
			let e = bqm.energy_of_state(&state);
			assert!((spin.energy_of_state(&state) - e).abs() < 1e-9);
			assert!((back.energy_of_state(&state) - e).abs() < 1e-9);
		}
		assert_eq!(back.quadratic(&"a", &"b"), Some(2.0));
	}

	#[test]
	fn same_vartype_is_unchanged() {
		let bqm = BinaryQuadraticModel::from_qubo(vec![(("a", "a"), 1.0), (("a", "b"), 2.0)]);
		let same = bqm.to_vartype(Vartype::Binary);
		assert_eq!(same.vartype(), Vartype::Binary);
		assert_eq!(same.to_qubo(), bqm.to_qubo());
	}

	#[test]
	fn to_qubo_and_to_ising() {
		let bqm =
			BinaryQuadraticModel::from_ising(vec![("s", 1.0)], vec![(("s", "t"), -1.0)]).unwrap();
		let (h, j, offset) = bqm.to_ising();
		assert_eq!(h[&"s"], 1.0);
		assert_eq!(h[&"t"], 0.0);
		assert_eq!(j[&("s", "t")], -1.0);
		assert_eq!(offset, 0.0);

		let (q, offset) = bqm.to_qubo();
		// s = 2x - 1: 2x_s - 1 - (4 x_s x_t - 2 x_s - 2 x_t + 1)
		assert_eq!(q[&("s", "s")], 4.0);
		assert_eq!(q[&("t", "t")], 2.0);
		assert_eq!(q[&("s", "t")], -4.0);
		assert_eq!(offset, -2.0);
	}

	#[test]
	fn scale_multiplies_everything() {
		let mut bqm = BinaryQuadraticModel::from_qubo(vec![(("a", "a"), 1.0), (("a", "b"), -2.0)]);
		bqm.add_offset(3.0);
		bqm.scale(2.0);
		assert_eq!(bqm.linear(&"a"), Some(2.0));
		assert_eq!(bqm.quadratic(&"a", &"b"), Some(-4.0));
		assert_eq!(bqm.offset(), 6.0);
		assert_eq!(bqm.max_abs_bias(), 4.0);
	}

	#[test]
	fn iter_quadratic_yields_each_pair_once() {
		let mut bqm = BinaryQuadraticModel::new(Vartype::Binary);
		bqm.add_interaction(1, 2, 1.0).unwrap();
		bqm.add_interaction(3, 1, 2.0).unwrap();
		bqm.add_interaction(2, 3, 3.0).unwrap();
		let pairs: Vec<_> = bqm.iter_quadratic().collect();
		assert_eq!(pairs, vec![(&1, &2, 1.0), (&1, &3, 2.0), (&2, &3, 3.0)]);
	}
}
