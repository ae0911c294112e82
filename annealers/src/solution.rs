use crate::model::BinaryQuadraticModel;
use crate::repr::BinaryRepr;
use crate::variable::Variable;
use crate::vartype::Vartype;
use indexmap::IndexMap;
use std::fmt::Display;

/// A full assignment of the variables of a model, in model order.
pub type Sample<V> = IndexMap<V, i8>;

/// Raw result of a single read, addressed by variable index.
#[derive(Clone, Debug)]
pub struct SingleSolution {
	pub state: BinaryRepr,
	pub energy: Option<f64>,
	pub occurrences: usize,
}

impl SingleSolution {
	/// Generate SingleSolution from qubit values
	pub fn from_vec(v: &[bool]) -> Self {
		Self::from_state(BinaryRepr::from_vec(v))
	}

	/// Generate SingleSolution from BinaryRepr
	pub fn from_state(state: BinaryRepr) -> Self {
		Self {
			state,
			energy: None,
			occurrences: 1,
		}
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.state.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.state.is_empty()
	}

	/// Ensure that SingleSolution has energy. The energy is always evaluated
	/// from scratch on the model.
	pub fn with_energy<V: Variable>(mut self, model: &BinaryQuadraticModel<V>) -> Self {
		if self.energy.is_none() {
			self.energy = Some(model.energy_of_state(&self.state));
		}
		self
	}

	/// Get the value of the variable located in `index`.
	pub fn get(&self, index: usize) -> bool {
		self.state.get(index)
	}
}

impl std::ops::Index<usize> for SingleSolution {
	type Output = bool;
	#[inline]
	fn index(&self, index: usize) -> &bool {
		&self.state[index]
	}
}

/// One distinct sample of a [`SampleSet`] together with its energy and the
/// number of reads that ended in it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleRecord<V: Variable> {
	pub sample: Sample<V>,
	pub energy: f64,
	pub num_occurrences: usize,
}

/// Ensemble of samples sorted by ascending energy.
///
/// Identical samples are merged and their occurrences summed. Records with
/// equal energy keep the order in which they were first seen.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleSet<V: Variable> {
	vartype: Vartype,
	records: Vec<SampleRecord<V>>,
}

impl<V: Variable> SampleSet<V> {
	/// Merge raw per-read solutions of `model` into a sample set.
	///
	/// Solutions must be given in read order; that order breaks energy ties.
	pub fn from_solutions<I>(model: &BinaryQuadraticModel<V>, solutions: I) -> Self
	where
		I: IntoIterator<Item = SingleSolution>,
	{
		let mut merged: IndexMap<BinaryRepr, (f64, usize)> = IndexMap::new();
		for sol in solutions {
			let energy = sol.energy.unwrap_or_else(|| model.energy_of_state(&sol.state));
			merged
				.entry(sol.state)
				.or_insert((energy, 0))
				.1 += sol.occurrences;
		}
		let vartype = model.vartype();
		let mut records = merged
			.into_iter()
			.map(|(state, (energy, num_occurrences))| SampleRecord {
				sample: model
					.variables()
					.cloned()
					.zip(state.iter().map(|b| vartype.get_value(b)))
					.collect(),
				energy,
				num_occurrences,
			})
			.collect::<Vec<_>>();
		records.sort_by(|a, b| a.energy.total_cmp(&b.energy));
		Self { vartype, records }
	}

	/// Build a sample set from records that are already merged.
	pub fn from_records(vartype: Vartype, mut records: Vec<SampleRecord<V>>) -> Self {
		records.sort_by(|a, b| a.energy.total_cmp(&b.energy));
		Self { vartype, records }
	}

	#[inline]
	pub fn vartype(&self) -> Vartype {
		self.vartype
	}

	/// The record with the lowest energy.
	#[inline]
	pub fn first(&self) -> Option<&SampleRecord<V>> {
		self.records.first()
	}

	/// All records sharing the lowest energy.
	pub fn lowest(&self) -> impl Iterator<Item = &SampleRecord<V>> + '_ {
		let min = self.first().map(|r| r.energy);
		self.records
			.iter()
			.take_while(move |r| Some(r.energy) == min)
	}

	/// Total number of reads, i.e. the sum of all occurrence counts.
	pub fn num_reads(&self) -> usize {
		self.records.iter().map(|r| r.num_occurrences).sum()
	}

	/// Number of distinct samples.
	#[inline]
	pub fn len(&self) -> usize {
		self.records.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, SampleRecord<V>> {
		self.records.iter()
	}

	#[inline]
	pub fn records(&self) -> &[SampleRecord<V>] {
		&self.records
	}

	pub fn into_records(self) -> Vec<SampleRecord<V>> {
		self.records
	}

	/// Keep only the `n` lowest-energy records.
	pub fn truncate(&mut self, n: usize) {
		self.records.truncate(n);
	}

	/// Re-express every sample in `vartype`. Energies are unchanged because
	/// model conversion preserves them.
	pub fn change_vartype(mut self, vartype: Vartype) -> Self {
		if vartype != self.vartype {
			let from = self.vartype;
			for record in self.records.iter_mut() {
				for x in record.sample.values_mut() {
					let b = from.from_value(*x).unwrap_or(*x > 0);
					*x = vartype.get_value(b);
				}
			}
			self.vartype = vartype;
		}
		self
	}
}

impl<'a, V: Variable> IntoIterator for &'a SampleSet<V> {
	type Item = &'a SampleRecord<V>;
	type IntoIter = std::slice::Iter<'a, SampleRecord<V>>;
	fn into_iter(self) -> Self::IntoIter {
		self.records.iter()
	}
}

impl<V: Variable> IntoIterator for SampleSet<V> {
	type Item = SampleRecord<V>;
	type IntoIter = std::vec::IntoIter<SampleRecord<V>>;
	fn into_iter(self) -> Self::IntoIter {
		self.records.into_iter()
	}
}

impl<V: Variable> std::ops::Index<usize> for SampleSet<V> {
	type Output = SampleRecord<V>;
	fn index(&self, index: usize) -> &SampleRecord<V> {
		&self.records[index]
	}
}

impl<V: Variable + Display> Display for SampleSet<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for record in self.records.iter() {
			f.write_str("{")?;
			for (i, (v, x)) in record.sample.iter().enumerate() {
				if i > 0 {
					f.write_str(", ")?;
				}
				write!(f, "{}: {}", v, x)?;
			}
			writeln!(
				f,
				"}} energy={} num_occurrences={}",
				record.energy, record.num_occurrences
			)?;
		}
		write!(f, "['{}', {} rows, {} samples]", self.vartype, self.len(), self.num_reads())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn model() -> BinaryQuadraticModel<&'static str> {
		BinaryQuadraticModel::from_qubo(vec![
			(("x", "x"), 1.0),
			(("y", "y"), -1.0),
			(("x", "y"), 1.0),
		])
	}

	#[test]
	fn merges_and_sorts() {
		let model = model();
		let solutions = vec![
			SingleSolution::from_vec(&[true, true]),
			SingleSolution::from_vec(&[false, true]),
			SingleSolution::from_vec(&[true, false]),
			SingleSolution::from_vec(&[false, true]),
			SingleSolution::from_vec(&[true, true]),
		];
		let set = SampleSet::from_solutions(&model, solutions);
		assert_eq!(set.len(), 3);
		assert_eq!(set.num_reads(), 5);
		let first = set.first().unwrap();
		assert_eq!(first.sample[&"x"], 0);
		assert_eq!(first.sample[&"y"], 1);
		assert_eq!(first.energy, -1.0);
		assert_eq!(first.num_occurrences, 2);
		// equal energies stay in first-seen order
		assert_eq!(set[1].sample[&"x"], 1);
		assert_eq!(set[1].sample[&"y"], 1);
		assert_eq!(set[2].sample[&"y"], 0);
		assert_eq!(set.lowest().count(), 1);
	}

	#[test]
	fn change_vartype_maps_values() {
		let model = model();
		let set = SampleSet::from_solutions(&model, vec![SingleSolution::from_vec(&[false, true])])
			.change_vartype(Vartype::Spin);
		assert_eq!(set.vartype(), Vartype::Spin);
		assert_eq!(set[0].sample[&"x"], -1);
		assert_eq!(set[0].sample[&"y"], 1);
		assert_eq!(set[0].energy, -1.0);
	}

	#[test]
	fn display_lists_records() {
		let model = model();
		let set = SampleSet::from_solutions(&model, vec![SingleSolution::from_vec(&[false, true])]);
		let text = set.to_string();
		assert!(text.starts_with("{x: 0, y: 1} energy=-1 num_occurrences=1"));
		assert!(text.ends_with("['BINARY', 1 rows, 1 samples]"));
	}
}
