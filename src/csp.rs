//! Small constraint satisfaction problems and their penalty models.
//!
//! A [`Constraint`] lists the configurations its variables may take. Turning
//! a [`ConstraintSatisfactionProblem`] into a model ("stitching") replaces
//! every constraint by a quadratic penalty that is `0` on the feasible
//! configurations and at least `gap` on every other one, so the ground
//! states of the stitched model are exactly the solutions of the problem.
//!
//! The AND gate `c = a && b` is also available through
//! [`ConstraintEncoder`], implemented by a hand-written penalty
//! ([`ManualPenalty`]) and by stitching ([`Stitched`]).
use crate::error::{ProblemError, Result};
use crate::value_of;
use annealers::model::{Assignment, BinaryQuadraticModel};
use annealers::variable::Variable;
use annealers::vartype::Vartype;
use indexmap::IndexSet;
use std::collections::BTreeSet;

/// Largest arity accepted by [`Constraint::from_fn()`].
pub const MAX_ENUMERATED_ARITY: usize = 16;

#[derive(Clone, Debug, PartialEq)]
pub struct Constraint<V: Variable> {
	pub label: Option<String>,
	vartype: Vartype,
	variables: Vec<V>,
	configurations: BTreeSet<Vec<i8>>,
}

impl<V: Variable> Constraint<V> {
	/// Constraint satisfied exactly by `configurations`. Each configuration
	/// gives one value per variable, in the order of `variables`.
	pub fn from_configurations<I>(
		variables: Vec<V>,
		vartype: Vartype,
		configurations: I,
	) -> Result<Self>
	where
		I: IntoIterator<Item = Vec<i8>>,
	{
		if variables.is_empty() {
			return Err(ProblemError::invalid_input("constraint has no variables"));
		}
		if variables.iter().collect::<IndexSet<_>>().len() != variables.len() {
			return Err(ProblemError::invalid_input(format!(
				"constraint variables {:?} are not distinct",
				variables
			)));
		}
		let mut set = BTreeSet::new();
		for config in configurations {
			if config.len() != variables.len() {
				return Err(ProblemError::invalid_input(format!(
					"configuration {:?} does not match {} variables",
					config,
					variables.len()
				)));
			}
			if config.iter().any(|x| vartype.from_value(*x).is_none()) {
				return Err(ProblemError::invalid_input(format!(
					"configuration {:?} is outside of the {} domain",
					config, vartype
				)));
			}
			set.insert(config);
		}
		Ok(Self {
			label: None,
			vartype,
			variables,
			configurations: set,
		})
	}

	/// Constraint satisfied by the configurations for which `f` holds.
	pub fn from_fn<F>(variables: Vec<V>, vartype: Vartype, f: F) -> Result<Self>
	where
		F: Fn(&[i8]) -> bool,
	{
		let arity = variables.len();
		if arity > MAX_ENUMERATED_ARITY {
			return Err(ProblemError::invalid_input(format!(
				"cannot enumerate a constraint on {} variables",
				arity
			)));
		}
		let configurations = (0..1usize << arity)
			.map(|mask| config_of(vartype, arity, mask))
			.filter(|config| f(config))
			.collect::<Vec<_>>();
		Self::from_configurations(variables, vartype, configurations)
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	#[inline]
	pub fn vartype(&self) -> Vartype {
		self.vartype
	}

	#[inline]
	pub fn variables(&self) -> &[V] {
		&self.variables
	}

	#[inline]
	pub fn arity(&self) -> usize {
		self.variables.len()
	}

	pub fn configurations(&self) -> impl Iterator<Item = &[i8]> + '_ {
		self.configurations.iter().map(|c| c.as_slice())
	}

	/// Whether the values of the constraint's variables, in order, form a
	/// feasible configuration.
	pub fn is_satisfied_by(&self, values: &[i8]) -> bool {
		self.configurations.contains(values)
	}

	pub fn check<A: Assignment<V>>(&self, sample: &A) -> Result<bool> {
		let values = self
			.variables
			.iter()
			.map(|v| value_of(sample, v))
			.collect::<Result<Vec<_>>>()?;
		Ok(self.is_satisfied_by(&values))
	}

	/// Feasibility of every configuration, indexed by the bit mask whose bit
	/// `i` is set when variable `i` takes its upper value.
	fn feasibility_table(&self) -> Vec<bool> {
		let arity = self.arity();
		(0..1usize << arity)
			.map(|mask| self.is_satisfied_by(&config_of(self.vartype, arity, mask)))
			.collect()
	}

	fn name(&self) -> String {
		match &self.label {
			Some(label) => format!("{:?}", label),
			None => format!("{:?}", self.variables),
		}
	}
}

fn config_of(vartype: Vartype, arity: usize, mask: usize) -> Vec<i8> {
	(0..arity)
		.map(|i| vartype.get_value((mask >> i) & 1 == 1))
		.collect()
}

#[derive(Clone, Debug)]
pub struct ConstraintSatisfactionProblem<V: Variable> {
	vartype: Vartype,
	variables: IndexSet<V>,
	constraints: Vec<Constraint<V>>,
}

impl<V: Variable> ConstraintSatisfactionProblem<V> {
	pub fn new(vartype: Vartype) -> Self {
		Self {
			vartype,
			variables: IndexSet::new(),
			constraints: Vec::new(),
		}
	}

	#[inline]
	pub fn vartype(&self) -> Vartype {
		self.vartype
	}

	/// Adds a variable that may appear in no constraint.
	pub fn add_variable(&mut self, v: V) {
		self.variables.insert(v);
	}

	pub fn add_constraint(&mut self, constraint: Constraint<V>) -> Result<()> {
		if constraint.vartype != self.vartype {
			return Err(ProblemError::invalid_input(format!(
				"constraint {} is {} but the problem is {}",
				constraint.name(),
				constraint.vartype,
				self.vartype
			)));
		}
		self.variables.extend(constraint.variables.iter().cloned());
		self.constraints.push(constraint);
		Ok(())
	}

	pub fn variables(&self) -> impl Iterator<Item = &V> + '_ {
		self.variables.iter()
	}

	pub fn constraints(&self) -> &[Constraint<V>] {
		&self.constraints
	}

	/// Whether `sample` satisfies every constraint.
	pub fn check<A: Assignment<V>>(&self, sample: &A) -> Result<bool> {
		Ok(self.unsatisfied(sample)?.is_empty())
	}

	/// Constraints violated by `sample`.
	pub fn unsatisfied<A: Assignment<V>>(&self, sample: &A) -> Result<Vec<&Constraint<V>>> {
		let mut ret = Vec::new();
		for c in self.constraints.iter() {
			if !c.check(sample)? {
				ret.push(c);
			}
		}
		Ok(ret)
	}

	/// Penalty model of the whole problem.
	///
	/// Feasible assignments have energy `0` and every other assignment has
	/// energy at least `gap`. Constraints on one or two variables are always
	/// representable. Constraints on three variables are matched against
	/// the AND and OR gadgets under any permutation and negation of their
	/// variables; anything else fails with [`ProblemError::Unsupported`].
	pub fn stitch(&self, gap: f64) -> Result<BinaryQuadraticModel<V>> {
		if !gap.is_finite() || gap <= 0.0 {
			return Err(ProblemError::invalid_input(format!(
				"gap must be finite and positive, got {}",
				gap
			)));
		}
		let mut bqm = BinaryQuadraticModel::new(Vartype::Binary);
		for v in self.variables.iter() {
			bqm.add_variable(v.clone(), 0.0);
		}
		for c in self.constraints.iter() {
			let table = penalty_table(c, gap)?;
			add_interpolated(&mut bqm, c.variables(), &table)?;
		}
		log::debug!(
			"stitched {} constraints into {} variables and {} interactions",
			self.constraints.len(),
			bqm.num_variables(),
			bqm.num_interactions()
		);
		Ok(bqm.change_vartype(self.vartype))
	}
}

/// Penalty of every configuration of `c`, indexed like
/// [`Constraint::feasibility_table()`]. The table is always a quadratic
/// function of the bits.
fn penalty_table<V: Variable>(c: &Constraint<V>, gap: f64) -> Result<Vec<f64>> {
	if c.configurations.is_empty() {
		return Err(ProblemError::unsupported(format!(
			"constraint {} has no feasible configuration",
			c.name()
		)));
	}
	// checked before the table so that wide constraints are never enumerated
	if c.arity() > 3 {
		return Err(ProblemError::unsupported(format!(
			"constraint {} has {} variables, at most 3 are supported",
			c.name(),
			c.arity()
		)));
	}
	let feasible = c.feasibility_table();
	if feasible.iter().all(|f| *f) {
		return Ok(vec![0.0; feasible.len()]);
	}
	if c.arity() == 3 {
		return match_gadget(&feasible)
			.map(|table| table.into_iter().map(|p| p * gap).collect())
			.ok_or_else(|| {
				ProblemError::unsupported(format!(
					"no quadratic penalty for constraint {}",
					c.name()
				))
			});
	}
	Ok(feasible
		.iter()
		.map(|f| if *f { 0.0 } else { gap })
		.collect())
}

// `x[2] == x[0] && x[1]`
fn and_gadget(x: [f64; 3]) -> f64 {
	x[0] * x[1] - 2.0 * x[0] * x[2] - 2.0 * x[1] * x[2] + 3.0 * x[2]
}

// `x[2] == x[0] || x[1]`
fn or_gadget(x: [f64; 3]) -> f64 {
	x[0] * x[1] + x[0] + x[1] + x[2] - 2.0 * x[0] * x[2] - 2.0 * x[1] * x[2]
}

const GADGETS: [fn([f64; 3]) -> f64; 2] = [and_gadget, or_gadget];

const PERMUTATIONS: [[usize; 3]; 6] = [
	[0, 1, 2],
	[0, 2, 1],
	[1, 0, 2],
	[1, 2, 0],
	[2, 0, 1],
	[2, 1, 0],
];

/// Finds a gadget, a permutation and a negation of the variables whose
/// penalty is `0` exactly on the feasible configurations and at least `1`
/// elsewhere. Returns the penalty table.
fn match_gadget(feasible: &[bool]) -> Option<Vec<f64>> {
	for gadget in GADGETS.iter() {
		for perm in PERMUTATIONS.iter() {
			for neg in 0..8usize {
				let table = (0..8usize)
					.map(|mask| {
						let mut x = [0.0; 3];
						for (p, xp) in x.iter_mut().enumerate() {
							let bit = ((mask >> perm[p]) ^ (neg >> p)) & 1;
							*xp = bit as f64;
						}
						gadget(x)
					})
					.collect::<Vec<_>>();
				let fits = table
					.iter()
					.zip(feasible.iter())
					.all(|(p, f)| if *f { *p == 0.0 } else { *p >= 1.0 });
				if fits {
					return Some(table);
				}
			}
		}
	}
	None
}

/// Adds the quadratic function given by its values on every configuration of
/// `variables` (at most three) to `bqm`.
fn add_interpolated<V: Variable>(
	bqm: &mut BinaryQuadraticModel<V>,
	variables: &[V],
	table: &[f64],
) -> Result<()> {
	let c = table[0];
	bqm.add_offset(c);
	for (i, v) in variables.iter().enumerate() {
		bqm.add_variable(v.clone(), table[1 << i] - c);
	}
	for i in 0..variables.len() {
		for j in i + 1..variables.len() {
			let q = table[(1 << i) | (1 << j)] - table[1 << i] - table[1 << j] + c;
			if q != 0.0 {
				bqm.add_interaction(variables[i].clone(), variables[j].clone(), q)?;
			}
		}
	}
	Ok(())
}

/// Ways to turn the AND gate `c = a && b` over BINARY variables into a model.
pub trait ConstraintEncoder {
	fn encode_and<V: Variable>(&self, a: V, b: V, c: V) -> Result<BinaryQuadraticModel<V>>;
}

/// Hand-written AND penalty
/// `(P + 1) ab + (P - 1) c - ac - bc`.
///
/// Known limitation: this does not exactly forbid the invalid states. The
/// feasible states with `c = 0` have energy `0`, but the feasible state
/// `a = b = c = 1` costs `2P - 2` while the infeasible `a = b = 0, c = 1` only
/// costs `P - 1`. Minimizing therefore never yields `c = 1`. Use [`Stitched`]
/// for an exact encoding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ManualPenalty {
	pub penalty: f64,
}

impl Default for ManualPenalty {
	fn default() -> Self {
		Self { penalty: 10.0 }
	}
}

impl ConstraintEncoder for ManualPenalty {
	fn encode_and<V: Variable>(&self, a: V, b: V, c: V) -> Result<BinaryQuadraticModel<V>> {
		let p = self.penalty;
		let mut bqm = BinaryQuadraticModel::new(Vartype::Binary);
		for v in [&a, &b, &c].iter() {
			bqm.add_variable((*v).clone(), 0.0);
		}
		// (a b - c)^2 with the cubic term dropped
		bqm.add_interaction(a.clone(), b.clone(), p)?;
		bqm.add_variable(c.clone(), p);
		bqm.add_interaction(a.clone(), b.clone(), 1.0)?;
		bqm.add_variable(c.clone(), -1.0);
		bqm.add_interaction(a, c.clone(), -1.0)?;
		bqm.add_interaction(b, c, -1.0)?;
		Ok(bqm)
	}
}

/// AND gate stitched from its truth table. Feasible states have energy `0`
/// and infeasible ones at least `gap`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stitched {
	pub gap: f64,
}

impl Default for Stitched {
	fn default() -> Self {
		Self { gap: 2.0 }
	}
}

impl ConstraintEncoder for Stitched {
	fn encode_and<V: Variable>(&self, a: V, b: V, c: V) -> Result<BinaryQuadraticModel<V>> {
		let mut csp = ConstraintSatisfactionProblem::new(Vartype::Binary);
		let and = Constraint::from_fn(vec![a, b, c], Vartype::Binary, |x| x[0] * x[1] == x[2])?;
		csp.add_constraint(and.with_label("and"))?;
		csp.stitch(self.gap)
	}
}
