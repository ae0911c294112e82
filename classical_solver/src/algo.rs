use annealers::repr::BinaryRepr;
use annealers::vartype::Vartype;
use rand::prelude::*;

/// Dense form of a model used inside the sweep loop.
#[derive(Clone, Debug)]
pub struct Couplings {
	pub vartype: Vartype,
	pub h: Vec<f64>,
	pub neighbors: Vec<Vec<(usize, f64)>>,
}

impl Couplings {
	#[inline]
	pub fn len(&self) -> usize {
		self.h.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.h.is_empty()
	}

	/// `field[i] = h_i + sum_j J_ij x_j`, so flipping `x_i` to `x_i'` changes
	/// the energy by `(x_i' - x_i) * field[i]`.
	fn local_fields(&self, state: &BinaryRepr) -> Vec<f64> {
		let vartype = self.vartype;
		self.neighbors
			.iter()
			.zip(self.h.iter())
			.map(|(ngs, h)| {
				ngs.iter().fold(*h, |f, (j, w)| {
					f + w * f64::from(vartype.get_value(unsafe { state.get_unchecked(*j) }))
				})
			})
			.collect()
	}
}

// exp(-44.36142) is below the resolution of gen_range(0.0, 1.0), so such
// moves can never be accepted.
const ACCEPTANCE_LIMIT: f64 = 44.36142;

/// Run Metropolis sweeps over `state`, `sweeps_per_beta` times for each beta
/// in `beta_schedule`. Every sweep visits the variables in index order.
pub fn simulated_annealing<T: Rng>(
	random: &mut T,
	state: &mut BinaryRepr,
	beta_schedule: &[f64],
	sweeps_per_beta: usize,
	couplings: &Couplings,
) {
	assert_eq!(state.len(), couplings.len());
	let d = couplings.vartype.width();
	let mut fields = couplings.local_fields(state);
	for beta in beta_schedule.iter() {
		let threshold = ACCEPTANCE_LIMIT / beta;
		for _ in 0..sweeps_per_beta {
			for i in 0..state.len() {
				let stat = unsafe { state.get_unchecked(i) };
				// x_i' - x_i
				let step = if stat { -d } else { d };
				let ed = step * fields[i];
				if ed > threshold {
					continue;
				}
				if ed <= 0.0 || f64::exp(-ed * beta) > random.gen_range(0.0, 1.0) {
					// accept
					unsafe {
						state.flip_unchecked(i);
					}
					for (j, weight) in unsafe { couplings.neighbors.get_unchecked(i) }.iter() {
						fields[*j] += weight * step;
					}
				}
			}
		}
	}
}
