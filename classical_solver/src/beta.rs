//! The representation of *beta schedule* of the annealer.
//!
//! Generally, beta schedule is array of `f64`, but efficient beta schedule is
//! generated from *beta range* and the number of sweeps. So you can specify
//! them in place of beta schedule.
use crate::error::{AnnealError, Result};
use annealers::model::BinaryQuadraticModel;
use annealers::variable::Variable;

#[derive(Clone, Debug, PartialEq)]
pub enum BetaType {
	/// Derive *beta range* from the coefficients of the model.
	Auto,
	/// Specify *beta range* as `(beta_start, beta_end)`.
	Range(f64, f64),
	/// Specify *beta schedule* manually. This values should take larger
	/// as the index increases.
	Schedule(Vec<f64>),
}

impl Default for BetaType {
	fn default() -> Self {
		BetaType::Auto
	}
}

/// How the betas between `beta_start` and `beta_end` are placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
	Geometric,
	Linear,
}

impl Default for Interpolation {
	fn default() -> Self {
		Interpolation::Geometric
	}
}

impl BetaType {
	pub(crate) fn validate(&self, interpolation: Interpolation) -> Result<()> {
		match self {
			BetaType::Auto => Ok(()),
			BetaType::Range(start, end) => {
				if !start.is_finite() || !end.is_finite() {
					return Err(AnnealError::invalid_argument(format!(
						"beta range ({}, {}) must be finite",
						start, end
					)));
				}
				if *start < 0.0 || start > end {
					return Err(AnnealError::invalid_argument(format!(
						"beta range ({}, {}) must satisfy 0 <= beta_start <= beta_end",
						start, end
					)));
				}
				if interpolation == Interpolation::Geometric && *start == 0.0 {
					return Err(AnnealError::invalid_argument(
						"geometric beta schedule needs a positive beta_start",
					));
				}
				Ok(())
			}
			BetaType::Schedule(v) => {
				if v.is_empty() {
					return Err(AnnealError::invalid_argument("beta schedule is empty"));
				}
				if v.iter().any(|b| !b.is_finite() || *b < 0.0) {
					return Err(AnnealError::invalid_argument(
						"beta schedule must hold finite non-negative values",
					));
				}
				Ok(())
			}
		}
	}
}

/// Default *beta range* of `model`.
///
/// The hot end accepts the largest possible single-flip energy increase with
/// probability 1/2 and the cold end accepts the smallest one with probability
/// 1/100. Returns `None` if the model has no nonzero coefficient.
pub fn default_beta_range<V: Variable>(model: &BinaryQuadraticModel<V>) -> Option<(f64, f64)> {
	let width = model.vartype().width();
	let linear = model.linear_biases();
	let max_field = (0..model.num_variables())
		.map(|i| {
			linear[i].abs()
				+ model
					.neighborhood(i)
					.map(|(_, b)| b.abs())
					.sum::<f64>()
		})
		.fold(0.0, f64::max);
	let min_bias = linear
		.iter()
		.copied()
		.chain(model.iter_quadratic().map(|(_, _, b)| b))
		.map(f64::abs)
		.filter(|b| *b > 0.0)
		.fold(f64::INFINITY, f64::min);
	if max_field > 0.0 && min_bias.is_finite() {
		Some((
			f64::ln(2.0) / (width * max_field),
			f64::ln(100.0) / (width * min_bias),
		))
	} else {
		None
	}
}

pub(crate) const FALLBACK_BETA_RANGE: (f64, f64) = (0.1, 1.0);

/// Generate *beta schedule* of `count` betas for `model`.
pub(crate) fn generate_schedule<V: Variable>(
	beta_type: &BetaType,
	interpolation: Interpolation,
	count: usize,
	model: &BinaryQuadraticModel<V>,
) -> Vec<f64> {
	match beta_type {
		BetaType::Schedule(v) => v.clone(),
		BetaType::Auto | BetaType::Range(_, _) => {
			let (min, max) = if let BetaType::Range(min, max) = beta_type {
				(*min, *max)
			} else {
				default_beta_range(model).unwrap_or_else(|| {
					log::warn!(
						"model has no nonzero coefficient, using beta range {:?}",
						FALLBACK_BETA_RANGE
					);
					FALLBACK_BETA_RANGE
				})
			};
			match interpolation {
				Interpolation::Geometric => generate_geometric_schedule(min, max, count),
				Interpolation::Linear => generate_linear_schedule(min, max, count),
			}
		}
	}
}

fn generate_geometric_schedule(beta_min: f64, beta_max: f64, count: usize) -> Vec<f64> {
	if count == 1 {
		return vec![beta_max];
	}
	let r = f64::ln(beta_max / beta_min) / (count as f64 - 1.0);
	(0..count)
		.map(|index| beta_min * f64::exp(index as f64 * r))
		.collect()
}

fn generate_linear_schedule(beta_min: f64, beta_max: f64, count: usize) -> Vec<f64> {
	if count == 1 {
		return vec![beta_max];
	}
	let step = (beta_max - beta_min) / (count as f64 - 1.0);
	(0..count)
		.map(|index| beta_min + index as f64 * step)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use annealers::vartype::Vartype;

	#[test]
	fn geometric_schedule_hits_both_ends() {
		let s = generate_geometric_schedule(0.1, 10.0, 5);
		assert_eq!(s.len(), 5);
		assert!((s[0] - 0.1).abs() < 1e-12);
		assert!((s[2] - 1.0).abs() < 1e-12);
		assert!((s[4] - 10.0).abs() < 1e-9);
		assert!(s.windows(2).all(|w| w[0] < w[1]));
	}

	#[test]
	fn linear_schedule_hits_both_ends() {
		let s = generate_linear_schedule(0.0, 2.0, 5);
		assert_eq!(s, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
		assert_eq!(generate_linear_schedule(0.0, 2.0, 1), vec![2.0]);
	}

	#[test]
	fn default_range_from_coefficients() {
		let bqm = BinaryQuadraticModel::from_qubo(vec![
			(("x", "x"), 1.0),
			(("y", "y"), -1.0),
			(("x", "y"), 2.0),
		]);
		let (hot, cold) = default_beta_range(&bqm).unwrap();
		assert!((hot - f64::ln(2.0) / 3.0).abs() < 1e-12);
		assert!((cold - f64::ln(100.0)).abs() < 1e-12);

		let spin = bqm.to_vartype(Vartype::Spin);
		let (hot, cold) = default_beta_range(&spin).unwrap();
		assert!(hot > 0.0 && hot < cold);
	}

	#[test]
	fn default_range_of_constant_model() {
		let mut bqm = BinaryQuadraticModel::new(Vartype::Binary);
		bqm.add_variable("x", 0.0);
		bqm.add_offset(3.0);
		assert_eq!(default_beta_range(&bqm), None);
		let s = generate_schedule(&BetaType::Auto, Interpolation::Geometric, 3, &bqm);
		assert_eq!(s.len(), 3);
		assert!((s[0] - FALLBACK_BETA_RANGE.0).abs() < 1e-12);
	}

	#[test]
	fn validation() {
		let g = Interpolation::Geometric;
		assert!(BetaType::Auto.validate(g).is_ok());
		assert!(BetaType::Range(0.1, 4.0).validate(g).is_ok());
		assert!(BetaType::Range(4.0, 0.1).validate(g).is_err());
		assert!(BetaType::Range(0.0, 1.0).validate(g).is_err());
		assert!(BetaType::Range(0.0, 1.0).validate(Interpolation::Linear).is_ok());
		assert!(BetaType::Range(f64::NAN, 1.0).validate(g).is_err());
		assert!(BetaType::Schedule(vec![]).validate(g).is_err());
		assert!(BetaType::Schedule(vec![0.5, -1.0]).validate(g).is_err());
	}
}
