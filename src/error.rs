use annealers::ModelError;
use classical_solver::AnnealError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProblemError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProblemError {
	#[error(transparent)]
	Model(#[from] ModelError),

	#[error(transparent)]
	Anneal(#[from] AnnealError),

	/// No penalty model is known for a constraint.
	#[error("unsupported constraint: {reason}")]
	Unsupported { reason: String },

	/// Malformed problem data, e.g. a non-square distance matrix.
	#[error("invalid input: {reason}")]
	InvalidInput { reason: String },
}

impl ProblemError {
	pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
		ProblemError::Unsupported {
			reason: reason.into(),
		}
	}

	pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
		ProblemError::InvalidInput {
			reason: reason.into(),
		}
	}
}
