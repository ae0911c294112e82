use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while building or evaluating a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
	/// The model description itself is malformed, e.g. a variable interacting
	/// with itself.
	#[error("invalid model: {reason}")]
	InvalidModel { reason: String },

	/// An assignment does not cover every variable of the model.
	#[error("incomplete assignment: missing {missing:?}")]
	IncompleteAssignment { missing: Vec<String> },

	#[error("invalid argument: {reason}")]
	InvalidArgument { reason: String },
}

impl ModelError {
	pub(crate) fn invalid_model(reason: impl Into<String>) -> Self {
		ModelError::InvalidModel {
			reason: reason.into(),
		}
	}

	pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
		ModelError::InvalidArgument {
			reason: reason.into(),
		}
	}
}
