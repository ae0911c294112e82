use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnnealError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnnealError {
	/// Bad read count or schedule configuration.
	#[error("invalid argument: {reason}")]
	InvalidArgument { reason: String },

	/// The cancellation flag was raised before every read finished.
	#[error("annealing was cancelled")]
	Cancelled,
}

impl AnnealError {
	pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
		AnnealError::InvalidArgument {
			reason: reason.into(),
		}
	}
}
