use std::fmt::Display;

/// Domain of the variables of a model.
///
/// A variable state is stored as a single bit everywhere in this crate; the
/// vartype decides which number that bit stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vartype {
	/// Variables take values in {0, 1}.
	Binary,
	/// Variables take values in {-1, +1}.
	Spin,
}

impl Vartype {
	#[inline]
	pub fn get_value(self, b: bool) -> i8 {
		match (self, b) {
			(_, true) => 1,
			(Vartype::Binary, false) => 0,
			(Vartype::Spin, false) => -1,
		}
	}

	/// Inverse of [`Vartype::get_value()`]. Returns `None` for values outside
	/// the domain.
	#[inline]
	pub fn from_value(self, value: i8) -> Option<bool> {
		match (self, value) {
			(_, 1) => Some(true),
			(Vartype::Binary, 0) | (Vartype::Spin, -1) => Some(false),
			_ => None,
		}
	}

	/// `get_value(true) - get_value(false)`
	#[inline]
	pub fn width(self) -> f64 {
		match self {
			Vartype::Binary => 1.0,
			Vartype::Spin => 2.0,
		}
	}

	#[inline]
	pub fn values(self) -> [i8; 2] {
		[self.get_value(false), self.get_value(true)]
	}
}

impl Display for Vartype {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Vartype::Binary => f.write_str("BINARY"),
			Vartype::Spin => f.write_str("SPIN"),
		}
	}
}

#[test]
fn vartype_values_test() {
	assert_eq!(Vartype::Binary.values(), [0, 1]);
	assert_eq!(Vartype::Spin.values(), [-1, 1]);
	assert_eq!(Vartype::Spin.from_value(-1), Some(false));
	assert_eq!(Vartype::Binary.from_value(-1), None);
	assert_eq!(Vartype::Binary.from_value(2), None);
	for vt in [Vartype::Binary, Vartype::Spin].iter() {
		for b in [false, true].iter() {
			assert_eq!(vt.from_value(vt.get_value(*b)), Some(*b));
		}
		let [lo, hi] = vt.values();
		assert_eq!(f64::from(hi - lo), vt.width());
	}
}
