use std::fmt::Debug;
use std::hash::Hash;

/// Label of a model variable.
///
/// Anything hashable works: `&str`, `String`, integers, tuples or small
/// user-defined keys.
pub trait Variable: Clone + Eq + Hash + Debug {}

impl<T> Variable for T where T: Clone + Eq + Hash + Debug {}

/// Key of an interaction between `u` and `v` with its endpoints ordered by
/// index, so that `(u, v)` and `(v, u)` address the same coefficient.
#[inline]
pub(crate) fn ordered_pair(u: usize, v: usize) -> (usize, usize) {
	if u < v {
		(u, v)
	} else {
		(v, u)
	}
}

#[test]
fn ordered_pair_test() {
	assert_eq!(ordered_pair(3, 1), (1, 3));
	assert_eq!(ordered_pair(1, 3), (1, 3));
}
