use crate::vartype::Vartype;
use rand::prelude::*;

/// Packed state of every variable of a model, one bit per variable.
///
/// Bits past `len` in the last byte are always zero, so two states with the
/// same variable values compare (and hash) equal.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BinaryRepr {
	state: Vec<u8>,
	len: usize,
}

const BYTESIZE: usize = 8;

impl BinaryRepr {
	/// All-false state of `len` variables.
	pub fn with_len(len: usize) -> Self {
		let size = (len + BYTESIZE - 1) / BYTESIZE;
		Self {
			state: vec![0; size],
			len,
		}
	}

	/// Uniformly random state of `len` variables.
	#[inline]
	pub fn new_random<T: Rng>(len: usize, r: &mut T) -> Self {
		let mut ret = Self::with_len(len);
		r.fill_bytes(&mut ret.state);
		ret.clear_padding();
		ret
	}

	pub fn from_vec(v: &[bool]) -> Self {
		let mut ret = Self::with_len(v.len());
		for (i, b) in v.iter().enumerate() {
			ret.set(i, *b);
		}
		ret
	}

	/// Build a state from domain values. Returns `None` if a value is not in
	/// the domain of `vartype`.
	pub fn from_values(vartype: Vartype, values: &[i8]) -> Option<Self> {
		let mut ret = Self::with_len(values.len());
		for (i, v) in values.iter().enumerate() {
			ret.set(i, vartype.from_value(*v)?);
		}
		Some(ret)
	}

	pub fn to_vec(&self) -> Vec<bool> {
		self.iter().collect()
	}

	/// Domain values of the state under `vartype`.
	pub fn to_values(&self, vartype: Vartype) -> Vec<i8> {
		self.iter().map(|b| vartype.get_value(b)).collect()
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	#[inline]
	pub fn get(&self, loc: usize) -> bool {
		assert!(loc < self.len, "index {} out of {} variables", loc, self.len);
		unsafe { self.get_unchecked(loc) }
	}

	#[inline]
	pub fn set(&mut self, loc: usize, val: bool) {
		assert!(loc < self.len, "index {} out of {} variables", loc, self.len);
		unsafe { self.set_unchecked(loc, val) }
	}

	/// Byte index and bit mask of variable `loc`.
	#[inline]
	fn locate(loc: usize) -> (usize, u8) {
		(loc / BYTESIZE, 1 << (loc % BYTESIZE))
	}

	/// # Safety
	/// `loc < self.len()`
	#[inline]
	pub unsafe fn get_unchecked(&self, loc: usize) -> bool {
		let (byte, mask) = Self::locate(loc);
		self.state.get_unchecked(byte) & mask != 0
	}

	/// # Safety
	/// `loc < self.len()`
	#[inline]
	pub unsafe fn set_unchecked(&mut self, loc: usize, val: bool) {
		let (byte, mask) = Self::locate(loc);
		let b = self.state.get_unchecked_mut(byte);
		*b = if val { *b | mask } else { *b & !mask };
	}

	#[inline]
	pub fn flip(&mut self, loc: usize) {
		assert!(loc < self.len, "index {} out of {} variables", loc, self.len);
		unsafe { self.flip_unchecked(loc) }
	}

	/// # Safety
	/// `loc < self.len()`
	#[inline]
	pub unsafe fn flip_unchecked(&mut self, loc: usize) {
		let (byte, mask) = Self::locate(loc);
		*self.state.get_unchecked_mut(byte) ^= mask;
	}

	pub fn iter(&self) -> BinaryReprIter<'_> {
		BinaryReprIter { repr: self, pos: 0 }
	}

	fn clear_padding(&mut self) {
		let used = self.len % BYTESIZE;
		if used != 0 {
			if let Some(last) = self.state.last_mut() {
				*last &= (1u8 << used) - 1;
			}
		}
	}
}

pub struct BinaryReprIter<'a> {
	repr: &'a BinaryRepr,
	pos: usize,
}

impl<'a> Iterator for BinaryReprIter<'a> {
	type Item = bool;
	fn next(&mut self) -> Option<bool> {
		if self.pos >= self.repr.len {
			return None;
		}
		let b = unsafe { self.repr.get_unchecked(self.pos) };
		self.pos += 1;
		Some(b)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let rest = self.repr.len - self.pos;
		(rest, Some(rest))
	}
}

impl<'a> ExactSizeIterator for BinaryReprIter<'a> {}

impl std::ops::Index<usize> for BinaryRepr {
	type Output = bool;
	fn index(&self, loc: usize) -> &bool {
		if self.get(loc) {
			&crate::TRUE_VAL
		} else {
			&crate::FALSE_VAL
		}
	}
}

impl std::fmt::Debug for BinaryRepr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for b in self.iter() {
			f.write_str(if b { "1" } else { "0" })?;
		}
		Ok(())
	}
}
