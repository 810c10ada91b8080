//! Big number types

#![allow(clippy::assign_op_pattern)]
#![allow(clippy::ptr_offset_with_cast)]
#![allow(clippy::manual_range_contains)]

use uint::construct_uint;

use crate::error::ErrorCode::BnConversionError;
use crate::error::LendingResult;

construct_uint! {
	/// 256-bit unsigned integer.
	pub struct U256(4);
}

construct_uint! {
	/// 512-bit unsigned integer.
	pub struct U512(8);
}

impl U256 {
	/// Convert u256 to u64
	pub fn to_u64(self) -> Option<u64> {
		self.try_to_u64().map_or_else(|_| None, Some)
	}

	/// Convert u256 to u64
	pub fn try_to_u64(self) -> LendingResult<u64> {
		self.try_into().map_err(|_| BnConversionError)
	}

	/// Convert u256 to u128
	pub fn to_u128(self) -> Option<u128> {
		self.try_to_u128().map_or_else(|_| None, Some)
	}

	/// Convert u256 to u128
	pub fn try_to_u128(self) -> LendingResult<u128> {
		self.try_into().map_err(|_| BnConversionError)
	}

	/// Zero-extend into a u512
	pub fn widen(self) -> U512 {
		let mut limbs = [0_u64; 8];
		limbs[..4].copy_from_slice(&self.0);
		U512(limbs)
	}
}

impl U512 {
	/// Convert u512 to u128
	pub fn try_to_u128(self) -> LendingResult<u128> {
		self.try_into().map_err(|_| BnConversionError)
	}

	/// Convert u512 to u256, failing if any of the upper limbs is set
	pub fn try_to_u256(self) -> LendingResult<U256> {
		if self.0[4..].iter().any(|limb| *limb != 0) {
			return Err(BnConversionError);
		}

		let mut limbs = [0_u64; 4];
		limbs.copy_from_slice(&self.0[..4]);
		Ok(U256(limbs))
	}
}
