use std::fmt;

use crate::error::{ LendingResult, ErrorCode };
use crate::math::bn::{ U256, U512 };
use crate::math::casting::Cast;
use crate::math::constants::{
	FRACTION_BITS,
	FRACTION_ONE_SCALED,
	ONE_HUNDRED_PCT,
	ONE_HUNDRED_PCT_IN_BPS,
};
use crate::math::decimal::Decimal;
use crate::math::safe_math::SafeMath;


/// Unsigned fixed-point number with 68 integer and 60 fractional bits,
/// stored as its raw scaled representation (`value * 2^60`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fraction(u128);

impl Fraction {
	pub const ZERO: Fraction = Fraction(0);
	pub const ONE: Fraction = Fraction(FRACTION_ONE_SCALED);
	pub const MAX: Fraction = Fraction(u128::MAX);

	pub const fn from_bits(bits: u128) -> Self {
		Fraction(bits)
	}

	pub const fn to_bits(self) -> u128 {
		self.0
	}

	pub const fn from_num(value: u64) -> Self {
		// 64 integer bits always fit in the 68 available
		Fraction((value as u128) * FRACTION_ONE_SCALED)
	}

	pub fn from_bps(bps: u64) -> Self {
		Fraction(((bps as u128) * FRACTION_ONE_SCALED) / (ONE_HUNDRED_PCT_IN_BPS as u128))
	}

	pub fn from_percent(percent: u8) -> Self {
		Fraction(((percent as u128) * FRACTION_ONE_SCALED) / (ONE_HUNDRED_PCT as u128))
	}

	pub fn is_zero(&self) -> bool {
		self.0 == 0
	}

	pub fn to_floor(self) -> LendingResult<u64> {
		(self.0 / FRACTION_ONE_SCALED).cast()
	}

	pub fn to_ceil(self) -> LendingResult<u64> {
		let floor = self.0 / FRACTION_ONE_SCALED;
		let ceil = if self.0 % FRACTION_ONE_SCALED == 0 { floor } else { floor.safe_add(1)? };
		ceil.cast()
	}

	/// Value in basis points, rounded down.
	pub fn to_bps(self) -> LendingResult<u64> {
		U256::from(self.0)
			.safe_mul(U256::from(ONE_HUNDRED_PCT_IN_BPS))?
			.safe_div(U256::from(FRACTION_ONE_SCALED))?
			.try_to_u64()
	}

	pub fn safe_mul_int(self, rhs: u64) -> LendingResult<Self> {
		self.0.safe_mul(rhs as u128).map(Fraction)
	}

	pub fn safe_div_int(self, rhs: u64) -> LendingResult<Self> {
		self.0.safe_div(rhs as u128).map(Fraction)
	}

	/// `self^exponent` by repeated squaring, each product rounded down.
	pub fn pow(self, mut exponent: u64) -> LendingResult<Self> {
		let mut base = self;
		let mut result = Fraction::ONE;

		while exponent > 0 {
			if exponent & 1 == 1 {
				result = result.safe_mul(base)?;
			}
			exponent >>= 1;
			if exponent > 0 {
				base = base.safe_mul(base)?;
			}
		}

		Ok(result)
	}

	pub fn to_decimal(self) -> Decimal {
		Decimal::from_fraction_bits(U256::from(self.0).widen())
	}

	/// Exact decimal expansion, truncated to `precision` fractional digits.
	pub fn to_decimal_string(self, precision: usize) -> String {
		let integer = self.0 / FRACTION_ONE_SCALED;
		let fractional = fractional_digits(self.0 % FRACTION_ONE_SCALED);
		let precision = precision.min(fractional.len());

		if precision == 0 {
			integer.to_string()
		} else {
			format!("{}.{}", integer, &fractional[..precision])
		}
	}

	/// Exact decimal expansion without trailing zeros.
	pub fn to_display(self) -> String {
		let integer = self.0 / FRACTION_ONE_SCALED;
		let fractional = fractional_digits(self.0 % FRACTION_ONE_SCALED);
		let fractional = fractional.trim_end_matches('0');

		if fractional.is_empty() {
			integer.to_string()
		} else {
			format!("{}.{}", integer, fractional)
		}
	}
}

/// The 60 decimal digits of `bits / 2^60` for `bits < 2^60`: `bits * 5^60` is exact.
fn fractional_digits(bits: u128) -> String {
	let five_pow = U256::from(5_u64).pow(U256::from(FRACTION_BITS));
	let digits = U256::from(bits) * five_pow;
	format!("{:0>width$}", digits.to_string(), width = FRACTION_BITS as usize)
}

impl SafeMath for Fraction {
	#[track_caller]
	fn safe_add(self, rhs: Self) -> LendingResult<Self> {
		self.0.safe_add(rhs.0).map(Fraction)
	}

	#[track_caller]
	fn safe_sub(self, rhs: Self) -> LendingResult<Self> {
		self.0.safe_sub(rhs.0).map(Fraction)
	}

	#[track_caller]
	fn safe_mul(self, rhs: Self) -> LendingResult<Self> {
		U256::from(self.0)
			.safe_mul(U256::from(rhs.0))?
			.safe_div(U256::from(FRACTION_ONE_SCALED))?
			.try_to_u128()
			.map(Fraction)
			.map_err(|_| ErrorCode::ArithmeticOverflow)
	}

	#[track_caller]
	fn safe_div(self, rhs: Self) -> LendingResult<Self> {
		if rhs.0 == 0 {
			return Err(ErrorCode::DivisionByZero);
		}

		U256::from(self.0)
			.safe_mul(U256::from(FRACTION_ONE_SCALED))?
			.safe_div(U256::from(rhs.0))?
			.try_to_u128()
			.map(Fraction)
			.map_err(|_| ErrorCode::ArithmeticOverflow)
	}
}

impl From<u64> for Fraction {
	fn from(value: u64) -> Self {
		Fraction::from_num(value)
	}
}

impl fmt::Display for Fraction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_display())
	}
}

/// Fixed-point number with the same 60 fractional bits on 256 bits of storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BigFraction(U256);

impl BigFraction {
	pub const fn from_bits(bits: U256) -> Self {
		BigFraction(bits)
	}

	pub const fn to_bits(self) -> U256 {
		self.0
	}

	pub fn one() -> Self {
		BigFraction::from(Fraction::ONE)
	}

	/// Little-endian 64-bit limbs, the on-chain storage layout.
	pub const fn from_limbs(limbs: [u64; 4]) -> Self {
		BigFraction(U256(limbs))
	}

	pub const fn to_limbs(self) -> [u64; 4] {
		(self.0).0
	}

	pub fn safe_mul(self, rhs: Fraction) -> LendingResult<Self> {
		self.0
			.widen()
			.safe_mul(U512::from(rhs.to_bits()))?
			.safe_div(U512::from(FRACTION_ONE_SCALED))?
			.try_to_u256()
			.map(BigFraction)
			.map_err(|_| ErrorCode::ArithmeticOverflow)
	}

	pub fn to_decimal(self) -> Decimal {
		Decimal::from_fraction_bits(self.0.widen())
	}
}

impl From<Fraction> for BigFraction {
	fn from(value: Fraction) -> Self {
		BigFraction(U256::from(value.to_bits()))
	}
}
