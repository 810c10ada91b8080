//! Decimal numbers with a fixed budget of significant digits.
//!
//! Every arithmetic result is truncated toward zero to [`DECIMAL_PRECISION`]
//! significant digits, so chains of operations reproduce the figures that
//! lending front-ends display for reserve state.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{ Add, Mul, Neg, Sub };
use std::str::FromStr;

use num_traits::{ FromPrimitive, ToPrimitive };

use crate::error::{ LendingResult, ErrorCode };
use crate::math::bn::{ U256, U512 };
use crate::math::constants::DECIMAL_PRECISION;
use crate::validate;

#[cfg(test)]
mod tests;

const PRECISION: i64 = DECIMAL_PRECISION as i64;
// Operands whose leading digit sits further below the other operand's than
// this are collapsed to a single sticky digit before alignment.
const STICKY_GAP: i64 = PRECISION + 2;
// Largest power of ten representable in a U512.
const MAX_POW10: usize = 154;
// 2^60 as a double renders as 1152921504606847000.
const FRACTION_ONE_COEFFICIENT: u64 = 1_152_921_504_606_847;
const FRACTION_ONE_EXPONENT: i64 = 3;
// Parsed exponents beyond this are rejected.
const MAX_EXPONENT: u64 = 9_000_000_000_000_000;

/// `(-1)^negative * coefficient * 10^exponent` with at most
/// [`DECIMAL_PRECISION`] digits in the coefficient and no trailing zeros.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decimal {
	negative: bool,
	coefficient: U256,
	exponent: i64,
}

fn pow10(exponent: i64) -> U512 {
	U512::exp10(exponent as usize)
}

fn digits(value: U512) -> i64 {
	if value.is_zero() {
		return 0;
	}

	// floor(bits * log10(2)) never exceeds the digit count
	let mut count = (value.bits() * 30_102) / 100_000;
	while count < MAX_POW10 && value >= U512::exp10(count) {
		count += 1;
	}
	count as i64
}

fn low_u256(value: U512) -> U256 {
	let mut limbs = [0_u64; 4];
	limbs.copy_from_slice(&value.0[..4]);
	U256(limbs)
}

impl Default for Decimal {
	fn default() -> Self {
		Decimal::ZERO
	}
}

impl Decimal {
	pub const ZERO: Decimal = Decimal { negative: false, coefficient: U256([0, 0, 0, 0]), exponent: 0 };
	pub const ONE: Decimal = Decimal { negative: false, coefficient: U256([1, 0, 0, 0]), exponent: 0 };

	/// Truncates `coefficient` to the precision and strips trailing zeros.
	fn finalize(negative: bool, mut coefficient: U512, mut exponent: i64) -> Decimal {
		if coefficient.is_zero() {
			return Decimal::ZERO;
		}

		let excess = digits(coefficient) - PRECISION;
		if excess > 0 {
			coefficient = coefficient / pow10(excess);
			exponent += excess;
		}

		let ten = U512::from(10_u64);
		while (coefficient % ten).is_zero() {
			coefficient = coefficient / ten;
			exponent += 1;
		}

		Decimal { negative, coefficient: low_u256(coefficient), exponent }
	}

	/// `numerator / denominator * 10^exponent`, truncated. `denominator` must be non-zero.
	fn quotient(negative: bool, numerator: U512, denominator: U512, exponent: i64) -> Decimal {
		if denominator.is_zero() || numerator.is_zero() {
			return Decimal::ZERO;
		}

		let shift = (PRECISION + 1 + digits(denominator) - digits(numerator)).max(0);
		let scaled = numerator * pow10(shift);
		Decimal::finalize(negative, scaled / denominator, exponent - shift)
	}

	/// Converts the raw bits of a 60-bit scaled fraction.
	pub(crate) fn from_fraction_bits(bits: U512) -> Decimal {
		Decimal::quotient(
			false,
			bits,
			U512::from(FRACTION_ONE_COEFFICIENT),
			-FRACTION_ONE_EXPONENT
		)
	}

	pub fn is_zero(&self) -> bool {
		self.coefficient.is_zero()
	}

	pub fn is_negative(&self) -> bool {
		self.negative
	}

	pub fn abs(self) -> Decimal {
		Decimal { negative: false, ..self }
	}

	/// Exact multiplication by `10^exponent`.
	pub fn mul_pow10(self, exponent: i64) -> Decimal {
		if self.is_zero() {
			return self;
		}
		Decimal { exponent: self.exponent + exponent, ..self }
	}

	/// Exponent of the most significant digit.
	fn top(&self) -> i64 {
		self.exponent + digits(self.coefficient.widen()) - 1
	}

	fn cmp_magnitude(&self, other: &Decimal) -> Ordering {
		match (self.is_zero(), other.is_zero()) {
			(true, true) => {
				return Ordering::Equal;
			}
			(true, false) => {
				return Ordering::Less;
			}
			(false, true) => {
				return Ordering::Greater;
			}
			(false, false) => {}
		}

		match self.top().cmp(&other.top()) {
			Ordering::Equal => {
				let exponent = self.exponent.min(other.exponent);
				let lhs = self.coefficient.widen() * pow10(self.exponent - exponent);
				let rhs = other.coefficient.widen() * pow10(other.exponent - exponent);
				lhs.cmp(&rhs)
			}
			ordering => ordering,
		}
	}

	fn sum(self, rhs: Decimal) -> Decimal {
		if self.is_zero() {
			return rhs;
		}
		if rhs.is_zero() {
			return self;
		}

		let (big, small) = if self.top() >= rhs.top() { (self, rhs) } else { (rhs, self) };
		let big_top = big.top();
		let small = if small.top() < big_top - STICKY_GAP {
			Decimal {
				negative: small.negative,
				coefficient: U256::one(),
				exponent: big_top - STICKY_GAP,
			}
		} else {
			small
		};

		let exponent = big.exponent.min(small.exponent);
		let big_coefficient = big.coefficient.widen() * pow10(big.exponent - exponent);
		let small_coefficient = small.coefficient.widen() * pow10(small.exponent - exponent);

		if big.negative == small.negative {
			Decimal::finalize(big.negative, big_coefficient + small_coefficient, exponent)
		} else if big_coefficient >= small_coefficient {
			Decimal::finalize(big.negative, big_coefficient - small_coefficient, exponent)
		} else {
			Decimal::finalize(small.negative, small_coefficient - big_coefficient, exponent)
		}
	}

	pub fn safe_div(self, rhs: Decimal) -> LendingResult<Decimal> {
		validate!(!rhs.is_zero(), ErrorCode::DivisionByZero, "decimal division of {} by zero", self)?;

		Ok(
			Decimal::quotient(
				self.negative != rhs.negative,
				self.coefficient.widen(),
				rhs.coefficient.widen(),
				self.exponent - rhs.exponent
			)
		)
	}

	/// `self^exponent` by repeated squaring, each product truncated.
	pub fn pow(self, mut exponent: u64) -> Decimal {
		let mut base = self;
		let mut result = Decimal::ONE;

		while exponent > 0 {
			if exponent & 1 == 1 {
				result = result * base;
			}
			exponent >>= 1;
			if exponent > 0 {
				base = base * base;
			}
		}

		result
	}

	/// Largest integer not greater than `self`.
	pub fn floor(self) -> Decimal {
		if self.exponent >= 0 || self.is_zero() {
			return self;
		}

		let coefficient = self.coefficient.widen();
		let scale = -self.exponent;
		let integer = if scale >= digits(coefficient) {
			U512::zero()
		} else {
			coefficient / pow10(scale)
		};

		// normalized coefficients never end in zero, so a fractional part is always present
		let integer = if self.negative { integer + U512::one() } else { integer };
		Decimal::finalize(self.negative, integer, 0)
	}

	fn digit_string(&self) -> String {
		self.coefficient.to_string()
	}

	/// Positional notation regardless of magnitude.
	pub fn to_plain_string(&self) -> String {
		if self.is_zero() {
			return "0".to_string();
		}

		let digits = self.digit_string();
		let top = self.top();
		let body = if top < 0 {
			format!("0.{}{}", "0".repeat((-top - 1) as usize), digits)
		} else if (digits.len() as i64) > top + 1 {
			let (integer, fractional) = digits.split_at((top + 1) as usize);
			format!("{}.{}", integer, fractional)
		} else {
			format!("{}{}", digits, "0".repeat((top + 1 - (digits.len() as i64)) as usize))
		};

		if self.negative {
			format!("-{}", body)
		} else {
			body
		}
	}

	fn to_exponential_string(&self) -> String {
		let digits = self.digit_string();
		let (lead, rest) = digits.split_at(1);
		let top = self.top();
		let sign = if self.negative { "-" } else { "" };
		let mantissa = if rest.is_empty() { lead.to_string() } else { format!("{}.{}", lead, rest) };

		if top < 0 {
			format!("{}{}e{}", sign, mantissa, top)
		} else {
			format!("{}{}e+{}", sign, mantissa, top)
		}
	}

	/// Integer part, truncated toward zero, as a magnitude.
	fn trunc_magnitude(&self) -> Option<U512> {
		if self.exponent >= 0 {
			if self.exponent > (MAX_POW10 as i64) - PRECISION {
				return None;
			}
			Some(self.coefficient.widen() * pow10(self.exponent))
		} else if -self.exponent >= digits(self.coefficient.widen()) {
			Some(U512::zero())
		} else {
			Some(self.coefficient.widen() / pow10(-self.exponent))
		}
	}
}

impl Add for Decimal {
	type Output = Decimal;

	fn add(self, rhs: Decimal) -> Decimal {
		self.sum(rhs)
	}
}

impl Sub for Decimal {
	type Output = Decimal;

	fn sub(self, rhs: Decimal) -> Decimal {
		self.sum(-rhs)
	}
}

impl Mul for Decimal {
	type Output = Decimal;

	fn mul(self, rhs: Decimal) -> Decimal {
		Decimal::finalize(
			self.negative != rhs.negative,
			self.coefficient.widen() * rhs.coefficient.widen(),
			self.exponent + rhs.exponent
		)
	}
}

impl Neg for Decimal {
	type Output = Decimal;

	fn neg(self) -> Decimal {
		if self.is_zero() {
			self
		} else {
			Decimal { negative: !self.negative, ..self }
		}
	}
}

impl Ord for Decimal {
	fn cmp(&self, other: &Decimal) -> Ordering {
		match (self.negative, other.negative) {
			(false, true) => Ordering::Greater,
			(true, false) => Ordering::Less,
			(false, false) => self.cmp_magnitude(other),
			(true, true) => other.cmp_magnitude(self),
		}
	}
}

impl PartialOrd for Decimal {
	fn partial_cmp(&self, other: &Decimal) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl From<u128> for Decimal {
	fn from(value: u128) -> Self {
		Decimal::finalize(false, U512::from(value), 0)
	}
}

impl From<u64> for Decimal {
	fn from(value: u64) -> Self {
		Decimal::from(value as u128)
	}
}

impl From<u32> for Decimal {
	fn from(value: u32) -> Self {
		Decimal::from(value as u128)
	}
}

impl From<u16> for Decimal {
	fn from(value: u16) -> Self {
		Decimal::from(value as u128)
	}
}

impl From<u8> for Decimal {
	fn from(value: u8) -> Self {
		Decimal::from(value as u128)
	}
}

impl FromStr for Decimal {
	type Err = ErrorCode;

	/// Accepts `[-+]digits[.digits][e[-+]digits]`; excess digits are truncated.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (negative, unsigned) = match s.as_bytes().first() {
			Some(b'-') => (true, &s[1..]),
			Some(b'+') => (false, &s[1..]),
			_ => (false, s),
		};

		let (mantissa, exponent) = match unsigned.find(|c| c == 'e' || c == 'E') {
			Some(index) => {
				let exponent = unsigned[index + 1..]
					.parse::<i64>()
					.map_err(|_| ErrorCode::InvalidDecimal)?;
				(&unsigned[..index], exponent)
			}
			None => (unsigned, 0),
		};

		let (integer, fractional) = match mantissa.find('.') {
			Some(index) => (&mantissa[..index], &mantissa[index + 1..]),
			None => (mantissa, ""),
		};

		validate!(
			!(integer.is_empty() && fractional.is_empty()),
			ErrorCode::InvalidDecimal,
			"empty decimal literal {}",
			s
		)?;

		let ten = U512::from(10_u64);
		let mut coefficient = U512::zero();
		let mut kept = 0_i64;
		let mut exponent = exponent;

		for (index, byte) in integer.bytes().chain(fractional.bytes()).enumerate() {
			validate!(byte.is_ascii_digit(), ErrorCode::InvalidDecimal, "invalid decimal literal {}", s)?;

			let in_fraction = index >= integer.len();
			if kept <= PRECISION + 1 {
				coefficient = coefficient * ten + U512::from(byte - b'0');
				if !coefficient.is_zero() {
					kept += 1;
				}
				if in_fraction {
					exponent = exponent.checked_sub(1).ok_or(ErrorCode::InvalidDecimal)?;
				}
			} else if !in_fraction {
				exponent = exponent.checked_add(1).ok_or(ErrorCode::InvalidDecimal)?;
			}
		}

		validate!(
			exponent.unsigned_abs() <= MAX_EXPONENT,
			ErrorCode::InvalidDecimal,
			"decimal exponent out of range in {}",
			s
		)?;

		let decimal = Decimal::finalize(false, coefficient, exponent);
		Ok(if negative { -decimal } else { decimal })
	}
}

impl fmt::Display for Decimal {
	/// Positional notation for leading-digit exponents in `[-7, 21)`, scientific otherwise.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_zero() {
			return write!(f, "0");
		}

		let top = self.top();
		if top <= -7 || top >= 21 {
			write!(f, "{}", self.to_exponential_string())
		} else {
			write!(f, "{}", self.to_plain_string())
		}
	}
}

impl ToPrimitive for Decimal {
	fn to_i64(&self) -> Option<i64> {
		let magnitude: i128 = self.trunc_magnitude()?.try_to_u128().ok()?.try_into().ok()?;
		let value = if self.negative { -magnitude } else { magnitude };
		value.try_into().ok()
	}

	fn to_u64(&self) -> Option<u64> {
		if self.negative && !self.trunc_magnitude()?.is_zero() {
			return None;
		}
		self.trunc_magnitude()?.try_to_u128().ok()?.try_into().ok()
	}

	fn to_u128(&self) -> Option<u128> {
		if self.negative && !self.trunc_magnitude()?.is_zero() {
			return None;
		}
		self.trunc_magnitude()?.try_to_u128().ok()
	}

	/// Correctly rounded to the nearest double.
	fn to_f64(&self) -> Option<f64> {
		let sign = if self.negative { "-" } else { "" };
		format!("{}{}e{}", sign, self.coefficient, self.exponent).parse::<f64>().ok()
	}
}

impl FromPrimitive for Decimal {
	fn from_i64(n: i64) -> Option<Self> {
		let magnitude = Decimal::from(n.unsigned_abs());
		Some(if n < 0 { -magnitude } else { magnitude })
	}

	fn from_u64(n: u64) -> Option<Self> {
		Some(Decimal::from(n))
	}

	fn from_u128(n: u128) -> Option<Self> {
		Some(Decimal::from(n))
	}

	/// Uses the shortest digit string that round-trips to `n`.
	fn from_f64(n: f64) -> Option<Self> {
		if !n.is_finite() {
			return None;
		}
		format!("{:e}", n).parse::<Decimal>().ok()
	}
}
