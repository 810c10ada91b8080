use crate::error::{ LendingResult, ErrorCode };
use crate::math::bn::{ U256, U512 };
use solana_program::msg;
use std::panic::Location;

pub trait SafeMath: Sized {
	fn safe_add(self, rhs: Self) -> LendingResult<Self>;
	fn safe_sub(self, rhs: Self) -> LendingResult<Self>;
	fn safe_mul(self, rhs: Self) -> LendingResult<Self>;
	fn safe_div(self, rhs: Self) -> LendingResult<Self>;
}

#[track_caller]
fn math_error(error_code: ErrorCode) -> ErrorCode {
	let caller = Location::caller();
	msg!("Math error {} thrown at {}:{}", error_code, caller.file(), caller.line());
	error_code
}

macro_rules! checked_impl {
	($t:ty, $zero:expr) => {
        impl SafeMath for $t {
            #[track_caller]
            #[inline(always)]
            fn safe_add(self, v: $t) -> LendingResult<$t> {
                match self.checked_add(v) {
                    Some(result) => Ok(result),
                    None => Err(math_error(ErrorCode::ArithmeticOverflow)),
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_sub(self, v: $t) -> LendingResult<$t> {
                match self.checked_sub(v) {
                    Some(result) => Ok(result),
                    None => Err(math_error(ErrorCode::Underflow)),
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_mul(self, v: $t) -> LendingResult<$t> {
                match self.checked_mul(v) {
                    Some(result) => Ok(result),
                    None => Err(math_error(ErrorCode::ArithmeticOverflow)),
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_div(self, v: $t) -> LendingResult<$t> {
                if v == $zero {
                    return Err(math_error(ErrorCode::DivisionByZero));
                }

                match self.checked_div(v) {
                    Some(result) => Ok(result),
                    None => Err(math_error(ErrorCode::ArithmeticOverflow)),
                }
            }
        }
	};
}

checked_impl!(U512, U512::zero());
checked_impl!(U256, U256::zero());
checked_impl!(u128, 0);
checked_impl!(u64, 0);
checked_impl!(u32, 0);
checked_impl!(u16, 0);
checked_impl!(u8, 0);
checked_impl!(i128, 0);
checked_impl!(i64, 0);

#[cfg(test)]
mod test {
	use crate::error::ErrorCode;
	use crate::math::bn::U256;
	use crate::math::safe_math::SafeMath;

	#[test]
	fn safe_add() {
		assert_eq!((1_u128).safe_add(1).unwrap(), 2);
		assert_eq!((1_u128).safe_add(u128::MAX), Err(ErrorCode::ArithmeticOverflow));
	}

	#[test]
	fn safe_sub() {
		assert_eq!((1_u64).safe_sub(1).unwrap(), 0);
		assert_eq!((0_u64).safe_sub(1), Err(ErrorCode::Underflow));
		assert_eq!((0_i64).safe_sub(1).unwrap(), -1);
	}

	#[test]
	fn safe_mul() {
		assert_eq!((8_u128).safe_mul(80).unwrap(), 640);
		assert_eq!((2_u128).safe_mul(u128::MAX), Err(ErrorCode::ArithmeticOverflow));
		assert_eq!(
			U256::from(u128::MAX).safe_mul(U256::from(2_u64)).unwrap(),
			U256::from(u128::MAX) + U256::from(u128::MAX)
		);
	}

	#[test]
	fn safe_div() {
		assert_eq!((155_u128).safe_div(8).unwrap(), 19);
		assert_eq!((1_u128).safe_div(0), Err(ErrorCode::DivisionByZero));
		assert_eq!(U256::from(7_u64).safe_div(U256::zero()), Err(ErrorCode::DivisionByZero));
	}
}
