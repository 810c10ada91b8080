use thiserror::Error;

pub type LendingResult<T = ()> = std::result::Result<T, ErrorCode>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
	// Math
	#[error("Math operation underflowed")]
	Underflow,
	#[error("Division by zero")]
	DivisionByZero,
	#[error("Math operation overflowed")]
	ArithmeticOverflow,
	#[error("Conversion to u128/u64 failed with an overflow or underflow")]
	BnConversionError,
	#[error("Invalid decimal literal")]
	InvalidDecimal,

	// Borrow rate curve
	#[error("Borrow rate curve has no points")]
	DegenerateCurve,
	#[error("Borrow rate curve is malformed")]
	InvalidBorrowRateCurve,

	// Fees
	#[error("Borrow amount too small to cover the fee")]
	BorrowTooSmall,
}

#[macro_export]
macro_rules! print_error {
	($err:expr) => {
        {
        || {
            let error_code: $crate::error::ErrorCode = $err;
            $crate::msg!("{:?} thrown at {}:{}", error_code, file!(), line!());
            $err
        }
        }
	};
}

#[macro_export]
macro_rules! math_error {
	() => {
        {
        || {
            let error_code = $crate::error::ErrorCode::ArithmeticOverflow;
            $crate::msg!("Error {} thrown at {}:{}", error_code, file!(), line!());
            error_code
        }
        }
	};
}
