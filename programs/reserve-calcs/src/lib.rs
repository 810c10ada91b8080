#![allow(clippy::too_many_arguments)]
#![allow(clippy::bool_assert_comparison)]
#![allow(clippy::comparison_chain)]

pub use solana_program::msg;

pub use math::borrow_rate_curve::{ BorrowRateCurve, CurvePoint };
pub use math::decimal::Decimal;
pub use math::fees::{ FeeCalculation, Fees };
pub use math::fraction::{ BigFraction, Fraction };
pub use state::reserve::{
	BigFractionBytes,
	LastUpdate,
	Reserve,
	ReserveCollateral,
	ReserveConfig,
	ReserveFees,
	ReserveLiquidity,
};
pub use state::reserve_snapshot::{ DebtAndSupply, EstimatedProtocolFees, ReserveSnapshot, SimulatedAction };

pub mod error;
pub mod macros;
pub mod math;
pub mod state;
