use std::str::FromStr;

use crate::error::ErrorCode;
use crate::math::constants::SLOTS_PER_YEAR;
use crate::math::decimal::Decimal;
use crate::math::fraction::{ BigFraction, Fraction };
use crate::math::interest::*;

fn d(s: &str) -> Decimal {
	Decimal::from_str(s).unwrap()
}

#[test]
fn elapsed_slots_never_negative() {
	assert_eq!(slots_elapsed(10, 4), 6);
	assert_eq!(slots_elapsed(4, 4), 0);
	assert_eq!(slots_elapsed(3, 4), 0);
}

#[test]
fn adjustment_factor() {
	assert_eq!(slot_adjustment_factor(500), 1.0);
	assert_eq!(slot_adjustment_factor(450), 1000.0 / 2.0 / 450.0);
	assert_eq!(slot_adjustment_factor(0), 1.0);
}

mod approximate_compounded_interest {
	use super::*;

	#[test]
	fn zero_rate_is_identity() {
		for slots in [0, 1, 4, 5, 1_000, 1_000_000] {
			assert_eq!(approximate_compounded_interest(Decimal::ZERO, slots).unwrap(), Decimal::ONE);
			assert_eq!(approximate_compounded_interest_f(Fraction::ZERO, slots).unwrap(), Fraction::ONE);
		}
	}

	#[test]
	fn exact_products_up_to_four_slots() {
		// a rate of SLOTS_PER_YEAR makes the per-slot base exactly one
		let rate = Decimal::from(SLOTS_PER_YEAR);
		assert_eq!(approximate_compounded_interest(rate, 1).unwrap(), Decimal::from(2_u64));
		assert_eq!(approximate_compounded_interest(rate, 3).unwrap(), Decimal::from(8_u64));
		assert_eq!(approximate_compounded_interest(rate, 4).unwrap(), Decimal::from(16_u64));

		let rate_f = Fraction::from_num(SLOTS_PER_YEAR);
		assert_eq!(approximate_compounded_interest_f(rate_f, 2).unwrap(), Fraction::from_num(4));
		assert_eq!(approximate_compounded_interest_f(rate_f, 4).unwrap(), Fraction::from_num(16));
	}

	#[test]
	fn binomial_expansion_beyond_four_slots() {
		// 1 + 5 + 10 + 10
		let rate = Decimal::from(SLOTS_PER_YEAR);
		assert_eq!(approximate_compounded_interest(rate, 5).unwrap(), Decimal::from(26_u64));
		assert_eq!(
			approximate_compounded_interest_f(Fraction::from_num(SLOTS_PER_YEAR), 5).unwrap(),
			Fraction::from_num(26)
		);
	}

	#[test]
	fn small_exponents_match_pow() {
		let rate = d("0.1234");
		let one_plus_base = rate.safe_div(Decimal::from(SLOTS_PER_YEAR)).unwrap() + Decimal::ONE;
		for slots in 0..=4 {
			assert_eq!(approximate_compounded_interest(rate, slots).unwrap(), one_plus_base.pow(slots));
		}
	}

	#[test]
	fn grows_with_slots() {
		let rate = d("0.5");
		let mut previous = Decimal::ONE;
		for slots in [1, 2, 3, 4, 5, 6, 100, 10_000, 1_000_000] {
			let compounded = approximate_compounded_interest(rate, slots).unwrap();
			assert!(compounded > previous, "{} slots", slots);
			previous = compounded;
		}
	}

	#[test]
	fn decimal_and_fixed_point_agree() {
		let rate = Fraction::from_bps(1_500);
		let fixed = approximate_compounded_interest_f(rate, 1_000).unwrap().to_decimal();
		let decimal = approximate_compounded_interest(d("0.15"), 1_000).unwrap();
		assert!((fixed - decimal).abs() < d("1e-12"));
	}
}

mod compound_interest {
	use super::*;

	fn per_slot(rate: &str) -> Decimal {
		d(rate) * Decimal::from(SLOTS_PER_YEAR)
	}

	#[test]
	fn splits_variable_interest() {
		let interest = compound_interest(
			Decimal::from(1_000_u64),
			Decimal::from(5_u64),
			Decimal::from(2_u64),
			per_slot("0.1"),
			Decimal::ZERO,
			d("0.2"),
			d("0.5"),
			1
		).unwrap();

		assert_eq!(interest.new_debt, Decimal::from(1_100_u64));
		assert_eq!(interest.fixed_host_fee, Decimal::ZERO);
		assert_eq!(interest.net_new_debt, Decimal::from(100_u64));
		assert_eq!(interest.variable_protocol_fee, Decimal::from(20_u64));
		assert_eq!(interest.absolute_referral_rate, d("0.1"));
		assert_eq!(interest.max_referral_fees, Decimal::from(10_u64));
		assert_eq!(interest.new_acc_protocol_fees, Decimal::from(15_u64));
		assert_eq!(interest.pending_referral_fees, Decimal::from(12_u64));
	}

	#[test]
	fn host_fee_is_additive() {
		let interest = compound_interest(
			Decimal::from(1_000_u64),
			Decimal::from(5_u64),
			Decimal::ZERO,
			per_slot("0.1"),
			per_slot("0.1"),
			d("0.2"),
			d("0.5"),
			1
		).unwrap();

		assert_eq!(interest.new_debt, Decimal::from(1_200_u64));
		assert_eq!(interest.fixed_host_fee, Decimal::from(100_u64));
		assert_eq!(interest.net_new_debt, Decimal::from(100_u64));
		assert_eq!(interest.new_acc_protocol_fees, Decimal::from(115_u64));
		assert_eq!(interest.pending_referral_fees, Decimal::from(10_u64));
	}

	#[test]
	fn no_slots_no_interest() {
		let interest = compound_interest(
			Decimal::from(1_000_u64),
			Decimal::from(5_u64),
			Decimal::from(2_u64),
			per_slot("0.1"),
			per_slot("0.05"),
			d("0.2"),
			Decimal::ZERO,
			0
		).unwrap();

		assert_eq!(interest.new_debt, Decimal::from(1_000_u64));
		assert_eq!(interest.new_acc_protocol_fees, Decimal::from(5_u64));
		assert_eq!(interest.pending_referral_fees, Decimal::from(2_u64));
	}

	#[test]
	fn negative_variable_interest_underflows() {
		let result = compound_interest(
			Decimal::from(1_000_u64),
			Decimal::ZERO,
			Decimal::ZERO,
			-per_slot("0.1"),
			Decimal::ZERO,
			d("0.2"),
			Decimal::ZERO,
			1
		);

		assert_eq!(result, Err(ErrorCode::Underflow));
	}
}

mod compound_interest_f {
	use super::*;

	fn balances() -> CompoundedBalances {
		CompoundedBalances {
			borrowed_amount: Fraction::from_num(1_000),
			accumulated_protocol_fees: Fraction::from_num(5),
			pending_referrer_fees: Fraction::from_num(2),
			absolute_referral_rate: Fraction::ZERO,
			cumulative_borrow_rate: BigFraction::one(),
		}
	}

	#[test]
	fn splits_variable_interest() {
		let half = Fraction::from_bps(5_000);
		let compounded = compound_interest_f(
			&balances(),
			Fraction::from_num(SLOTS_PER_YEAR / 2),
			Fraction::ZERO,
			half,
			half,
			1
		).unwrap();

		assert_eq!(compounded.borrowed_amount, Fraction::from_num(1_500));
		assert_eq!(compounded.cumulative_borrow_rate, BigFraction::from(Fraction::from_bps(15_000)));
		assert_eq!(compounded.absolute_referral_rate, Fraction::from_bps(2_500));
		// 5 + 250 - 125
		assert_eq!(compounded.accumulated_protocol_fees, Fraction::from_num(130));
		assert_eq!(compounded.pending_referrer_fees, Fraction::from_num(127));
	}

	#[test]
	fn host_fee_goes_to_protocol() {
		let half = Fraction::from_bps(5_000);
		let compounded = compound_interest_f(
			&balances(),
			Fraction::from_num(SLOTS_PER_YEAR / 2),
			Fraction::from_num(SLOTS_PER_YEAR / 2),
			half,
			Fraction::ZERO,
			1
		).unwrap();

		// debt doubles: 500 to the host, 500 variable split evenly
		assert_eq!(compounded.borrowed_amount, Fraction::from_num(2_000));
		assert_eq!(compounded.accumulated_protocol_fees, Fraction::from_num(755));
		assert_eq!(compounded.pending_referrer_fees, Fraction::from_num(2));
	}
}

mod apy_from_apr {
	use super::*;

	#[test]
	fn zero_rate_has_zero_yield() {
		assert_eq!(apy_from_apr(0.0).unwrap(), 0.0);
	}

	#[test]
	fn per_slot_compounding_approaches_continuous() {
		let apy = apy_from_apr(0.1).unwrap();
		assert!(apy > 0.1);
		assert!((apy - (0.1_f64.exp() - 1.0)).abs() < 1e-6, "{}", apy);
	}

	#[test]
	fn rejects_non_finite_rates() {
		assert_eq!(apy_from_apr(f64::NAN), Err(ErrorCode::InvalidDecimal));
		assert_eq!(apy_from_apr(f64::INFINITY), Err(ErrorCode::InvalidDecimal));
	}
}
