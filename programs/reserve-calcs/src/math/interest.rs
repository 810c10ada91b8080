use num_traits::{ FromPrimitive, ToPrimitive };
use solana_program::clock::Slot;

use crate::error::{ LendingResult, ErrorCode };
use crate::math::constants::{ MILLISECONDS_PER_SECOND, SLOTS_PER_SECOND, SLOTS_PER_YEAR };
use crate::math::decimal::Decimal;
use crate::math::fraction::{ BigFraction, Fraction };
use crate::math::safe_math::SafeMath;
use crate::{ print_error, validate };

#[cfg(test)]
mod tests;

/// Slots between the last update and `current_slot`, zero if the update is in the future.
pub fn slots_elapsed(current_slot: Slot, last_update_slot: Slot) -> u64 {
	current_slot.saturating_sub(last_update_slot)
}

/// Scales a per-slot rate calibrated for the nominal slot time to the observed one.
/// A zero duration keeps the nominal per-slot model.
pub fn slot_adjustment_factor(recent_slot_duration_ms: u64) -> f64 {
	if recent_slot_duration_ms == 0 {
		return 1.0;
	}

	(MILLISECONDS_PER_SECOND as f64) / (SLOTS_PER_SECOND as f64) / (recent_slot_duration_ms as f64)
}

/// Annual yield of `apr` compounded every slot.
pub fn apy_from_apr(apr: f64) -> LendingResult<f64> {
	let apr = Decimal::from_f64(apr).ok_or_else(print_error!(ErrorCode::InvalidDecimal))?;
	let per_slot = Decimal::ONE + apr.safe_div(Decimal::from(SLOTS_PER_YEAR))?;
	let per_slot = per_slot.to_f64().ok_or_else(print_error!(ErrorCode::BnConversionError))?;

	Ok(per_slot.powf(SLOTS_PER_YEAR as f64) - 1.0)
}

/// `(1 + rate / SLOTS_PER_YEAR)^elapsed_slots`: exact up to four slots, a
/// third-order binomial expansion beyond.
pub fn approximate_compounded_interest(rate: Decimal, elapsed_slots: u64) -> LendingResult<Decimal> {
	let base = rate.safe_div(Decimal::from(SLOTS_PER_YEAR))?;
	let one_plus_base = base + Decimal::ONE;

	match elapsed_slots {
		0 => {
			return Ok(Decimal::ONE);
		}
		1 => {
			return Ok(one_plus_base);
		}
		2 => {
			return Ok(one_plus_base * one_plus_base);
		}
		3 => {
			return Ok(one_plus_base * one_plus_base * one_plus_base);
		}
		4 => {
			let pow_two = one_plus_base * one_plus_base;
			return Ok(pow_two * pow_two);
		}
		_ => {}
	}

	let exp = Decimal::from(elapsed_slots);
	let exp_minus_one = Decimal::from(elapsed_slots - 1);
	let exp_minus_two = Decimal::from(elapsed_slots - 2);

	let base_power_two = base * base;
	let base_power_three = base_power_two * base;

	let first_term = base * exp;
	let second_term = (base_power_two * exp * exp_minus_one).safe_div(Decimal::from(2_u64))?;
	let third_term = (base_power_three * exp * exp_minus_one * exp_minus_two).safe_div(
		Decimal::from(6_u64)
	)?;

	Ok(Decimal::ONE + first_term + second_term + third_term)
}

/// Fixed-point twin of [`approximate_compounded_interest`], rounding every product down.
pub fn approximate_compounded_interest_f(rate: Fraction, elapsed_slots: u64) -> LendingResult<Fraction> {
	let base = rate.safe_div_int(SLOTS_PER_YEAR)?;
	let one_plus_base = Fraction::ONE.safe_add(base)?;

	match elapsed_slots {
		0 => {
			return Ok(Fraction::ONE);
		}
		1..=4 => {
			return one_plus_base.pow(elapsed_slots);
		}
		_ => {}
	}

	let exp = elapsed_slots;
	let exp_minus_one = exp.safe_sub(1)?;
	let exp_minus_two = exp.safe_sub(2)?;

	let base_power_two = base.safe_mul(base)?;
	let base_power_three = base_power_two.safe_mul(base)?;

	let first_term = base.safe_mul_int(exp)?;
	let second_term = base_power_two.safe_mul_int(exp)?.safe_mul_int(exp_minus_one)?.safe_div_int(2)?;
	let third_term = base_power_three
		.safe_mul_int(exp)?
		.safe_mul_int(exp_minus_one)?
		.safe_mul_int(exp_minus_two)?
		.safe_div_int(6)?;

	Fraction::ONE.safe_add(first_term)?.safe_add(second_term)?.safe_add(third_term)
}

/// Outcome of compounding a reserve's debt over a number of slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompoundedInterest {
	pub new_debt: Decimal,
	pub net_new_debt: Decimal,
	pub variable_protocol_fee: Decimal,
	pub fixed_host_fee: Decimal,
	pub absolute_referral_rate: Decimal,
	pub max_referral_fees: Decimal,
	pub new_acc_protocol_fees: Decimal,
	pub pending_referral_fees: Decimal,
}

/// Compounds `previous_debt` at the curve rate plus the host's fixed rate.
///
/// The host's share is the growth the fixed rate alone would produce; the
/// protocol takes `protocol_take_rate` of the remaining variable interest and
/// sets aside `referral_rate` of its take for referrers. Lenders keep the rest
/// through the larger debt.
pub fn compound_interest(
	previous_debt: Decimal,
	accumulated_protocol_fees: Decimal,
	pending_referrer_fees: Decimal,
	current_borrow_rate: Decimal,
	host_fixed_interest_rate: Decimal,
	protocol_take_rate: Decimal,
	referral_rate: Decimal,
	slots_elapsed: u64
) -> LendingResult<CompoundedInterest> {
	let compounded_interest_rate = approximate_compounded_interest(
		current_borrow_rate + host_fixed_interest_rate,
		slots_elapsed
	)?;
	let compounded_fixed_rate = approximate_compounded_interest(host_fixed_interest_rate, slots_elapsed)?;

	let new_debt = previous_debt * compounded_interest_rate;
	let fixed_host_fee = previous_debt * compounded_fixed_rate - previous_debt;
	let net_new_debt = new_debt - previous_debt - fixed_host_fee;

	validate!(
		!net_new_debt.is_negative(),
		ErrorCode::Underflow,
		"variable interest {} is negative",
		net_new_debt
	)?;

	let variable_protocol_fee = net_new_debt * protocol_take_rate;
	let absolute_referral_rate = protocol_take_rate * referral_rate;
	let max_referral_fees = net_new_debt * absolute_referral_rate;

	let new_acc_protocol_fees =
		variable_protocol_fee + fixed_host_fee - max_referral_fees + accumulated_protocol_fees;
	let pending_referral_fees = pending_referrer_fees + max_referral_fees;

	Ok(CompoundedInterest {
		new_debt,
		net_new_debt,
		variable_protocol_fee,
		fixed_host_fee,
		absolute_referral_rate,
		max_referral_fees,
		new_acc_protocol_fees,
		pending_referral_fees,
	})
}

/// Raw scaled-fraction balances a refresh rewrites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompoundedBalances {
	pub borrowed_amount: Fraction,
	pub accumulated_protocol_fees: Fraction,
	pub pending_referrer_fees: Fraction,
	pub absolute_referral_rate: Fraction,
	pub cumulative_borrow_rate: BigFraction,
}

/// Fixed-point compounding, as performed when a reserve is refreshed.
pub fn compound_interest_f(
	previous: &CompoundedBalances,
	current_borrow_rate: Fraction,
	host_fixed_interest_rate: Fraction,
	protocol_take_rate: Fraction,
	referral_rate: Fraction,
	slots_elapsed: u64
) -> LendingResult<CompoundedBalances> {
	let compounded_interest_rate = approximate_compounded_interest_f(
		current_borrow_rate.safe_add(host_fixed_interest_rate)?,
		slots_elapsed
	)?;
	let compounded_fixed_rate = approximate_compounded_interest_f(host_fixed_interest_rate, slots_elapsed)?;

	let cumulative_borrow_rate = previous.cumulative_borrow_rate.safe_mul(compounded_interest_rate)?;
	let previous_debt = previous.borrowed_amount;
	let new_debt = previous_debt.safe_mul(compounded_interest_rate)?;

	let fixed_host_fee = previous_debt.safe_mul(compounded_fixed_rate)?.safe_sub(previous_debt)?;
	let net_new_variable_debt = new_debt.safe_sub(previous_debt)?.safe_sub(fixed_host_fee)?;

	let variable_protocol_fee = net_new_variable_debt.safe_mul(protocol_take_rate)?;
	let absolute_referral_rate = protocol_take_rate.safe_mul(referral_rate)?;
	let max_referrers_fees = net_new_variable_debt.safe_mul(absolute_referral_rate)?;

	let accumulated_protocol_fees = previous.accumulated_protocol_fees
		.safe_add(fixed_host_fee)?
		.safe_add(variable_protocol_fee)?
		.safe_sub(max_referrers_fees)?;

	Ok(CompoundedBalances {
		borrowed_amount: new_debt,
		accumulated_protocol_fees,
		pending_referrer_fees: previous.pending_referrer_fees.safe_add(max_referrers_fees)?,
		absolute_referral_rate,
		cumulative_borrow_rate,
	})
}
