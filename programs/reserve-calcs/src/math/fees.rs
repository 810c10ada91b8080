use crate::error::{ LendingResult, ErrorCode };
use crate::math::constants::ONE_HUNDRED_PCT_IN_BPS;
use crate::math::decimal::Decimal;
use crate::validate;


/// Whether a fee is charged on top of `amount` or carved out of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeCalculation {
	/// `amount * rate`
	Exclusive,
	/// `amount * rate / (1 + rate)`
	Inclusive,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fees {
	pub protocol_fees: Decimal,
	pub referrer_fees: Decimal,
}

/// Splits the fee on `amount` between the protocol and a referrer.
///
/// A positive fee is never below one lamport, and the referrer's share is
/// rounded down in favour of the protocol.
pub fn calculate_fees(
	amount: Decimal,
	fee_rate: Decimal,
	fee_calculation: FeeCalculation,
	referral_fee_bps: u16,
	has_referrer: bool
) -> LendingResult<Fees> {
	let referral_fee_rate = Decimal::from(referral_fee_bps).safe_div(
		Decimal::from(ONE_HUNDRED_PCT_IN_BPS)
	)?;

	if fee_rate <= Decimal::ZERO || amount <= Decimal::ZERO {
		return Ok(Fees::default());
	}

	let need_to_assess_referral_fee = referral_fee_rate > Decimal::ZERO && has_referrer;
	let minimum_fee = Decimal::ONE;

	let fee_amount = match fee_calculation {
		FeeCalculation::Exclusive => amount * fee_rate,
		FeeCalculation::Inclusive => {
			let fee_factor = fee_rate.safe_div(fee_rate + Decimal::ONE)?;
			amount * fee_factor
		}
	};

	let fee = fee_amount.max(minimum_fee);

	validate!(
		fee < amount,
		ErrorCode::BorrowTooSmall,
		"fee {} would consume the whole amount {}",
		fee,
		amount
	)?;

	let referral_fee = if !need_to_assess_referral_fee {
		Decimal::ZERO
	} else if referral_fee_rate == Decimal::ONE {
		fee
	} else {
		(fee * referral_fee_rate).floor()
	};

	Ok(Fees {
		protocol_fees: fee - referral_fee,
		referrer_fees: referral_fee,
	})
}
