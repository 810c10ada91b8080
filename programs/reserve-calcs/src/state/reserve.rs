use solana_program::clock::Slot;

use crate::error::LendingResult;
use crate::math::borrow_rate_curve::BorrowRateCurve;
use crate::math::casting::Cast;
use crate::math::fraction::{ BigFraction, Fraction };
use crate::math::interest::{ compound_interest_f, CompoundedBalances };
use crate::math::safe_math::SafeMath;
use crate::math_error;


#[derive(Clone, Copy, Default, Eq, PartialEq, Debug)]
pub struct LastUpdate {
	/// Slot of the last refresh
	pub slot: Slot,
	/// True when an operation changed the reserve since the last refresh
	pub stale: bool,
}

impl LastUpdate {
	pub fn new(slot: Slot) -> Self {
		LastUpdate { slot, stale: true }
	}

	/// Slots since the last refresh; fails if `current_slot` precedes it.
	pub fn slots_elapsed(&self, current_slot: Slot) -> LendingResult<u64> {
		current_slot.safe_sub(self.slot)
	}

	pub fn update_slot(&mut self, slot: Slot) {
		self.slot = slot;
		self.stale = false;
	}
}

/// A [`BigFraction`] as stored on chain.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug)]
pub struct BigFractionBytes {
	pub value: [u64; 4],
	pub padding: [u64; 2],
}

impl From<BigFractionBytes> for BigFraction {
	fn from(bytes: BigFractionBytes) -> Self {
		BigFraction::from_limbs(bytes.value)
	}
}

impl From<BigFraction> for BigFractionBytes {
	fn from(value: BigFraction) -> Self {
		BigFractionBytes { value: value.to_limbs(), padding: [0; 2] }
	}
}

#[derive(Clone, Copy, Default, Eq, PartialEq, Debug)]
pub struct ReserveLiquidity {
	/// Liquidity available to borrow
	/// precision: token lamports
	pub available_amount: u64,
	/// Outstanding debt including accrued interest
	/// precision: scaled fraction of token lamports
	pub borrowed_amount_sf: u128,
	/// Fees owed to the protocol, not yet withdrawn
	/// precision: scaled fraction of token lamports
	pub accumulated_protocol_fees_sf: u128,
	/// Fees credited to referrers, not yet claimed
	/// precision: scaled fraction of token lamports
	pub accumulated_referrer_fees_sf: u128,
	/// Referrer fees awaiting assignment to a referrer
	/// precision: scaled fraction of token lamports
	pub pending_referrer_fees_sf: u128,
	/// Share of interest set aside for referrers at the last refresh
	pub absolute_referral_rate_sf: u128,
	/// Product of every compounded interest factor since initialization
	pub cumulative_borrow_rate_bsf: BigFractionBytes,
	pub mint_decimals: u64,
}

impl ReserveLiquidity {
	/// `available + borrowed - protocol fees - referrer fees - pending referrer fees`
	pub fn total_supply(&self) -> LendingResult<Fraction> {
		Fraction::from_num(self.available_amount)
			.safe_add(self.total_borrow())?
			.safe_sub(Fraction::from_bits(self.accumulated_protocol_fees_sf))?
			.safe_sub(Fraction::from_bits(self.accumulated_referrer_fees_sf))?
			.safe_sub(Fraction::from_bits(self.pending_referrer_fees_sf))
	}

	pub fn total_borrow(&self) -> Fraction {
		Fraction::from_bits(self.borrowed_amount_sf)
	}

	pub fn utilization_rate(&self) -> LendingResult<Fraction> {
		let total_supply = self.total_supply()?;
		if total_supply == Fraction::ZERO {
			return Ok(Fraction::ZERO);
		}

		self.total_borrow().safe_div(total_supply)
	}

	pub fn mint_factor(&self) -> LendingResult<u64> {
		let decimals: u32 = self.mint_decimals.cast()?;
		(10_u64).checked_pow(decimals).ok_or_else(math_error!())
	}

	fn balances(&self) -> CompoundedBalances {
		CompoundedBalances {
			borrowed_amount: self.total_borrow(),
			accumulated_protocol_fees: Fraction::from_bits(self.accumulated_protocol_fees_sf),
			pending_referrer_fees: Fraction::from_bits(self.pending_referrer_fees_sf),
			absolute_referral_rate: Fraction::from_bits(self.absolute_referral_rate_sf),
			cumulative_borrow_rate: BigFraction::from(self.cumulative_borrow_rate_bsf),
		}
	}

	fn apply(&mut self, balances: &CompoundedBalances) {
		self.borrowed_amount_sf = balances.borrowed_amount.to_bits();
		self.accumulated_protocol_fees_sf = balances.accumulated_protocol_fees.to_bits();
		self.pending_referrer_fees_sf = balances.pending_referrer_fees.to_bits();
		self.absolute_referral_rate_sf = balances.absolute_referral_rate.to_bits();
		self.cumulative_borrow_rate_bsf = balances.cumulative_borrow_rate.into();
	}
}

#[derive(Clone, Copy, Default, Eq, PartialEq, Debug)]
pub struct ReserveCollateral {
	/// Supply of the collateral token minted against deposits
	pub mint_total_supply: u64,
}

#[derive(Clone, Copy, Default, Eq, PartialEq, Debug)]
pub struct ReserveFees {
	/// Origination fee charged on borrows
	/// precision: scaled fraction
	pub borrow_fee_sf: u64,
	/// Fee charged on flash loans; `u64::MAX` disables flash loans
	/// precision: scaled fraction
	pub flash_loan_fee_sf: u64,
}

#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct ReserveConfig {
	/// Percentage of variable interest kept by the protocol
	pub protocol_take_rate_pct: u8,
	/// Fixed spread paid to the host on top of the curve rate
	pub host_fixed_interest_rate_bps: u16,
	pub borrow_rate_curve: BorrowRateCurve,
	pub fees: ReserveFees,
}

#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct Reserve {
	pub last_update: LastUpdate,
	pub liquidity: ReserveLiquidity,
	pub collateral: ReserveCollateral,
	pub config: ReserveConfig,
}

impl Reserve {
	pub fn current_borrow_rate(&self) -> LendingResult<Fraction> {
		let utilization_rate = self.liquidity.utilization_rate()?;
		self.config.borrow_rate_curve.borrow_rate_f(utilization_rate)
	}

	/// Copy of the reserve with interest accrued up to `current_slot`, as a
	/// refresh at that slot would leave it.
	pub fn accrue_interest(&self, current_slot: Slot, referral_fee_bps: u16) -> LendingResult<Reserve> {
		let slots_elapsed = self.last_update.slots_elapsed(current_slot)?;
		let mut projected = self.clone();

		if slots_elapsed > 0 {
			let current_borrow_rate = self.current_borrow_rate()?;
			let protocol_take_rate = Fraction::from_percent(self.config.protocol_take_rate_pct);
			let referral_rate = Fraction::from_bps(referral_fee_bps as u64);
			let host_fixed_interest_rate = Fraction::from_bps(
				self.config.host_fixed_interest_rate_bps as u64
			);

			let balances = compound_interest_f(
				&self.liquidity.balances(),
				current_borrow_rate,
				host_fixed_interest_rate,
				protocol_take_rate,
				referral_rate,
				slots_elapsed
			)?;
			projected.liquidity.apply(&balances);
		}

		projected.last_update.update_slot(current_slot);

		Ok(projected)
	}
}
