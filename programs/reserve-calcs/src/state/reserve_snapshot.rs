use num_traits::{ FromPrimitive, ToPrimitive };
use solana_program::clock::Slot;

use crate::error::{ LendingResult, ErrorCode };
use crate::math::constants::{ DEFAULT_RECENT_SLOT_DURATION_MS, INITIAL_COLLATERAL_RATE };
use crate::math::decimal::Decimal;
use crate::math::fees::{ calculate_fees, FeeCalculation, Fees };
use crate::math::fraction::{ BigFraction, Fraction };
use crate::math::interest::{
	apy_from_apr,
	approximate_compounded_interest,
	compound_interest,
	slot_adjustment_factor,
	slots_elapsed,
	CompoundedInterest,
};
use crate::print_error;
use crate::state::reserve::Reserve;


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebtAndSupply {
	pub total_borrow: Decimal,
	pub total_supply: Decimal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EstimatedProtocolFees {
	/// Stored fees plus everything accrued since the last refresh
	pub accumulated_protocol_fees: Decimal,
	/// Protocol share of the variable interest accrued since the last refresh
	pub compounded_variable_protocol_fee: Decimal,
	/// Interest accrued at the host's fixed rate since the last refresh
	pub compounded_fixed_host_fee: Decimal,
}

/// A hypothetical change to the reserve's balances, used to preview rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulatedAction {
	Deposit(Decimal),
	Withdraw(Decimal),
	Borrow(Decimal),
	Repay(Decimal),
	DepositAndBorrow {
		deposit: Decimal,
		borrow: Decimal,
	},
	RepayAndWithdraw {
		repay: Decimal,
		withdraw: Decimal,
	},
	/// Liquidity deposited in exchange for collateral
	Mint(Decimal),
	/// Collateral redeemed for liquidity
	Redeem(Decimal),
}

impl SimulatedAction {
	/// Debt and supply once the action is applied.
	pub fn apply(self, DebtAndSupply { total_borrow, total_supply }: DebtAndSupply) -> DebtAndSupply {
		match self {
			SimulatedAction::Deposit(amount) | SimulatedAction::Mint(amount) =>
				DebtAndSupply { total_borrow, total_supply: total_supply + amount },
			SimulatedAction::Withdraw(amount) | SimulatedAction::Redeem(amount) =>
				DebtAndSupply { total_borrow, total_supply: total_supply - amount },
			SimulatedAction::Borrow(amount) =>
				DebtAndSupply { total_borrow: total_borrow + amount, total_supply },
			SimulatedAction::Repay(amount) =>
				DebtAndSupply { total_borrow: total_borrow - amount, total_supply },
			SimulatedAction::DepositAndBorrow { deposit, borrow } =>
				DebtAndSupply { total_borrow: total_borrow + borrow, total_supply: total_supply + deposit },
			SimulatedAction::RepayAndWithdraw { repay, withdraw } =>
				DebtAndSupply { total_borrow: total_borrow - repay, total_supply: total_supply - withdraw },
		}
	}
}

/// Read-only view over a reserve that values its balances at the last
/// refresh ("stale") or projected to a later slot ("estimated").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReserveSnapshot {
	state: Reserve,
	recent_slot_duration_ms: u64,
}

fn to_f64(value: Decimal) -> LendingResult<f64> {
	value.to_f64().ok_or_else(print_error!(ErrorCode::BnConversionError))
}

fn utilization(DebtAndSupply { total_borrow, total_supply }: DebtAndSupply) -> LendingResult<f64> {
	if total_supply.is_zero() {
		return Ok(0.0);
	}
	to_f64(total_borrow.safe_div(total_supply)?)
}

fn from_f64(value: f64) -> LendingResult<Decimal> {
	Decimal::from_f64(value).ok_or_else(print_error!(ErrorCode::InvalidDecimal))
}

impl ReserveSnapshot {
	pub fn new(state: Reserve) -> Self {
		ReserveSnapshot { state, recent_slot_duration_ms: DEFAULT_RECENT_SLOT_DURATION_MS }
	}

	pub fn with_recent_slot_duration_ms(mut self, recent_slot_duration_ms: u64) -> Self {
		self.recent_slot_duration_ms = recent_slot_duration_ms;
		self
	}

	pub fn state(&self) -> &Reserve {
		&self.state
	}

	pub fn recent_slot_duration_ms(&self) -> u64 {
		self.recent_slot_duration_ms
	}

	// Balances

	pub fn borrowed_amount(&self) -> Decimal {
		Fraction::from_bits(self.state.liquidity.borrowed_amount_sf).to_decimal()
	}

	pub fn liquidity_available_amount(&self) -> Decimal {
		Decimal::from(self.state.liquidity.available_amount)
	}

	pub fn accumulated_protocol_fees(&self) -> Decimal {
		Fraction::from_bits(self.state.liquidity.accumulated_protocol_fees_sf).to_decimal()
	}

	pub fn accumulated_referrer_fees(&self) -> Decimal {
		Fraction::from_bits(self.state.liquidity.accumulated_referrer_fees_sf).to_decimal()
	}

	pub fn pending_referrer_fees(&self) -> Decimal {
		Fraction::from_bits(self.state.liquidity.pending_referrer_fees_sf).to_decimal()
	}

	/// `10^mint_decimals`
	pub fn mint_factor(&self) -> LendingResult<Decimal> {
		Ok(Decimal::from(self.state.liquidity.mint_factor()?))
	}

	// Configured rates

	pub fn flash_loan_fee(&self) -> Decimal {
		let flash_loan_fee_sf = self.state.config.fees.flash_loan_fee_sf;
		if flash_loan_fee_sf == u64::MAX {
			return Decimal::ZERO;
		}
		Fraction::from_bits(flash_loan_fee_sf as u128).to_decimal()
	}

	pub fn borrow_fee(&self) -> Decimal {
		Fraction::from_bits(self.state.config.fees.borrow_fee_sf as u128).to_decimal()
	}

	pub fn fixed_host_interest_rate(&self) -> Decimal {
		Decimal::from(self.state.config.host_fixed_interest_rate_bps).mul_pow10(-4)
	}

	fn protocol_take_rate(&self) -> Decimal {
		Decimal::from(self.state.config.protocol_take_rate_pct).mul_pow10(-2)
	}

	// Supply

	/// Total liquidity supplied as of the last refresh.
	pub fn total_supply(&self) -> Decimal {
		self.liquidity_available_amount() + self.borrowed_amount() -
			self.accumulated_protocol_fees() -
			self.accumulated_referrer_fees() -
			self.pending_referrer_fees()
	}

	pub fn estimated_debt_and_supply(&self, slot: Slot, referral_fee_bps: u16) -> LendingResult<DebtAndSupply> {
		let slots_elapsed = slots_elapsed(slot, self.state.last_update.slot);
		if slots_elapsed == 0 {
			return Ok(DebtAndSupply {
				total_borrow: self.borrowed_amount(),
				total_supply: self.total_supply(),
			});
		}

		let interest = self.compound_interest(slots_elapsed, referral_fee_bps)?;
		let total_supply =
			self.liquidity_available_amount() + interest.new_debt -
			interest.new_acc_protocol_fees -
			self.accumulated_referrer_fees() -
			interest.pending_referral_fees;

		Ok(DebtAndSupply { total_borrow: interest.new_debt, total_supply })
	}

	/// Total liquidity supplied once interest up to `slot` is accrued.
	pub fn estimated_total_supply(&self, slot: Slot, referral_fee_bps: u16) -> LendingResult<Decimal> {
		Ok(self.estimated_debt_and_supply(slot, referral_fee_bps)?.total_supply)
	}

	pub fn estimated_accumulated_protocol_fees(
		&self,
		slot: Slot,
		referral_fee_bps: u16
	) -> LendingResult<EstimatedProtocolFees> {
		let slots_elapsed = slots_elapsed(slot, self.state.last_update.slot);
		if slots_elapsed == 0 {
			return Ok(EstimatedProtocolFees {
				accumulated_protocol_fees: self.accumulated_protocol_fees(),
				compounded_variable_protocol_fee: Decimal::ZERO,
				compounded_fixed_host_fee: Decimal::ZERO,
			});
		}

		let interest = self.compound_interest(slots_elapsed, referral_fee_bps)?;

		Ok(EstimatedProtocolFees {
			accumulated_protocol_fees: interest.new_acc_protocol_fees,
			compounded_variable_protocol_fee: interest.variable_protocol_fee,
			compounded_fixed_host_fee: interest.fixed_host_fee,
		})
	}

	// Utilization and rates

	/// Borrowed share of the stale total supply; zero for an empty reserve.
	pub fn utilization_ratio(&self) -> LendingResult<f64> {
		utilization(DebtAndSupply {
			total_borrow: self.borrowed_amount(),
			total_supply: self.total_supply(),
		})
	}

	pub fn estimated_utilization_ratio(&self, slot: Slot, referral_fee_bps: u16) -> LendingResult<f64> {
		utilization(self.estimated_debt_and_supply(slot, referral_fee_bps)?)
	}

	/// Utilization after `action` is applied to the balances projected to `slot`.
	pub fn simulated_utilization_ratio(
		&self,
		action: SimulatedAction,
		slot: Slot,
		referral_fee_bps: u16
	) -> LendingResult<f64> {
		utilization(action.apply(self.estimated_debt_and_supply(slot, referral_fee_bps)?))
	}

	pub fn slot_adjustment_factor(&self) -> f64 {
		slot_adjustment_factor(self.recent_slot_duration_ms)
	}

	/// Curve rate at the stale utilization, adjusted for slot time.
	pub fn borrow_rate(&self) -> LendingResult<f64> {
		let utilization = self.utilization_ratio()?;
		let rate = self.state.config.borrow_rate_curve.borrow_rate(utilization)?;
		Ok(rate * self.slot_adjustment_factor())
	}

	pub fn estimated_borrow_rate(&self, slot: Slot, referral_fee_bps: u16) -> LendingResult<f64> {
		let utilization = self.estimated_utilization_ratio(slot, referral_fee_bps)?;
		let rate = self.state.config.borrow_rate_curve.borrow_rate(utilization)?;
		Ok(rate * self.slot_adjustment_factor())
	}

	/// Estimated curve rate plus the host's fixed rate.
	pub fn borrow_apr(&self, slot: Slot, referral_fee_bps: u16) -> LendingResult<f64> {
		let borrow_rate = self.estimated_borrow_rate(slot, referral_fee_bps)?;
		Ok(borrow_rate + to_f64(self.fixed_host_interest_rate())?)
	}

	/// Rate earned by lenders: utilization times the borrow rate, net of the protocol take.
	pub fn supply_apr(&self, slot: Slot, referral_fee_bps: u16) -> LendingResult<f64> {
		let utilization = self.utilization_ratio()?;
		let borrow_rate = self.estimated_borrow_rate(slot, referral_fee_bps)?;
		Ok(utilization * borrow_rate * self.lender_share())
	}

	pub fn total_supply_apy(&self, slot: Slot) -> LendingResult<f64> {
		apy_from_apr(self.supply_apr(slot, 0)?)
	}

	pub fn total_borrow_apy(&self, slot: Slot) -> LendingResult<f64> {
		apy_from_apr(self.borrow_apr(slot, 0)?)
	}

	pub fn simulated_borrow_rate(
		&self,
		action: SimulatedAction,
		slot: Slot,
		referral_fee_bps: u16
	) -> LendingResult<f64> {
		let utilization = self.simulated_utilization_ratio(action, slot, referral_fee_bps)?;
		let rate = self.state.config.borrow_rate_curve.borrow_rate(utilization)?;
		Ok(rate * self.slot_adjustment_factor())
	}

	pub fn simulated_borrow_apr(
		&self,
		action: SimulatedAction,
		slot: Slot,
		referral_fee_bps: u16
	) -> LendingResult<f64> {
		let borrow_rate = self.simulated_borrow_rate(action, slot, referral_fee_bps)?;
		Ok(borrow_rate + to_f64(self.fixed_host_interest_rate())?)
	}

	pub fn simulated_supply_apr(
		&self,
		action: SimulatedAction,
		slot: Slot,
		referral_fee_bps: u16
	) -> LendingResult<f64> {
		let utilization = self.simulated_utilization_ratio(action, slot, referral_fee_bps)?;
		let borrow_rate = self.simulated_borrow_rate(action, slot, referral_fee_bps)?;
		Ok(utilization * borrow_rate * self.lender_share())
	}

	fn lender_share(&self) -> f64 {
		1.0 - (self.state.config.protocol_take_rate_pct as f64) / 100.0
	}

	// Cumulative borrow rate and collateral

	pub fn cumulative_borrow_rate(&self) -> Decimal {
		BigFraction::from(self.state.liquidity.cumulative_borrow_rate_bsf).to_decimal()
	}

	pub fn estimated_cumulative_borrow_rate(&self, slot: Slot, referral_fee_bps: u16) -> LendingResult<Decimal> {
		let borrow_apr = from_f64(self.borrow_apr(slot, referral_fee_bps)?)?;
		let slots_elapsed = slots_elapsed(slot, self.state.last_update.slot);
		let compound_interest = approximate_compounded_interest(borrow_apr, slots_elapsed)?;

		Ok(self.cumulative_borrow_rate() * compound_interest)
	}

	/// Collateral tokens minted per unit of liquidity.
	pub fn collateral_exchange_rate(&self) -> LendingResult<Decimal> {
		self.exchange_rate(self.total_supply())
	}

	pub fn estimated_collateral_exchange_rate(&self, slot: Slot, referral_fee_bps: u16) -> LendingResult<Decimal> {
		self.exchange_rate(self.estimated_total_supply(slot, referral_fee_bps)?)
	}

	fn exchange_rate(&self, total_supply: Decimal) -> LendingResult<Decimal> {
		let mint_total_supply = self.state.collateral.mint_total_supply;
		if mint_total_supply == 0 || total_supply.is_zero() {
			return Ok(Decimal::from(INITIAL_COLLATERAL_RATE));
		}
		Decimal::from(mint_total_supply).safe_div(total_supply)
	}

	// Fee quotes

	pub fn calculate_fees(
		&self,
		amount: Decimal,
		fee_rate: Decimal,
		fee_calculation: FeeCalculation,
		referral_fee_bps: u16,
		has_referrer: bool
	) -> LendingResult<Fees> {
		calculate_fees(amount, fee_rate, fee_calculation, referral_fee_bps, has_referrer)
	}

	pub fn calculate_flash_loan_fees(
		&self,
		flash_loan_amount: Decimal,
		referral_fee_bps: u16,
		has_referrer: bool
	) -> LendingResult<Fees> {
		calculate_fees(
			flash_loan_amount,
			self.flash_loan_fee(),
			FeeCalculation::Exclusive,
			referral_fee_bps,
			has_referrer
		)
	}

	// Projection

	/// Snapshot of the reserve as a refresh at `slot` would leave it.
	pub fn refreshed(&self, slot: Slot, referral_fee_bps: u16) -> LendingResult<ReserveSnapshot> {
		Ok(ReserveSnapshot {
			state: self.state.accrue_interest(slot, referral_fee_bps)?,
			recent_slot_duration_ms: self.recent_slot_duration_ms,
		})
	}

	fn compound_interest(&self, slots_elapsed: u64, referral_fee_bps: u16) -> LendingResult<CompoundedInterest> {
		let current_borrow_rate = from_f64(self.borrow_rate()?)?;
		let referral_rate = Decimal::from(referral_fee_bps).mul_pow10(-4);

		compound_interest(
			self.borrowed_amount(),
			self.accumulated_protocol_fees(),
			self.pending_referrer_fees(),
			current_borrow_rate,
			self.fixed_host_interest_rate(),
			self.protocol_take_rate(),
			referral_rate,
			slots_elapsed
		)
	}
}

impl From<Reserve> for ReserveSnapshot {
	fn from(state: Reserve) -> Self {
		ReserveSnapshot::new(state)
	}
}
