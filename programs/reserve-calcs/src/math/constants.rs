use static_assertions::const_assert;
use static_assertions::const_assert_eq;

// SCALED FRACTIONS
pub const FRACTION_BITS: u32 = 60;
pub const FRACTION_ONE_SCALED: u128 = 1 << FRACTION_BITS; // 2^60

// TIME
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const SLOTS_PER_SECOND: u64 = 2;
pub const SLOTS_PER_YEAR: u64 = SLOTS_PER_SECOND * SECONDS_PER_DAY * 365; // 63_072_000
pub const DEFAULT_RECENT_SLOT_DURATION_MS: u64 = 450;
pub const MILLISECONDS_PER_SECOND: u64 = 1_000;

// RATES
pub const ONE_HUNDRED_PCT_IN_BPS: u64 = 10_000;
pub const ONE_HUNDRED_PCT: u64 = 100;
pub const INITIAL_COLLATERAL_RATE: u64 = 1;

// DECIMALS
pub const DECIMAL_PRECISION: u32 = 40; // significant digits kept by read models

const_assert!(FRACTION_BITS < 64);
const_assert_eq!(SLOTS_PER_YEAR, 63_072_000);
const_assert!(DECIMAL_PRECISION <= 60);
const_assert!(ONE_HUNDRED_PCT_IN_BPS <= (u16::MAX as u64));
