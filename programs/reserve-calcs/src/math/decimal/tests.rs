use std::str::FromStr;

use num_traits::{ FromPrimitive, ToPrimitive };

use crate::error::ErrorCode;
use crate::math::decimal::Decimal;

fn d(s: &str) -> Decimal {
	Decimal::from_str(s).unwrap()
}

#[test]
fn parse_and_display() {
	assert_eq!(d("0").to_string(), "0");
	assert_eq!(d("-0").to_string(), "0");
	assert_eq!(d("1.500").to_string(), "1.5");
	assert_eq!(d("+42").to_string(), "42");
	assert_eq!(d("-0.000001").to_string(), "-0.000001");
	assert_eq!(d("0.0000001").to_string(), "1e-7");
	assert_eq!(d("1.25e-20").to_string(), "1.25e-20");
	assert_eq!(d("123456789000000000000").to_string(), "123456789000000000000");
	assert_eq!(d("1e21").to_string(), "1e+21");
	assert_eq!(d(".5").to_string(), "0.5");
	assert_eq!(d("7.").to_string(), "7");
}

#[test]
fn parse_rejects_garbage() {
	assert_eq!(Decimal::from_str(""), Err(ErrorCode::InvalidDecimal));
	assert_eq!(Decimal::from_str("."), Err(ErrorCode::InvalidDecimal));
	assert_eq!(Decimal::from_str("1.2.3"), Err(ErrorCode::InvalidDecimal));
	assert_eq!(Decimal::from_str("12a"), Err(ErrorCode::InvalidDecimal));
	assert_eq!(Decimal::from_str("1e"), Err(ErrorCode::InvalidDecimal));
	assert_eq!(Decimal::from_str("0.5e-9223372036854775808"), Err(ErrorCode::InvalidDecimal));
	assert_eq!(Decimal::from_str("5e9223372036854775807"), Err(ErrorCode::InvalidDecimal));
	assert_eq!(Decimal::from_str("1e99999999999999999999"), Err(ErrorCode::InvalidDecimal));
}

#[test]
fn parse_truncates_to_precision() {
	assert_eq!(
		d("1.23456789012345678901234567890123456789999").to_string(),
		"1.234567890123456789012345678901234567899"
	);
	assert_eq!(
		d("123456789012345678901234567890123456789999").to_string(),
		"1.234567890123456789012345678901234567899e+41"
	);
}

#[test]
fn plain_string() {
	assert_eq!(d("1.25e-20").to_plain_string(), "0.0000000000000000000125");
	assert_eq!(d("-2e+22").to_plain_string(), "-20000000000000000000000");
	assert_eq!(d("3.5").to_plain_string(), "3.5");
	assert_eq!(Decimal::ZERO.to_plain_string(), "0");
}

#[test]
fn division_truncates() {
	let one = Decimal::ONE;
	let two = Decimal::from(2_u64);
	let three = Decimal::from(3_u64);

	assert_eq!(one.safe_div(three).unwrap().to_string(), "0.3333333333333333333333333333333333333333");
	assert_eq!(two.safe_div(three).unwrap().to_string(), "0.6666666666666666666666666666666666666666");
	assert_eq!((-two).safe_div(three).unwrap().to_string(), "-0.6666666666666666666666666666666666666666");
	assert_eq!(Decimal::from(10_u64).safe_div(Decimal::from(4_u64)).unwrap(), d("2.5"));
	assert_eq!(one.safe_div(Decimal::ZERO), Err(ErrorCode::DivisionByZero));
}

#[test]
fn addition_keeps_precision() {
	assert_eq!((d("0.1") + d("0.2")).to_string(), "0.3");
	assert_eq!((d("1") - d("1e-50")).to_string(), "0.9999999999999999999999999999999999999999");
	assert_eq!((d("1") + d("1e-50")).to_string(), "1");
	assert_eq!((d("-1") + d("1e-50")).to_string(), "-0.9999999999999999999999999999999999999999");
	assert_eq!((d("5") - d("5")), Decimal::ZERO);
	assert_eq!((d("2") - d("5")).to_string(), "-3");
	assert_eq!(
		(d("1000000") + d("8.673617379884035291503690120656176225983e-11")).to_string(),
		"1000000.000000000086736173798840352915036"
	);
}

#[test]
fn multiplication() {
	assert_eq!((d("1.5") * d("-2")).to_string(), "-3");
	assert_eq!((d("0.1") * d("0.1")).to_string(), "0.01");
	assert_eq!(
		(d("0.3333333333333333333333333333333333333333") * Decimal::from(3_u64)).to_string(),
		"0.9999999999999999999999999999999999999999"
	);
	assert_eq!(d("123") * Decimal::ZERO, Decimal::ZERO);
}

#[test]
fn pow() {
	assert_eq!(Decimal::from(10_u64).pow(6), Decimal::from(1_000_000_u64));
	assert_eq!(d("1.5").pow(0), Decimal::ONE);
	assert_eq!(d("1.5").pow(3).to_string(), "3.375");
	assert_eq!(d("0.5").pow(3), d("0.125"));
}

#[test]
fn floor() {
	assert_eq!(d("2.7").floor(), Decimal::from(2_u64));
	assert_eq!(d("-2.1").floor(), d("-3"));
	assert_eq!(d("0.4").floor(), Decimal::ZERO);
	assert_eq!(d("-0.4").floor(), d("-1"));
	assert_eq!(d("12e3").floor(), Decimal::from(12_000_u64));
}

#[test]
fn ordering() {
	assert!(d("-1") < Decimal::ZERO);
	assert!(d("-2") < d("-1"));
	assert!(d("0.001") < d("0.01"));
	assert!(d("1.0000000001") > Decimal::ONE);
	assert_eq!(d("1.50"), d("1.5"));
	assert_eq!(d("3").max(d("2.5")), d("3"));
	assert!(d("1e-40") > Decimal::ZERO);
}

#[test]
fn scaling() {
	assert_eq!(Decimal::from(1_000_u16).mul_pow10(-4), d("0.1"));
	assert_eq!(Decimal::from(15_u8).mul_pow10(-2), d("0.15"));
	assert_eq!(Decimal::ZERO.mul_pow10(5), Decimal::ZERO);
}

#[test]
fn primitive_conversions() {
	assert_eq!(Decimal::from_f64(0.1).unwrap(), d("0.1"));
	assert_eq!(Decimal::from_f64(-1.5e-7).unwrap(), d("-0.00000015"));
	assert_eq!(Decimal::from_f64(0.0).unwrap(), Decimal::ZERO);
	assert_eq!(Decimal::from_f64(0.00011111111111111472).unwrap(), d("0.00011111111111111472"));
	assert_eq!(Decimal::from_f64(f64::NAN), None);
	assert_eq!(Decimal::from_i64(-12).unwrap(), d("-12"));

	assert_eq!(d("0.1").to_f64(), Some(0.1));
	assert_eq!(d("8.673617379884035291503690120656176225983e-17").to_f64(), Some(8.673617379884035e-17));
	assert_eq!(d("-2.9").to_i64(), Some(-2));
	assert_eq!(d("2.9").to_u64(), Some(2));
	assert_eq!(d("-2.9").to_u64(), None);
	assert_eq!(d("1e30").to_u128(), Some(1_000_000_000_000_000_000_000_000_000_000));
}
