use crate::error::{ LendingResult, ErrorCode };
use crate::math::constants::ONE_HUNDRED_PCT_IN_BPS;
use crate::math::fraction::Fraction;
use crate::math::safe_math::SafeMath;
use crate::{ print_error, validate };


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CurvePoint {
	pub utilization_rate_bps: u32,
	pub borrow_rate_bps: u32,
}

impl CurvePoint {
	pub const fn new(utilization_rate_bps: u32, borrow_rate_bps: u32) -> Self {
		CurvePoint { utilization_rate_bps, borrow_rate_bps }
	}
}

/// Piecewise-linear map from utilization to annual borrow rate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BorrowRateCurve {
	pub points: Vec<CurvePoint>,
}

enum Segment {
	Point(CurvePoint),
	Between(CurvePoint, CurvePoint),
}

impl BorrowRateCurve {
	pub fn new(points: Vec<CurvePoint>) -> Self {
		BorrowRateCurve { points }
	}

	pub fn from_bps(points: &[(u32, u32)]) -> Self {
		BorrowRateCurve {
			points: points
				.iter()
				.map(|(utilization, rate)| CurvePoint::new(*utilization, *rate))
				.collect(),
		}
	}

	/// Points up to and including the first one at 100% utilization.
	/// Stored curves are padded with copies of their last point.
	pub fn effective_points(&self) -> &[CurvePoint] {
		match
			self.points
				.iter()
				.position(|point| point.utilization_rate_bps as u64 == ONE_HUNDRED_PCT_IN_BPS)
		{
			Some(index) => &self.points[..=index],
			None => &self.points,
		}
	}

	pub fn validate(&self) -> LendingResult {
		let points = self.effective_points();

		validate!(!points.is_empty(), ErrorCode::DegenerateCurve, "borrow rate curve has no points")?;

		validate!(
			points[0].utilization_rate_bps == 0,
			ErrorCode::InvalidBorrowRateCurve,
			"first curve point at utilization {} bps instead of 0",
			points[0].utilization_rate_bps
		)?;

		validate!(
			points[points.len() - 1].utilization_rate_bps as u64 == ONE_HUNDRED_PCT_IN_BPS,
			ErrorCode::InvalidBorrowRateCurve,
			"curve never reaches 100% utilization, last point at {} bps",
			points[points.len() - 1].utilization_rate_bps
		)?;

		for window in points.windows(2) {
			validate!(
				window[0].utilization_rate_bps <= window[1].utilization_rate_bps,
				ErrorCode::InvalidBorrowRateCurve,
				"curve utilization decreases from {} bps to {} bps",
				window[0].utilization_rate_bps,
				window[1].utilization_rate_bps
			)?;
		}

		Ok(())
	}

	/// Finds the point or pair of points governing `utilization`, where `key`
	/// maps a point's utilization in bps onto the same scale.
	fn locate<T, F>(&self, utilization: T, key: F) -> LendingResult<Segment>
		where T: PartialOrd + Copy, F: Fn(u32) -> T
	{
		let points = self.effective_points();
		let first = *points.first().ok_or_else(print_error!(ErrorCode::DegenerateCurve))?;
		let last = *points.last().ok_or_else(print_error!(ErrorCode::DegenerateCurve))?;

		if
			let Some(point) = points
				.iter()
				.rev()
				.find(|point| key(point.utilization_rate_bps) == utilization)
		{
			return Ok(Segment::Point(*point));
		}

		if utilization < key(first.utilization_rate_bps) {
			return Ok(Segment::Point(first));
		}

		if utilization > key(last.utilization_rate_bps) {
			return Ok(Segment::Point(last));
		}

		points
			.windows(2)
			.find(|window| {
				key(window[0].utilization_rate_bps) < utilization &&
					utilization < key(window[1].utilization_rate_bps)
			})
			.map(|window| Segment::Between(window[0], window[1]))
			.ok_or_else(print_error!(ErrorCode::InvalidBorrowRateCurve))
	}

	/// Borrow rate in bps at `utilization_bps`, rounded down.
	pub fn rate_at(&self, utilization_bps: u32) -> LendingResult<u32> {
		match self.locate(utilization_bps, |bps| bps)? {
			Segment::Point(point) => Ok(point.borrow_rate_bps),
			Segment::Between(start, end) => {
				let x = utilization_bps as u64;
				let x0 = start.utilization_rate_bps as u64;
				let x1 = end.utilization_rate_bps as u64;
				let y0 = start.borrow_rate_bps as u64;
				let y1 = end.borrow_rate_bps as u64;

				let weighted = y0.safe_mul(x1.safe_sub(x)?)?.safe_add(y1.safe_mul(x.safe_sub(x0)?)?)?;
				let rate = weighted.safe_div(x1.safe_sub(x0)?)?;

				u32::try_from(rate).map_err(|_| ErrorCode::BnConversionError)
			}
		}
	}

	/// Borrow rate as a fraction per year for a utilization given as a ratio,
	/// evaluated in double precision.
	pub fn borrow_rate(&self, utilization: f64) -> LendingResult<f64> {
		let utilization = if utilization > 1.0 { 1.0 } else { utilization };
		let scale = ONE_HUNDRED_PCT_IN_BPS as f64;
		let ratio = |bps: u32| (bps as f64) / scale;

		match self.locate(utilization, ratio)? {
			Segment::Point(point) => Ok(ratio(point.borrow_rate_bps)),
			Segment::Between(start, end) => {
				let x0 = ratio(start.utilization_rate_bps);
				let x1 = ratio(end.utilization_rate_bps);
				let y0 = ratio(start.borrow_rate_bps);
				let y1 = ratio(end.borrow_rate_bps);

				Ok(y0 + ((utilization - x0) * (y1 - y0)) / (x1 - x0))
			}
		}
	}

	/// Fixed-point evaluation, rounding every step down.
	pub fn borrow_rate_f(&self, utilization: Fraction) -> LendingResult<Fraction> {
		let utilization = utilization.min(Fraction::ONE);

		match self.locate(utilization, |bps| Fraction::from_bps(bps as u64))? {
			Segment::Point(point) => Ok(Fraction::from_bps(point.borrow_rate_bps as u64)),
			Segment::Between(start, end) => {
				let slope_denom = (end.utilization_rate_bps as u64).safe_sub(start.utilization_rate_bps as u64)?;
				let start_rate = Fraction::from_bps(start.borrow_rate_bps as u64);
				let coef = utilization.safe_sub(Fraction::from_bps(start.utilization_rate_bps as u64))?;

				if end.borrow_rate_bps >= start.borrow_rate_bps {
					let slope_nom = (end.borrow_rate_bps as u64).safe_sub(start.borrow_rate_bps as u64)?;
					let base_rate = coef.safe_mul_int(slope_nom)?.safe_div_int(slope_denom)?;
					start_rate.safe_add(base_rate)
				} else {
					let slope_nom = (start.borrow_rate_bps as u64).safe_sub(end.borrow_rate_bps as u64)?;
					let drop = coef.safe_mul_int(slope_nom)?.safe_div_int(slope_denom)?;
					start_rate.safe_sub(drop)
				}
			}
		}
	}
}

/// `borrowed / (borrowed + available)` in bps, rounded down; zero for an empty pool.
pub fn utilization_bps(borrowed: u64, available: u64) -> LendingResult<u32> {
	let total = (borrowed as u128).safe_add(available as u128)?;
	if total == 0 {
		return Ok(0);
	}

	let bps = (borrowed as u128).safe_mul(ONE_HUNDRED_PCT_IN_BPS as u128)?.safe_div(total)?;
	u32::try_from(bps).map_err(|_| ErrorCode::BnConversionError)
}
