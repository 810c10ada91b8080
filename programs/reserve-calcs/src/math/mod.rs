pub mod bn;
pub mod borrow_rate_curve;
pub mod casting;
pub mod constants;
pub mod decimal;
pub mod fees;
pub mod fraction;
pub mod interest;
pub mod safe_math;
