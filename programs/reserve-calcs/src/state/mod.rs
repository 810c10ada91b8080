pub mod reserve;
pub mod reserve_snapshot;
