//! Score calibration math utilities.

pub mod math;

pub use math::logistic::*;
pub use math::stable::*;
pub use math::vector;
