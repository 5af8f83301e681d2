//! Capacity-limited resources of the pathway
//!
//! Each run owns one [`ResourcePools`] registry holding the staffing,
//! scanner, same-day care and ward pools.

pub mod pool;

pub use pool::*;
