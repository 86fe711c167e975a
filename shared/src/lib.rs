pub mod cell;
pub mod params;
pub mod snapshot;

pub use cell::*;
pub use params::*;
pub use snapshot::*;

/// Capacity of the rolling chart windows
pub const HISTORY_CAPACITY: usize = 100;
