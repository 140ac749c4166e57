pub mod in_flight;

pub use in_flight::{InFlightGuard, InFlightTracker};
