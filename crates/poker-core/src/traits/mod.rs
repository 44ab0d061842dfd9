//! Abstraction traits implemented outside the core crate or swapped in tests.

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
