//! Admin access gate.

pub mod gate;

pub use gate::AdminGate;
