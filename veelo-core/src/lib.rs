//! Core types and wizard logic for the veelo vehicle rental booking flow.

/// Disabled-day expansion and the date-range booking gate.
pub mod calendar;
/// Domain models and identifiers shared by all components.
pub mod model;
/// Traits describing the remote backend interfaces.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;
/// The forward-only booking wizard state machine.
pub mod wizard;

pub use calendar::*;
pub use model::*;
pub use ports::*;
pub use service::*;
pub use wizard::*;
