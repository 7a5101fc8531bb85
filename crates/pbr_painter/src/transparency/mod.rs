//! Stochastic transparency settings
//!
//! Only the option surface lives here; sampling and compositing are done by
//! the host's shader passes.

pub mod options;

pub use options::{StochasticTransparencyOptimization, StochasticTransparencyOptions};
