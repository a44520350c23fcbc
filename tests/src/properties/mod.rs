//! Property suites, one module per subsystem.

pub mod batch;
pub mod session;
pub mod sponsorship;
