//! # OpFlow Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Shared fixtures: wallets, directories, executors
//! ├── integration/      # End-to-end pipeline flows
//! │   └── flows.rs
//! └── properties/       # Proptest suites per subsystem
//!     ├── batch.rs
//!     ├── session.rs
//!     └── sponsorship.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p aa-tests
//!
//! # By category
//! cargo test -p aa-tests integration::
//! cargo test -p aa-tests properties::
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod harness;
pub mod integration;
pub mod properties;
