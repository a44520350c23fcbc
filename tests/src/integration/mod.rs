//! End-to-end pipeline flows.

pub mod flows;
